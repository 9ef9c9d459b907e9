//! Input intents
//!
//! Window callbacks translate raw events into [`Intent`]s and queue them. The next
//! [`crate::SceneState::update`] drains the queue before simulating, so the scene
//! has exactly one writer per frame.

use std::collections::VecDeque;

use crate::camera::{MoveDirection, SpeedKey};

/// Which camera a control targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewSlot {
    /// Full-window camera
    Main,
    /// Left half in split screen
    Left,
    /// Right half in split screen
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
    ToggleSplitScreen,
    /// `alternate` picks the right split camera (Shift+C)
    CycleCamera { alternate: bool },
    TogglePlay,
    TogglePause,
    Reset,
    Move { direction: MoveDirection, active: bool },
    SpeedKey { key: SpeedKey, held: bool },
    ToggleMouseLook,
    /// Absolute cursor position in physical pixels
    CursorMoved { x: f32, y: f32 },
    Exit,
}

/// FIFO of intents waiting for the next update
#[derive(Clone, Debug, Default)]
pub struct IntentQueue {
    pending: VecDeque<Intent>,
}

impl IntentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, intent: Intent) {
        self.pending.push_back(intent);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every queued intent in arrival order
    pub fn drain(&mut self) -> impl Iterator<Item = Intent> + '_ {
        self.pending.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = IntentQueue::new();
        queue.push(Intent::TogglePlay);
        queue.push(Intent::Reset);
        queue.push(Intent::CursorMoved { x: 1.0, y: 2.0 });
        assert_eq!(queue.len(), 3);

        let drained: Vec<Intent> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![Intent::TogglePlay, Intent::Reset, Intent::CursorMoved { x: 1.0, y: 2.0 }]
        );
        assert!(queue.is_empty());
    }
}
