//! Scene state and per-frame update
//!
//! All simulated state lives in [`SceneState`]. Input arrives as queued intents;
//! [`SceneState::update`] applies them and then steps cameras, exhaust and rocket
//! in that order. [`SceneState::write_views`] then produces one [`SceneView`] per
//! visible camera with freshly rebuilt particle billboards.

use glam::{Vec2, Vec3};
use launch_particles::{BillboardVertex, ExhaustPool};
use rand::Rng;

use crate::camera::{CameraControl, CameraFrame, CameraSettings, SpeedKeys};
use crate::config::ViewerConfig;
use crate::intent::{Intent, IntentQueue, ViewSlot};
use crate::rocket::{PointLight, RocketControl};

/// Directional "sun" light, toward the light
pub const SUN_DIRECTION: Vec3 = Vec3::new(
    0.0,
    std::f32::consts::FRAC_1_SQRT_2,
    -std::f32::consts::FRAC_1_SQRT_2,
);
pub const SUN_COLOR: Vec3 = Vec3::new(0.9, 0.9, 0.6);
pub const AMBIENT: Vec3 = Vec3::new(0.05, 0.05, 0.05);
pub const SHININESS: f32 = 32.0;

/// Pixel rectangle of a view
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }
}

/// Everything needed to draw one camera's view
#[derive(Clone, Debug)]
pub struct SceneView {
    pub slot: ViewSlot,
    pub viewport: Viewport,
    pub camera: CameraFrame,
    /// Billboards facing this view's camera
    pub billboards: Vec<BillboardVertex>,
}

impl Default for SceneView {
    fn default() -> Self {
        Self {
            slot: ViewSlot::Main,
            viewport: Viewport::default(),
            camera: CameraFrame::default(),
            billboards: Vec::new(),
        }
    }
}

/// Lighting shared by every view
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneLighting {
    pub sun_direction: Vec3,
    pub sun_color: Vec3,
    pub ambient: Vec3,
    pub shininess: f32,
    pub point_lights: [PointLight; 3],
}

pub struct SceneState {
    pub split_screen: bool,
    pub main_camera: CameraControl,
    pub left_camera: CameraControl,
    pub right_camera: CameraControl,
    pub rocket: RocketControl,
    pub exhaust: ExhaustPool,
    pub speed_keys: SpeedKeys,
    camera_settings: CameraSettings,
    intents: IntentQueue,
    exit_requested: bool,
}

impl SceneState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            split_screen: false,
            main_camera: CameraControl::new(),
            left_camera: CameraControl::new(),
            right_camera: CameraControl::new(),
            rocket: RocketControl::new(config.rocket.clone()),
            exhaust: ExhaustPool::new(config.particles.clone()),
            speed_keys: SpeedKeys::default(),
            camera_settings: config.camera.clone(),
            intents: IntentQueue::new(),
            exit_requested: false,
        }
    }

    /// Queue input for the next update
    pub fn push_intent(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    pub fn pending_intents(&self) -> usize {
        self.intents.len()
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn camera(&self, slot: ViewSlot) -> &CameraControl {
        match slot {
            ViewSlot::Main => &self.main_camera,
            ViewSlot::Left => &self.left_camera,
            ViewSlot::Right => &self.right_camera,
        }
    }

    pub fn camera_mut(&mut self, slot: ViewSlot) -> &mut CameraControl {
        match slot {
            ViewSlot::Main => &mut self.main_camera,
            ViewSlot::Left => &mut self.left_camera,
            ViewSlot::Right => &mut self.right_camera,
        }
    }

    /// Camera that receives cursor motion and mouse-look toggles
    pub fn pointer_slot(&self) -> ViewSlot {
        if self.split_screen {
            ViewSlot::Left
        } else {
            ViewSlot::Main
        }
    }

    /// Whether the pointer camera is in mouse-look (cursor should be hidden)
    pub fn mouse_look_active(&self) -> bool {
        self.camera(self.pointer_slot()).mouse_look
    }

    fn active_slots(&self) -> &'static [ViewSlot] {
        if self.split_screen {
            &[ViewSlot::Left, ViewSlot::Right]
        } else {
            &[ViewSlot::Main]
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::ToggleSplitScreen => {
                self.split_screen = !self.split_screen;
                log::info!("Split screen {}", if self.split_screen { "on" } else { "off" });
            }
            Intent::CycleCamera { alternate } => {
                let slot = match (alternate, self.split_screen) {
                    (true, _) => ViewSlot::Right,
                    (false, true) => ViewSlot::Left,
                    (false, false) => ViewSlot::Main,
                };
                self.camera_mut(slot).cycle_mode();
            }
            Intent::TogglePlay => {
                self.rocket.play = !self.rocket.play;
                log::info!("Launch {}", if self.rocket.play { "started" } else { "stopped" });
            }
            Intent::TogglePause => {
                self.rocket.pause = !self.rocket.pause;
            }
            Intent::Reset => self.rocket.reset = true,
            Intent::Move { direction, active } => {
                for &slot in self.active_slots() {
                    self.camera_mut(slot).movement.set(direction, active);
                }
            }
            Intent::SpeedKey { key, held } => self.speed_keys.set(key, held),
            Intent::ToggleMouseLook => {
                let slot = self.pointer_slot();
                self.camera_mut(slot).toggle_mouse_look();
            }
            Intent::CursorMoved { x, y } => {
                let sensitivity = self.camera_settings.mouse_sensitivity;
                let slot = self.pointer_slot();
                self.camera_mut(slot).look(Vec2::new(x, y), sensitivity);
            }
            Intent::Exit => self.exit_requested = true,
        }
    }

    /// One simulation frame.
    ///
    /// Order: intents, cameras, exhaust (emission then integration), rocket step,
    /// rocket reset. Pausing freezes both the exhaust and the rocket.
    pub fn update<R: Rng + ?Sized>(&mut self, delta_time: f32, rng: &mut R) {
        let mut pending = std::mem::take(&mut self.intents);
        for intent in pending.drain() {
            self.apply_intent(intent);
        }
        // Keep the drained buffer for the next frame
        self.intents = pending;

        let speed = self.camera_settings.speed(self.speed_keys.modifier());
        let rocket_position = self.rocket.position;
        for &slot in self.active_slots() {
            self.camera_mut(slot).update(delta_time, speed, rocket_position);
        }

        if !self.rocket.pause {
            let origin = self.rocket.exhaust_origin(self.exhaust.emitter.exhaust_offset());
            self.exhaust.update(delta_time, self.rocket.play, origin, rng);
        }

        self.rocket.advance();
        self.rocket.apply_reset();
    }

    /// Viewports for a framebuffer of `width` x `height` pixels
    pub fn viewports(&self, width: u32, height: u32) -> Vec<(ViewSlot, Viewport)> {
        let h = height as f32;
        if self.split_screen {
            let half = (width / 2) as f32;
            vec![
                (ViewSlot::Left, Viewport { x: 0.0, y: 0.0, width: half, height: h }),
                (ViewSlot::Right, Viewport { x: half, y: 0.0, width: half, height: h }),
            ]
        } else {
            vec![(ViewSlot::Main, Viewport { x: 0.0, y: 0.0, width: width as f32, height: h })]
        }
    }

    /// Fill `views` with one entry per visible camera, rebuilding billboards.
    ///
    /// Existing entries are reused so their billboard buffers keep their capacity.
    pub fn write_views(&self, width: u32, height: u32, views: &mut Vec<SceneView>) {
        let viewports = self.viewports(width, height);
        views.resize_with(viewports.len(), SceneView::default);

        for (view, (slot, viewport)) in views.iter_mut().zip(viewports) {
            let camera = self.camera(slot).frame(viewport.aspect(), &self.camera_settings);
            self.exhaust
                .write_billboards(camera.right, camera.up, &mut view.billboards);
            view.slot = slot;
            view.viewport = viewport;
            view.camera = camera;
        }
    }

    pub fn lighting(&self) -> SceneLighting {
        SceneLighting {
            sun_direction: SUN_DIRECTION,
            sun_color: SUN_COLOR,
            ambient: AMBIENT,
            shininess: SHININESS,
            point_lights: self.rocket.point_lights(),
        }
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}
