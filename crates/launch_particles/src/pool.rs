//! Fixed-capacity particle pool
//!
//! Slots are scanned first-fit on emission. When every slot is busy the surplus
//! emission requests are dropped; the pool never grows.

use glam::Vec3;
use rand::Rng;

use crate::billboard::{write_billboards, BillboardVertex};
use crate::emitter::EmitterConfig;

/// Pool size used by the rocket exhaust
pub const MAX_PARTICLES: usize = 200;

/// Exhaust pool at its production capacity
pub type ExhaustPool = ParticlePool<MAX_PARTICLES>;

/// One pool slot. Position and direction are stale while inactive.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    pub active: bool,
    /// Remaining lifetime in seconds
    pub life: f32,
    pub position: Vec3,
    /// Velocity, magnitude included
    pub direction: Vec3,
}

impl Particle {
    pub const INACTIVE: Particle = Particle {
        active: false,
        life: 0.0,
        position: Vec3::ZERO,
        direction: Vec3::ZERO,
    };
}

/// `N` particle slots plus the emission accumulator
#[derive(Clone, Debug)]
pub struct ParticlePool<const N: usize> {
    pub emitter: EmitterConfig,
    /// Simulated time not yet turned into particles
    pub(crate) emit_accumulator: f32,
    slots: [Particle; N],
    active: usize,
}

impl<const N: usize> ParticlePool<N> {
    pub fn new(emitter: EmitterConfig) -> Self {
        Self {
            emitter,
            emit_accumulator: 0.0,
            slots: [Particle::INACTIVE; N],
            active: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn emit_accumulator(&self) -> f32 {
        self.emit_accumulator
    }

    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.slots.iter().filter(|p| p.active)
    }

    /// Emission step. Returns how many particles were activated.
    ///
    /// The accumulator is reduced by the full request even when the pool cannot
    /// hold all of it.
    pub fn emit<R: Rng + ?Sized>(&mut self, delta_time: f32, origin: Vec3, rng: &mut R) -> usize {
        self.emit_accumulator += delta_time;

        let requested = (self.emitter.emit_rate * self.emit_accumulator).floor() as usize;
        if requested == 0 {
            return 0;
        }
        self.emit_accumulator -= requested as f32 / self.emitter.emit_rate;

        let lifetime = self.emitter.lifetime;
        let base = self.emitter.base_direction();
        let spread = self.emitter.spread;

        let mut spawned = 0;
        if self.active < N {
            for slot in self.slots.iter_mut().filter(|p| !p.active) {
                if spawned == requested {
                    break;
                }
                let jitter = Vec3::new(
                    rng.random::<f32>() * spread,
                    rng.random::<f32>() * spread,
                    rng.random::<f32>() * spread,
                );
                *slot = Particle {
                    active: true,
                    life: lifetime,
                    position: origin,
                    direction: base + jitter,
                };
                spawned += 1;
            }
        }
        self.active += spawned;

        if spawned < requested {
            log::trace!("Particle pool full, dropped {} emissions", requested - spawned);
        }
        spawned
    }

    /// Age every active particle; expire at `life <= 0`, otherwise step forward
    pub fn integrate(&mut self, delta_time: f32) {
        for p in self.slots.iter_mut().filter(|p| p.active) {
            p.life -= delta_time;
            if p.life <= 0.0 {
                p.active = false;
                self.active -= 1;
            } else {
                p.position += p.direction * delta_time;
            }
        }
    }

    /// Emission (when `emitting`) followed by integration
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        delta_time: f32,
        emitting: bool,
        origin: Vec3,
        rng: &mut R,
    ) {
        if emitting {
            self.emit(delta_time, origin, rng);
        }
        self.integrate(delta_time);
    }

    /// Rebuild camera-facing quads for the active particles
    pub fn write_billboards(&self, right: Vec3, up: Vec3, out: &mut Vec<BillboardVertex>) {
        write_billboards(
            self.iter_active().map(|p| p.position),
            right,
            up,
            self.emitter.billboard_size,
            out,
        );
    }

    /// Deactivate everything and forget the accumulator
    pub fn clear(&mut self) {
        self.slots = [Particle::INACTIVE; N];
        self.active = 0;
        self.emit_accumulator = 0.0;
    }
}

impl<const N: usize> Default for ParticlePool<N> {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_emit_rate_and_accumulator() {
        let mut pool = ExhaustPool::default();
        let spawned = pool.emit(0.1, Vec3::ZERO, &mut rng());

        assert_eq!(spawned, 5);
        assert_eq!(pool.active_count(), 5);
        assert_abs_diff_eq!(pool.emit_accumulator(), 0.0, epsilon = 1e-7);
    }

    #[test]
    fn test_fractional_remainder_carries() {
        let mut pool = ExhaustPool::default();
        let mut rng = rng();

        // 50/s at 30ms is 1.5 particles; the half carries into the next frame
        assert_eq!(pool.emit(0.03, Vec3::ZERO, &mut rng), 1);
        assert_abs_diff_eq!(pool.emit_accumulator(), 0.01, epsilon = 1e-6);
        assert_eq!(pool.emit(0.035, Vec3::ZERO, &mut rng), 2);
        assert_abs_diff_eq!(pool.emit_accumulator(), 0.005, epsilon = 1e-6);
    }

    #[test]
    fn test_first_fit_activation() {
        let mut pool = ExhaustPool::default();
        let origin = Vec3::new(6.0, -1.0, -6.0);
        pool.emit(0.1, origin, &mut rng());

        for (i, slot) in pool.slots().iter().enumerate() {
            assert_eq!(slot.active, i < 5);
        }
        for p in pool.iter_active() {
            assert_eq!(p.life, 0.5);
            assert_eq!(p.position, origin);
            let jitter = p.direction - Vec3::new(0.0, -2.0, 0.0);
            for axis in jitter.to_array() {
                assert!((-1e-6..=0.4).contains(&axis), "jitter {} out of range", axis);
            }
        }
    }

    #[test]
    fn test_lifetime_expires_on_third_step() {
        let mut pool = ExhaustPool::default();
        pool.emit(0.03, Vec3::ZERO, &mut rng());
        assert_eq!(pool.active_count(), 1);

        pool.integrate(0.2);
        assert_eq!(pool.active_count(), 1);
        pool.integrate(0.2);
        assert_eq!(pool.active_count(), 1);
        assert!(pool.slots()[0].life > 0.0);
        pool.integrate(0.2);
        assert_eq!(pool.active_count(), 0);
        assert!(!pool.slots()[0].active);
    }

    #[test]
    fn test_euler_step() {
        let mut pool = ExhaustPool::new(EmitterConfig { spread: 0.0, ..Default::default() });
        pool.emit(0.03, Vec3::ONE, &mut rng());
        pool.integrate(0.1);

        let p = pool.iter_active().next().unwrap();
        assert_abs_diff_eq!(p.position, Vec3::new(1.0, 0.8, 1.0), epsilon = 1e-6);
        assert_abs_diff_eq!(p.life, 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_saturation_drops_excess() {
        let mut pool: ParticlePool<4> = ParticlePool::default();
        let mut rng = rng();

        assert_eq!(pool.emit(0.1, Vec3::ZERO, &mut rng), 4);
        assert_eq!(pool.active_count(), 4);
        // Dropped requests are not queued
        assert_abs_diff_eq!(pool.emit_accumulator(), 0.0, epsilon = 1e-7);
        assert_eq!(pool.emit(0.1, Vec3::ZERO, &mut rng), 0);
        assert_eq!(pool.active_count(), 4);
    }

    #[test]
    fn test_update_without_emission_still_integrates() {
        let mut pool = ExhaustPool::default();
        let mut rng = rng();
        pool.update(0.1, true, Vec3::ZERO, &mut rng);
        assert_eq!(pool.active_count(), 5);

        for _ in 0..10 {
            pool.update(0.1, false, Vec3::ZERO, &mut rng);
        }
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut pool: ParticlePool<5> = ParticlePool::default();
        let mut rng = rng();
        pool.emit(0.1, Vec3::ZERO, &mut rng);
        pool.integrate(1.0);
        assert_eq!(pool.active_count(), 0);

        assert_eq!(pool.emit(0.05, Vec3::X, &mut rng), 2);
        assert!(pool.slots()[0].active && pool.slots()[1].active);
        assert!(!pool.slots()[2].active);
    }

    #[test]
    fn test_clear() {
        let mut pool = ExhaustPool::default();
        pool.emit(0.13, Vec3::ZERO, &mut rng());
        pool.clear();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.emit_accumulator(), 0.0);
        assert_eq!(pool.iter_active().count(), 0);
    }
}
