//! Multi-frame exhaust behaviour

use glam::Vec3;
use launch_particles::{
    BillboardVertex, EmitterConfig, ExhaustPool, ParticlePool, VERTICES_PER_PARTICLE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn long_run_rate_does_not_drift() {
    let mut pool = ExhaustPool::default();
    let mut rng = StdRng::seed_from_u64(1);

    // Uneven frame times summing to 2 seconds
    let frames = [0.016_f32, 0.017, 0.033, 0.009, 0.025];
    let mut elapsed = 0.0_f32;
    let mut emitted = 0;
    while elapsed < 2.0 - 1e-4 {
        for dt in frames {
            emitted += pool.emit(dt, Vec3::ZERO, &mut rng);
            pool.integrate(dt);
            elapsed += dt;
        }
    }

    assert!((99..=100).contains(&emitted), "emitted {}", emitted);
    assert!(pool.emit_accumulator() < 1.0 / 50.0);
}

#[test]
fn steady_state_population() {
    let mut pool = ExhaustPool::default();
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..300 {
        pool.update(1.0 / 60.0, true, Vec3::new(6.0, -1.0, -6.0), &mut rng);
    }

    // 50/s for 0.5s of life
    let active = pool.active_count();
    assert!((23..=26).contains(&active), "active {}", active);
    assert!(pool.iter_active().all(|p| p.position.y < -1.0));
}

#[test]
fn long_lived_particles_saturate_pool() {
    let config = EmitterConfig { lifetime: 100.0, emit_rate: 1000.0, ..Default::default() };
    let mut pool = ExhaustPool::new(config);
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..10 {
        pool.update(0.1, true, Vec3::ZERO, &mut rng);
    }
    assert_eq!(pool.active_count(), pool.capacity());
    assert_eq!(pool.iter_active().count(), 200);
}

#[test]
fn billboards_track_active_particles() {
    let mut pool: ParticlePool<16> = ParticlePool::default();
    let mut rng = StdRng::seed_from_u64(4);
    let mut vertices: Vec<BillboardVertex> = Vec::new();

    pool.update(0.1, true, Vec3::ZERO, &mut rng);
    pool.write_billboards(Vec3::X, Vec3::Y, &mut vertices);
    assert_eq!(vertices.len(), pool.active_count() * VERTICES_PER_PARTICLE);

    let capacity = vertices.capacity();
    for _ in 0..10 {
        pool.update(0.1, false, Vec3::ZERO, &mut rng);
        pool.write_billboards(Vec3::X, Vec3::Y, &mut vertices);
    }
    assert_eq!(pool.active_count(), 0);
    assert!(vertices.is_empty());
    assert_eq!(vertices.capacity(), capacity);
}
