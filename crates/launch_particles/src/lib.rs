//! # launch_particles - Exhaust particles
//!
//! A fixed-capacity particle pool driven by an emission rate and a fractional
//! accumulator, plus per-frame camera-facing billboard generation.
//!
//! Each frame runs, in order:
//! 1. emission (only while the caller says the emitter is on)
//! 2. lifetime integration and deactivation
//! 3. billboard regeneration into a reused vertex buffer
//!
//! Steady state does not allocate: slots live inline in the pool and the billboard
//! output vector is cleared and refilled.
//!
//! ```ignore
//! use launch_particles::{BillboardVertex, EmitterConfig, ExhaustPool};
//!
//! let mut pool = ExhaustPool::new(EmitterConfig::default());
//! let mut rng = rand::rng();
//! let mut vertices: Vec<BillboardVertex> = Vec::new();
//!
//! pool.update(dt, rocket_playing, exhaust_origin, &mut rng);
//! pool.write_billboards(cam_right, cam_up, &mut vertices);
//! ```

pub mod billboard;
pub mod emitter;
pub mod pool;

pub use billboard::{write_billboards, BillboardVertex, VERTICES_PER_PARTICLE};
pub use emitter::EmitterConfig;
pub use pool::{ExhaustPool, Particle, ParticlePool, MAX_PARTICLES};
