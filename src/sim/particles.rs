//! Short-lived cosmetic burst particles
//!
//! Particles never touch gameplay: spread uses hash scatter from the tick
//! counter rather than the world RNG, so emitting a burst cannot shift the
//! spawner's random stream.

use glam::Vec2;
use std::f32::consts::TAU;

use super::state::Particle;
use crate::consts::*;
use crate::scatter_hash;

/// Emit `count` particles at `pos` with scattered angle and speed
pub fn emit_burst(particles: &mut Vec<Particle>, tick_seed: u32, pos: Vec2, color: u32, count: usize) {
    for i in 0..count {
        let h = scatter_hash(tick_seed, i as u32);
        let angle = (h % 1000) as f32 / 1000.0 * TAU;
        let speed_t = ((h >> 10) % 1000) as f32 / 1000.0;
        let speed = BURST_SPEED_MIN + speed_t * (BURST_SPEED_MAX - BURST_SPEED_MIN);
        let size = 2.0 + ((h >> 20) % 100) as f32 / 100.0 * 3.0;
        particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            color,
            life: 1.0,
            size,
        });
    }
}

/// Integrate, damp, decay, and drop dead particles
pub fn update(particles: &mut Vec<Particle>, dt: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel * dt;
        p.vel *= PARTICLE_DAMPING;
        p.life -= PARTICLE_DECAY * dt;
    }
    particles.retain(|p| p.life > 0.0);
}
