//! Bounded pool of short-lived visual particles
//!
//! Jump dust, landing puffs, damage sparks, respawn bursts. Particles never
//! affect gameplay; the pool only has to stay bounded.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::effects::rand_range;
use crate::Color;
use crate::consts::{MAX_PARTICLES, PARTICLE_DRAG, PARTICLE_GRAVITY};

/// A gravity-affected point that fades out over its lifetime
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub color: Color,
    pub size: f32,
    pub gravity: f32,
}

impl Particle {
    /// Remaining life as 0-1, used for alpha and size falloff
    pub fn fade(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).max(0.0)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    capacity: usize,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(MAX_PARTICLES)
    }
}

impl ParticleSystem {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Add a particle. Silently dropped once the pool is full.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(&mut self, x: f32, y: f32, vx: f32, vy: f32, life: f32, color: Color, size: f32) {
        if self.particles.len() >= self.capacity {
            return;
        }
        self.particles.push(Particle {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
            life,
            max_life: life,
            color,
            size,
            gravity: PARTICLE_GRAVITY,
        });
    }

    /// Ring of `count` particles flying outward with some jitter
    #[allow(clippy::too_many_arguments)]
    pub fn burst(
        &mut self,
        rng: &mut Pcg32,
        x: f32,
        y: f32,
        count: usize,
        color: Color,
        spread: f32,
        speed: f32,
    ) {
        for i in 0..count {
            let angle = (i as f32 / count as f32) * std::f32::consts::TAU;
            let vx = angle.cos() * speed + rand_range(rng, -spread, spread);
            let vy = angle.sin() * speed + rand_range(rng, -spread, spread);
            let life = rand_range(rng, 0.3, 0.8);
            let size = rand_range(rng, 2.0, 5.0);
            self.spawn(x, y, vx, vy, life, color, size);
        }
    }

    /// Single small drifting particle near a point
    pub fn trail(&mut self, rng: &mut Pcg32, x: f32, y: f32, color: Color) {
        let x = x + rand_range(rng, -3.0, 3.0);
        let y = y + rand_range(rng, -3.0, 3.0);
        let vx = rand_range(rng, -0.5, 0.5);
        let vy = rand_range(rng, -1.0, 0.0);
        let life = rand_range(rng, 0.2, 0.5);
        let size = rand_range(rng, 1.0, 3.0);
        self.spawn(x, y, vx, vy, life, color, size);
    }

    /// Euler step: velocity is px per tick, life counts down in seconds
    pub fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel.y += p.gravity;
            p.vel.x *= PARTICLE_DRAG;
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
