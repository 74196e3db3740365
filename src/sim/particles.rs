//! Short-lived visual particles (dust, debris, sparkles)
//!
//! Not gameplay-affecting. Only the renderer reads them.

use glam::Vec2;
use rand::Rng;

use crate::Color;
use crate::colors;

/// A single particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub size: f32,
    /// Frames left to live
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life = self.life.saturating_sub(1);
        self.size = (self.size * 0.95).max(0.0);
    }

    /// Fade ratio in [0, 1]
    #[inline]
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// Burst parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub color: Color,
    pub count: u32,
    /// Max velocity component magnitude (pixels/frame)
    pub speed: f32,
    pub size: f32,
    pub life: u32,
}

impl Burst {
    pub const fn new(color: Color, count: u32, speed: f32) -> Self {
        Self {
            color,
            count,
            speed,
            size: 5.0,
            life: 30,
        }
    }

    pub const fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }
}

/// Dust kicked up by an accepted jump
pub const JUMP_DUST: Burst = Burst::new(colors::WHITE, 5, 2.0);
/// Ghost shattering on a fatal hit
pub const GHOST_DEBRIS: Burst = Burst::new(colors::GHOST, 20, 5.0);
/// Debris from the obstacle that was hit (color set per obstacle)
pub const OBSTACLE_DEBRIS: Burst = Burst::new(colors::WHITE, 10, 3.0);
/// Coin pickup sparkle
pub const COLLECT_SPARKLE: Burst = Burst::new(colors::GOLD, 15, 4.0);

/// Owns every live particle
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    max_particles: usize,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(512)
    }
}

impl ParticleSystem {
    /// `max_particles == 0` disables emission entirely
    pub fn new(max_particles: usize) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles.min(1024)),
            max_particles,
        }
    }

    /// Spawn a burst at `origin` with random velocities in [-speed, speed]²
    pub fn emit<R: Rng>(&mut self, origin: Vec2, burst: Burst, rng: &mut R) {
        if self.max_particles == 0 || burst.count == 0 {
            return;
        }
        for _ in 0..burst.count {
            let vel = if burst.speed > 0.0 {
                Vec2::new(
                    rng.random_range(-burst.speed..=burst.speed),
                    rng.random_range(-burst.speed..=burst.speed),
                )
            } else {
                Vec2::ZERO
            };
            self.particles.push(Particle {
                pos: origin,
                vel,
                color: burst.color,
                size: burst.size,
                life: burst.life,
                max_life: burst.life,
            });
        }
        // Over budget: oldest particles go first
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    /// Advance every particle one frame and drop the expired ones
    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
