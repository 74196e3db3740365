//! Floating coins worth bonus points

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

pub const COLLECTIBLE_SIZE: f32 = 25.0;
/// Vertical spawn band for the top edge (inclusive)
pub const SPAWN_BAND_TOP: i32 = 300;
pub const SPAWN_BAND_BOTTOM: i32 = SCREEN_HEIGHT as i32 - 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    /// Top-left corner
    pub pos: Vec2,
    pub speed: f32,
    pub collected: bool,
    /// Glow pulse phase (radians)
    pub glow_phase: f32,
}

impl Collectible {
    pub fn new(pos: Vec2, difficulty: f32) -> Self {
        Self {
            pos,
            speed: COLLECTIBLE_BASE_SPEED * difficulty,
            collected: false,
            glow_phase: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.pos.x -= self.speed;
        self.glow_phase += 0.1;
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, COLLECTIBLE_SIZE, COLLECTIBLE_SIZE)
    }

    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + COLLECTIBLE_SIZE < 0.0
    }

    /// Pulse scale used when drawing
    #[inline]
    pub fn glow_scale(&self) -> f32 {
        1.0 + self.glow_phase.sin() * 0.1
    }
}
