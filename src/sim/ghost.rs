//! The player-controlled ghost
//!
//! Per-frame gravity integration with a hard ground clamp. The float phase is
//! purely cosmetic and never touches collision geometry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// The ghost entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ghost {
    /// Top-left corner of the hit-box
    pub pos: Vec2,
    /// Vertical velocity (pixels/frame, positive = down)
    pub vel_y: f32,
    pub on_ground: bool,
    /// Bob animation phase (radians)
    pub float_phase: f32,
}

impl Default for Ghost {
    fn default() -> Self {
        Self::new()
    }
}

impl Ghost {
    /// Spawn mid-air at the left third of the screen; it falls to the ground
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(GHOST_X, SCREEN_HEIGHT / 2.0),
            vel_y: 0.0,
            on_ground: false,
            float_phase: 0.0,
        }
    }

    /// Y coordinate of the top edge when standing on the ground
    #[inline]
    pub fn ground_y() -> f32 {
        GROUND_LINE - GHOST_SIZE
    }

    /// Advance physics by one frame
    pub fn update(&mut self) {
        if !self.on_ground {
            self.vel_y += GRAVITY;
        }
        self.pos.y += self.vel_y;

        if self.pos.y + GHOST_SIZE >= GROUND_LINE {
            self.pos.y = Self::ground_y();
            self.vel_y = 0.0;
            self.on_ground = true;
        } else {
            self.on_ground = false;
        }

        self.float_phase += FLOAT_SPEED;
    }

    /// Try to jump. Returns true only if the ghost was grounded.
    pub fn jump(&mut self) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vel_y = JUMP_IMPULSE;
        self.on_ground = false;
        true
    }

    /// Collision box (unaffected by the bob)
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, GHOST_SIZE, GHOST_SIZE)
    }

    /// Draw-time vertical offset from the bob animation
    #[inline]
    pub fn bob_offset(&self) -> f32 {
        self.float_phase.sin() * 5.0
    }
}
