//! Obstacles scrolling toward the ghost

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::{Color, colors};

/// Obstacle variants, each with a fixed footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    Rock,
    /// Flies at head height; only hits a jumping ghost
    Bat,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Tree, ObstacleKind::Rock, ObstacleKind::Bat];

    /// (width, height)
    pub fn size(self) -> (f32, f32) {
        match self {
            ObstacleKind::Tree => (40.0, 90.0),
            ObstacleKind::Rock => (50.0, 40.0),
            ObstacleKind::Bat => (40.0, 30.0),
        }
    }

    /// Top edge of the hit-box
    pub fn top(self) -> f32 {
        match self {
            ObstacleKind::Bat => SCREEN_HEIGHT - 220.0,
            _ => GROUND_LINE - self.size().1,
        }
    }

    /// Grounded obstacles have to be jumped over
    pub fn is_grounded(self) -> bool {
        !matches!(self, ObstacleKind::Bat)
    }

    /// Base color, also used for crash debris
    pub fn color(self) -> Color {
        match self {
            ObstacleKind::Tree => colors::GREEN,
            ObstacleKind::Rock => colors::GRAY,
            ObstacleKind::Bat => colors::PURPLE,
        }
    }
}

/// An obstacle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Left edge
    pub x: f32,
    /// Pixels per frame, fixed at spawn time
    pub speed: f32,
    /// Set once the obstacle has scrolled off and been scored
    pub passed: bool,
    /// Wing-flap phase (bats only)
    pub flap_phase: f32,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f32, difficulty: f32) -> Self {
        Self {
            kind,
            x,
            speed: OBSTACLE_BASE_SPEED * difficulty,
            passed: false,
            flap_phase: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.x -= self.speed;
        if self.kind == ObstacleKind::Bat {
            self.flap_phase += 0.4;
        }
    }

    pub fn hitbox(&self) -> Rect {
        let (w, h) = self.kind.size();
        Rect::new(self.x, self.kind.top(), w, h)
    }

    /// Fully past the left screen edge
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.hitbox().right() < 0.0
    }

    /// Mark as passed. Returns true the first time only.
    pub fn mark_passed(&mut self) -> bool {
        if self.passed {
            return false;
        }
        self.passed = true;
        true
    }
}
