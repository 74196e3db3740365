//! Ghost Run - an endless-runner arcade game
//!
//! Core modules:
//! - `sim`: Gameplay simulation (ghost physics, obstacles, spawning, collisions)
//! - `game`: Mode state machine driving update/draw dispatch
//! - `audio`: PCM wave synthesis and the audio director
//! - `renderer`: Draw-command surface, scene drawing and the WebGPU backend
//! - `platform`: Frame pacing shared by the native and browser shells
//! - `persistence`: High score storage
//! - `ui`: Menu/HUD buttons

pub mod audio;
pub mod game;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use game::{FrameOutcome, Game, GameMode};
pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical screen size; every draw command uses this coordinate space
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Target simulation rate
    pub const FPS: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / FPS as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Top of the ground band; nothing stands below this line
    pub const GROUND_LINE: f32 = SCREEN_HEIGHT - 100.0;

    /// Ghost defaults (per-frame units)
    pub const GHOST_X: f32 = 150.0;
    pub const GHOST_SIZE: f32 = 44.0;
    pub const GRAVITY: f32 = 1.2;
    pub const JUMP_IMPULSE: f32 = -22.0;
    pub const FLOAT_SPEED: f32 = 0.15;

    /// Horizontal speeds before the difficulty multiplier
    pub const OBSTACLE_BASE_SPEED: f32 = 8.0;
    pub const COLLECTIBLE_BASE_SPEED: f32 = 5.0;

    /// Points
    pub const OBSTACLE_PASS_POINTS: u64 = 10;
    pub const COLLECTIBLE_POINTS: u64 = 50;

    /// Audio format
    pub const SAMPLE_RATE: u32 = 44_100;
    pub const CHANNELS: u16 = 2;
}

/// Speed multiplier applied to newly spawned obstacles and collectibles
#[inline]
pub fn difficulty_multiplier(score: u64) -> f32 {
    1.0 + score as f32 / 2000.0
}

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Normalized [r, g, b, a] for GPU vertices
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Palette
pub mod colors {
    use super::Color;

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const BLUE: Color = Color::rgb(100, 150, 255);
    pub const DARK_BLUE: Color = Color::rgb(20, 30, 60);
    pub const GREEN: Color = Color::rgb(50, 200, 50);
    pub const RED: Color = Color::rgb(255, 60, 60);
    pub const PURPLE: Color = Color::rgb(160, 80, 220);
    pub const GOLD: Color = Color::rgb(255, 215, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const GHOST: Color = Color::rgb(220, 220, 255);
}
