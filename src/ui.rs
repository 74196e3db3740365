//! Clickable menu and HUD buttons
//!
//! Layout is fixed in the logical 1280x720 space. Hover follows the pointer
//! and a left click inside a button yields its `UiAction`.

use glam::Vec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::Rect;
use crate::{Color, colors};

/// What a button does when clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Start,
    Quit,
    Restart,
    MainMenu,
    Resume,
    TogglePause,
    ToggleMute,
}

/// A rounded, outlined button with a centered label
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub rect: Rect,
    pub label: &'static str,
    pub color: Color,
    pub hover_color: Color,
    pub action: UiAction,
    pub font_size: f32,
    pub hovered: bool,
}

pub const CORNER_RADIUS: f32 = 12.0;
pub const OUTLINE_WIDTH: f32 = 2.0;
pub const SHADOW_OFFSET: f32 = 4.0;

const MUTED_GRAY: Color = Color::rgb(150, 150, 150);

impl Button {
    pub fn new(
        rect: Rect,
        label: &'static str,
        color: Color,
        hover_color: Color,
        action: UiAction,
    ) -> Self {
        Self {
            rect,
            label,
            color,
            hover_color,
            action,
            font_size: 40.0,
            hovered: false,
        }
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn update(&mut self, pointer: Option<Vec2>) {
        self.hovered = pointer.is_some_and(|p| self.rect.contains(p));
    }

    /// Action if `pos` lands on the button
    pub fn click(&self, pos: Vec2) -> Option<UiAction> {
        self.rect.contains(pos).then_some(self.action)
    }

    pub fn fill(&self) -> Color {
        if self.hovered { self.hover_color } else { self.color }
    }
}

fn centered(y_offset: f32, w: f32, h: f32) -> Rect {
    Rect::new(
        SCREEN_WIDTH / 2.0 - w / 2.0,
        SCREEN_HEIGHT / 2.0 + y_offset,
        w,
        h,
    )
}

/// Every button the game shows, grouped by mode
#[derive(Debug, Clone)]
pub struct Buttons {
    pub start: Button,
    pub quit: Button,
    pub restart: Button,
    pub menu: Button,
    pub resume: Button,
    pub pause_menu: Button,
    pub toggle_pause: Button,
    pub mute: Button,
}

impl Default for Buttons {
    fn default() -> Self {
        Self::new()
    }
}

impl Buttons {
    pub fn new() -> Self {
        let hover_gray = MUTED_GRAY;
        Self {
            start: Button::new(
                centered(50.0, 200.0, 60.0),
                "START",
                colors::BLUE,
                colors::GREEN,
                UiAction::Start,
            ),
            quit: Button::new(
                centered(130.0, 200.0, 60.0),
                "QUIT",
                colors::RED,
                Color::rgb(200, 50, 50),
                UiAction::Quit,
            ),
            restart: Button::new(
                centered(50.0, 240.0, 60.0),
                "PLAY AGAIN",
                colors::BLUE,
                colors::GREEN,
                UiAction::Restart,
            ),
            menu: Button::new(
                centered(130.0, 240.0, 60.0),
                "MAIN MENU",
                colors::GRAY,
                hover_gray,
                UiAction::MainMenu,
            ),
            resume: Button::new(
                centered(-40.0, 240.0, 60.0),
                "RESUME",
                colors::BLUE,
                colors::GREEN,
                UiAction::Resume,
            ),
            pause_menu: Button::new(
                centered(40.0, 240.0, 60.0),
                "MAIN MENU",
                colors::GRAY,
                hover_gray,
                UiAction::MainMenu,
            ),
            toggle_pause: Button::new(
                Rect::new(SCREEN_WIDTH - 60.0, 10.0, 50.0, 50.0),
                "||",
                colors::DARK_BLUE,
                colors::BLUE,
                UiAction::TogglePause,
            )
            .with_font_size(30.0),
            mute: Button::new(
                Rect::new(SCREEN_WIDTH - 120.0, 10.0, 50.0, 50.0),
                "VOL",
                colors::DARK_BLUE,
                colors::BLUE,
                UiAction::ToggleMute,
            )
            .with_font_size(24.0),
        }
    }

    /// Pause button reads `||` while playing and `>` while paused
    pub fn set_paused(&mut self, paused: bool) {
        self.toggle_pause.label = if paused { ">" } else { "||" };
    }

    /// Mute button greys out and reads `MUTE` while muted
    pub fn set_muted(&mut self, muted: bool) {
        if muted {
            self.mute.label = "MUTE";
            self.mute.color = MUTED_GRAY;
        } else {
            self.mute.label = "VOL";
            self.mute.color = colors::DARK_BLUE;
        }
    }
}
