//! Platform helpers shared by the native and browser shells
//!
//! The simulation advances in fixed 1/60 s ticks no matter how often the
//! host calls back; `FrameClock` turns wall-clock deltas into tick counts.
//! `Letterbox` fits the logical 1280x720 screen into any surface size.

use glam::Vec2;

use crate::consts::{MAX_SUBSTEPS, SCREEN_HEIGHT, SCREEN_WIDTH, SIM_DT};

/// Longest frame delta honoured (tab switches, debugger stops)
pub const MAX_FRAME_TIME: f32 = 0.1;

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FrameClock {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_substeps,
        }
    }

    /// Feed elapsed seconds, get the number of ticks to simulate now
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_TIME)
        } else {
            0.0
        };
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }
        // Spiral-of-death guard: drop what we could not catch up on
        if ticks == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        ticks
    }
}

/// Uniform scale plus centering offset from logical space to surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub offset: Vec2,
    pub surface: Vec2,
}

impl Letterbox {
    pub fn fit(width: u32, height: u32) -> Self {
        let surface = Vec2::new(width.max(1) as f32, height.max(1) as f32);
        let scale = (surface.x / SCREEN_WIDTH).min(surface.y / SCREEN_HEIGHT);
        let offset = (surface - Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT) * scale) / 2.0;
        Self { scale, offset, surface }
    }

    /// Logical point to surface pixels
    pub fn to_pixels(&self, logical: Vec2) -> Vec2 {
        self.offset + logical * self.scale
    }

    /// Surface pixels back to logical space (pointer input)
    pub fn to_logical(&self, pixels: Vec2) -> Vec2 {
        (pixels - self.offset) / self.scale
    }

    /// Logical point to normalized device coordinates (y up)
    pub fn to_ndc(&self, logical: Vec2) -> Vec2 {
        let p = self.to_pixels(logical) / self.surface;
        Vec2::new(p.x * 2.0 - 1.0, 1.0 - p.y * 2.0)
    }
}

/// Escape text for use as HTML element content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_60hz() {
        let mut clock = FrameClock::default();
        let total: u32 = (0..600).map(|_| clock.advance(1.0 / 60.0 + 1e-7)).sum();
        assert!((599..=600).contains(&total), "ticks {total}");
    }

    #[test]
    fn test_slow_host_accumulates() {
        let mut clock = FrameClock::default();
        // 144 Hz host: most frames run no tick
        let ticks: Vec<u32> = (0..144).map(|_| clock.advance(1.0 / 144.0)).collect();
        let total: u32 = ticks.iter().sum();
        assert!((59..=60).contains(&total));
        assert!(ticks.iter().all(|&t| t <= 1));
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(5.0), MAX_SUBSTEPS);
        // Backlog is dropped, at most one tick carries over
        assert!(clock.advance(0.0) <= 1);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_bad_deltas_ignored() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(f32::INFINITY), 0);
    }

    #[test]
    fn test_letterbox_wide_surface() {
        // 1920x720: pillarboxed, 320 px bars each side
        let fit = Letterbox::fit(1920, 720);
        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.offset, Vec2::new(320.0, 0.0));
        assert_eq!(fit.to_ndc(Vec2::ZERO), Vec2::new(-1.0 + 640.0 / 1920.0, 1.0));
        assert_eq!(fit.to_ndc(Vec2::new(640.0, 360.0)), Vec2::ZERO);
    }

    #[test]
    fn test_letterbox_round_trip() {
        let fit = Letterbox::fit(800, 800);
        assert_eq!(fit.scale, 800.0 / 1280.0);
        let pointer = Vec2::new(400.0, 400.0);
        let logical = fit.to_logical(pointer);
        assert!((logical - Vec2::new(640.0, 360.0)).length() < 1e-3);
        assert!((fit.to_pixels(logical) - pointer).length() < 1e-3);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Score: 120"), "Score: 120");
        assert_eq!(escape_html(">"), "&gt;");
        assert_eq!(
            escape_html("<b>\"A&B\"</b>"),
            "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;"
        );
    }
}
