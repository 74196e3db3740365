//! Scene drawing: background, entities, particles, buttons, HUD and overlays
//!
//! Pure functions of simulation state that emit primitives on a `Surface`.
//! Mode-level composition (what is drawn in which mode) lives in `game`.

use glam::Vec2;

use super::draw::{Surface, TextAnchor};
use crate::consts::*;
use crate::sim::{Collectible, Ghost, Obstacle, ObstacleKind, ParticleSystem, Rect};
use crate::ui::{Button, Buttons, CORNER_RADIUS, OUTLINE_WIDTH, SHADOW_OFFSET};
use crate::{Color, colors};

/// Gradient band height in pixels
const SKY_BAND: f32 = 4.0;
const GROUND_FILL: Color = Color::rgb(20, 60, 20);
const GROUND_RIDGE: Color = Color::rgb(40, 100, 40);
const CLOUD: Color = Color::rgba(255, 255, 255, 200);
const CLOUD_COUNT: usize = 5;

pub const FONT_SIZE: f32 = 36.0;
pub const BIG_FONT_SIZE: f32 = 80.0;

/// Sky color at a given screen row
pub fn sky_color(y: f32) -> Color {
    let y = y.max(0.0) as u32;
    let channel = |base: u32, div: u32| (base + y / div).min(255) as u8;
    Color::rgb(channel(20, 5), channel(20, 6), channel(50, 4))
}

/// Top-left of cloud `index` for a scroll offset and animation clock
pub fn cloud_position(index: usize, scroll: f32, clock: f32) -> Vec2 {
    let i = index as f32;
    let x = (scroll * 0.5 + i * 400.0).rem_euclid(SCREEN_WIDTH + 200.0) - 100.0;
    let y = 100.0 + i * 40.0 + (clock * 0.01 + i).sin() * 20.0;
    Vec2::new(x, y)
}

/// Sky gradient, ground band and drifting clouds
pub fn background(surface: &mut dyn Surface, scroll: f32, clock: f32) {
    let mut y = 0.0;
    while y < SCREEN_HEIGHT {
        surface.fill_rect(Rect::new(0.0, y, SCREEN_WIDTH, SKY_BAND), sky_color(y));
        y += SKY_BAND;
    }

    surface.fill_rect(
        Rect::new(0.0, GROUND_LINE, SCREEN_WIDTH, SCREEN_HEIGHT - GROUND_LINE),
        GROUND_FILL,
    );
    surface.line(
        Vec2::new(0.0, GROUND_LINE),
        Vec2::new(SCREEN_WIDTH, GROUND_LINE),
        4.0,
        GROUND_RIDGE,
    );

    for i in 0..CLOUD_COUNT {
        let pos = cloud_position(i, scroll, clock);
        surface.ellipse(Rect::new(pos.x, pos.y, 100.0, 50.0), CLOUD);
    }
}

pub fn ghost(surface: &mut dyn Surface, ghost: &Ghost) {
    let Vec2 { x, y } = ghost.pos;
    let draw_y = y + ghost.bob_offset();
    let half = GHOST_SIZE / 2.0;

    surface.circle(Vec2::new(x + 22.0, draw_y + 28.0), 30.0, colors::GHOST.with_alpha(80));
    surface.circle(Vec2::new(x + half, draw_y + half), half, colors::GHOST);

    // Wavy tail hanging off the lower half of the body
    let mut tail = Vec::with_capacity(7);
    tail.push(Vec2::new(x, draw_y + half));
    for i in 0..5 {
        let tx = x + i as f32 * GHOST_SIZE / 4.0;
        let ty = draw_y + GHOST_SIZE - 5.0 + (ghost.float_phase * 0.5 + i as f32).sin() * 8.0;
        tail.push(Vec2::new(tx, ty));
    }
    tail.push(Vec2::new(x + GHOST_SIZE, draw_y + half));
    surface.polygon(tail, colors::GHOST);

    let eye_y = draw_y + 15.0;
    for eye_x in [x + 8.0, x + 28.0] {
        surface.ellipse(Rect::new(eye_x, eye_y, 10.0, 14.0), colors::BLACK);
        surface.circle(Vec2::new(eye_x + 2.0, eye_y + 4.0), 3.0, colors::WHITE);
    }
}

pub fn obstacle(surface: &mut dyn Surface, obstacle: &Obstacle) {
    let hit = obstacle.hitbox();
    let (x, y) = (hit.x, hit.y);
    let color = obstacle.kind.color();
    match obstacle.kind {
        ObstacleKind::Tree => {
            surface.fill_rect(Rect::new(x + 12.0, y + 40.0, 16.0, 50.0), Color::rgb(80, 50, 20));
            surface.polygon(
                vec![
                    Vec2::new(x + 20.0, y),
                    Vec2::new(x, y + 60.0),
                    Vec2::new(x + 40.0, y + 60.0),
                ],
                color,
            );
            surface.polygon(
                vec![
                    Vec2::new(x + 20.0, y - 20.0),
                    Vec2::new(x + 5.0, y + 30.0),
                    Vec2::new(x + 35.0, y + 30.0),
                ],
                Color::rgb(40, 180, 40),
            );
        }
        ObstacleKind::Rock => {
            surface.circle(Vec2::new(x + 25.0, y + 20.0), 20.0, color);
            surface.circle(Vec2::new(x + 15.0, y + 15.0), 8.0, Color::rgb(100, 100, 100));
        }
        ObstacleKind::Bat => {
            let body_y = y + obstacle.flap_phase.sin() * 10.0;
            let wing_y = body_y - obstacle.flap_phase.cos() * 15.0;
            surface.polygon(
                vec![
                    Vec2::new(x + 20.0, body_y),
                    Vec2::new(x - 5.0, wing_y),
                    Vec2::new(x + 15.0, body_y + 10.0),
                ],
                color,
            );
            surface.polygon(
                vec![
                    Vec2::new(x + 20.0, body_y),
                    Vec2::new(x + 45.0, wing_y),
                    Vec2::new(x + 25.0, body_y + 10.0),
                ],
                color,
            );
            surface.circle(Vec2::new(x + 20.0, body_y), 10.0, Color::rgb(50, 20, 50));
            surface.circle(Vec2::new(x + 17.0, body_y - 2.0), 2.0, colors::RED);
            surface.circle(Vec2::new(x + 23.0, body_y - 2.0), 2.0, colors::RED);
        }
    }
}

pub fn collectible(surface: &mut dyn Surface, item: &Collectible) {
    if item.collected {
        return;
    }
    let size = (12.0 * item.glow_scale()).floor();
    let center = item.pos + Vec2::splat(12.0);
    surface.circle(item.pos + Vec2::splat(13.0), size + 8.0, Color::rgba(255, 255, 100, 100));
    surface.circle(center, size, colors::GOLD);
    surface.circle(center, (size / 2.0).floor(), colors::WHITE);
}

pub fn particles(surface: &mut dyn Surface, particles: &ParticleSystem) {
    for p in particles.iter() {
        if p.size < 0.5 {
            continue;
        }
        let alpha = (p.alpha() * 255.0) as u8;
        surface.circle(p.pos, p.size, p.color.with_alpha(alpha));
    }
}

/// Drop shadow, rounded fill, white outline and centered label
pub fn button(surface: &mut dyn Surface, button: &Button) {
    let rect = button.rect;
    surface.rounded_rect(
        rect.translated(Vec2::splat(SHADOW_OFFSET)),
        CORNER_RADIUS,
        Color::rgba(0, 0, 0, 100),
    );
    surface.rounded_rect(rect, CORNER_RADIUS, button.fill());
    surface.outline_rect(rect, CORNER_RADIUS, OUTLINE_WIDTH, colors::WHITE);
    surface.text(button.label, rect.center(), button.font_size, colors::WHITE, TextAnchor::Center);
}

/// Score, best score and the two HUD toggles
pub fn hud(surface: &mut dyn Surface, score: u64, high_score: u64, buttons: &Buttons) {
    surface.text(
        &format!("Score: {score}"),
        Vec2::new(20.0, 20.0),
        FONT_SIZE,
        colors::WHITE,
        TextAnchor::TopLeft,
    );
    surface.text(
        &format!("HI: {high_score}"),
        Vec2::new(20.0, 60.0),
        FONT_SIZE,
        colors::GOLD,
        TextAnchor::TopLeft,
    );
    hud_toggles(surface, buttons);
}

/// Pause and mute buttons, top right
pub fn hud_toggles(surface: &mut dyn Surface, buttons: &Buttons) {
    button(surface, &buttons.toggle_pause);
    button(surface, &buttons.mute);
}

/// Title with drop shadow and a ghost glyph
pub fn title(surface: &mut dyn Surface) {
    let center = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 3.0);
    surface.text(
        "GHOST RUN",
        center + Vec2::splat(4.0),
        BIG_FONT_SIZE,
        colors::BLACK,
        TextAnchor::Center,
    );
    surface.text("GHOST RUN", center, BIG_FONT_SIZE, colors::WHITE, TextAnchor::Center);
    surface.circle(
        Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0 - 50.0),
        30.0,
        colors::GHOST,
    );
}

/// Full-screen translucent black layer
pub fn dim(surface: &mut dyn Surface, alpha: u8) {
    surface.fill_rect(
        Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT),
        colors::BLACK.with_alpha(alpha),
    );
}

pub fn paused_banner(surface: &mut dyn Surface) {
    surface.text(
        "PAUSED",
        Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 3.0 - 50.0),
        BIG_FONT_SIZE,
        colors::WHITE,
        TextAnchor::Center,
    );
}

pub fn game_over_banner(surface: &mut dyn Surface, score: u64) {
    surface.text(
        "GAME OVER",
        Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 3.0),
        BIG_FONT_SIZE,
        colors::RED,
        TextAnchor::Center,
    );
    surface.text(
        &format!("Final Score: {score}"),
        Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 3.0 + 70.0),
        FONT_SIZE,
        colors::WHITE,
        TextAnchor::Center,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::draw::{DrawCommand, DrawList};

    #[test]
    fn test_sky_gradient() {
        assert_eq!(sky_color(0.0), Color::rgb(20, 20, 50));
        assert_eq!(sky_color(100.0), Color::rgb(40, 36, 75));
        // Blue saturates before the bottom of the screen
        assert_eq!(sky_color(719.0).b, 229);
        assert_eq!(sky_color(5000.0).b, 255);
    }

    #[test]
    fn test_clouds_wrap() {
        let a = cloud_position(0, 0.0, 0.0);
        assert_eq!(a.x, -100.0);
        let wrapped = cloud_position(0, -2.0 * (SCREEN_WIDTH + 200.0), 0.0);
        assert!((wrapped.x - a.x).abs() < 1e-3);
        for i in 0..CLOUD_COUNT {
            let p = cloud_position(i, -777.0, 12.0);
            assert!(p.x >= -100.0 && p.x < SCREEN_WIDTH + 100.0);
        }
    }

    #[test]
    fn test_background_covers_screen() {
        let mut list = DrawList::new();
        background(&mut list, 0.0, 0.0);
        let bands = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { rect, .. } if rect.h == SKY_BAND))
            .count();
        assert_eq!(bands, (SCREEN_HEIGHT / SKY_BAND) as usize);
        let clouds = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Ellipse { .. }))
            .count();
        assert_eq!(clouds, CLOUD_COUNT);
    }

    #[test]
    fn test_button_layers() {
        let mut list = DrawList::new();
        button(&mut list, &Buttons::new().start);
        let commands = list.commands();
        assert_eq!(commands.len(), 4);
        assert!(matches!(
            commands[2],
            DrawCommand::Rect { outline: Some(w), .. } if w == OUTLINE_WIDTH
        ));
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["START"]);
    }

    #[test]
    fn test_hud_text() {
        let mut list = DrawList::new();
        hud(&mut list, 120, 4000, &Buttons::new());
        let texts: Vec<_> = list.texts().collect();
        assert_eq!(texts, vec!["Score: 120", "HI: 4000", "||", "VOL"]);
    }

    #[test]
    fn test_collected_item_not_drawn() {
        let mut list = DrawList::new();
        let mut item = Collectible::new(Vec2::new(500.0, 400.0), 1.0);
        collectible(&mut list, &item);
        assert_eq!(list.len(), 3);
        item.collected = true;
        list.clear();
        collectible(&mut list, &item);
        assert!(list.is_empty());
    }
}
