//! Axis-aligned hit-box tests between the ghost and the entity lists
//!
//! Obstacles are checked before collectibles. A fatal hit ends the frame:
//! collectibles touched on that same frame are left alone.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collectible::Collectible;
use super::obstacle::Obstacle;

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap; rectangles that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Point containment (left/top edges inclusive)
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Same rectangle shifted by an offset
    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }
}

/// Outcome of one frame's collision pass
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    /// Index of the obstacle the ghost ran into, if any
    pub fatal: Option<usize>,
    /// Collectibles picked up this frame (already removed from the live list)
    pub collected: Vec<Collectible>,
}

impl CollisionReport {
    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.fatal.is_some()
    }
}

/// First obstacle (in list order) overlapping the ghost
pub fn find_fatal(ghost_box: &Rect, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles
        .iter()
        .position(|obstacle| ghost_box.intersects(&obstacle.hitbox()))
}

/// Resolve ghost collisions for one frame.
///
/// Picked-up collectibles are marked, moved out of `collectibles` and
/// returned in the report; the caller awards points.
pub fn resolve(
    ghost_box: &Rect,
    obstacles: &[Obstacle],
    collectibles: &mut Vec<Collectible>,
) -> CollisionReport {
    if let Some(index) = find_fatal(ghost_box, obstacles) {
        return CollisionReport {
            fatal: Some(index),
            collected: Vec::new(),
        };
    }

    let mut collected = Vec::new();
    let mut remaining = Vec::with_capacity(collectibles.len());
    for mut item in collectibles.drain(..) {
        if !item.collected && ghost_box.intersects(&item.hitbox()) {
            item.collected = true;
            collected.push(item);
        } else {
            remaining.push(item);
        }
    }
    *collectibles = remaining;

    CollisionReport {
        fatal: None,
        collected,
    }
}
