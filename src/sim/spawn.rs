//! Timer-driven spawning of obstacles and collectibles
//!
//! Both timers count Playing-mode ticks. Each tick the obstacle timer is
//! compared against a freshly rolled threshold whose floor shrinks as the
//! score grows, so cadence tightens with difficulty.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collectible::{Collectible, SPAWN_BAND_BOTTOM, SPAWN_BAND_TOP};
use super::obstacle::{Obstacle, ObstacleKind};
use crate::consts::SCREEN_WIDTH;

/// Score above which bats become the most likely obstacle
pub const BAT_HEAVY_SCORE: u64 = 500;
/// Spread added on top of the obstacle threshold floor
pub const OBSTACLE_THRESHOLD_SPREAD: u32 = 60;
/// Collectible threshold range (ticks, inclusive)
pub const COLLECTIBLE_THRESHOLD: (u32, u32) = (180, 300);

/// Lower bound of the obstacle spawn threshold for a score
pub fn obstacle_threshold_floor(score: u64) -> u32 {
    let reduction = (score / 50).min(100) as u32;
    100u32.saturating_sub(reduction).max(40)
}

/// Weights for (tree, rock, bat)
pub fn obstacle_weights(score: u64) -> [u32; 3] {
    if score > BAT_HEAVY_SCORE {
        [30, 30, 40]
    } else {
        [40, 40, 20]
    }
}

/// Weighted draw of the next obstacle kind
pub fn choose_obstacle_kind<R: Rng>(score: u64, rng: &mut R) -> ObstacleKind {
    let weights = obstacle_weights(score);
    let total: u32 = weights.iter().sum();
    let mut roll = rng.random_range(0..total);
    for (kind, weight) in ObstacleKind::ALL.into_iter().zip(weights) {
        if roll < weight {
            return kind;
        }
        roll -= weight;
    }
    ObstacleKind::Bat
}

/// What a spawn tick produced
#[derive(Debug, Clone, Default)]
pub struct Spawned {
    pub obstacle: Option<Obstacle>,
    pub collectible: Option<Collectible>,
}

/// Spawn timers for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnDirector {
    pub obstacle_timer: u32,
    pub collectible_timer: u32,
}

impl SpawnDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance both timers by one Playing tick
    pub fn tick<R: Rng>(&mut self, score: u64, difficulty: f32, rng: &mut R) -> Spawned {
        let mut spawned = Spawned::default();

        self.obstacle_timer += 1;
        let floor = obstacle_threshold_floor(score);
        let threshold = rng.random_range(floor..=floor + OBSTACLE_THRESHOLD_SPREAD);
        if self.obstacle_timer > threshold {
            let kind = choose_obstacle_kind(score, rng);
            spawned.obstacle = Some(Obstacle::new(kind, SCREEN_WIDTH, difficulty));
            self.obstacle_timer = 0;
        }

        self.collectible_timer += 1;
        let (lo, hi) = COLLECTIBLE_THRESHOLD;
        if self.collectible_timer > rng.random_range(lo..=hi) {
            let y = rng.random_range(SPAWN_BAND_TOP..=SPAWN_BAND_BOTTOM) as f32;
            spawned.collectible = Some(Collectible::new(Vec2::new(SCREEN_WIDTH, y), difficulty));
            self.collectible_timer = 0;
        }

        spawned
    }
}
