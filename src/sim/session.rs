//! One play-through: the ghost, live entities, score and spawn timers
//!
//! `Session::tick` advances a single Playing-mode frame in a fixed order:
//! ghost physics, obstacle scroll and scoring, collectible scroll, spawns,
//! then collisions. Everything it reports back is a `SessionEvent` so the
//! caller can route effects (particles, audio, mode change) without the
//! simulation knowing about them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collectible::Collectible;
use super::collision;
use super::ghost::Ghost;
use super::obstacle::{Obstacle, ObstacleKind};
use super::spawn::SpawnDirector;
use crate::consts::*;
use crate::difficulty_multiplier;

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// An obstacle scrolled off uncollided (+10)
    ObstaclePassed { kind: ObstacleKind },
    /// A collectible was picked up (+50); `pos` is its top-left corner
    Collected { pos: Vec2 },
    /// The ghost hit an obstacle; the session is over
    Crashed {
        kind: ObstacleKind,
        ghost_pos: Vec2,
        obstacle_pos: Vec2,
    },
}

/// Session state, reset on every start/restart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub ghost: Ghost,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    /// Never decreases while the session lives
    pub score: u64,
    pub spawner: SpawnDirector,
    /// Playing ticks simulated so far
    pub ticks: u64,
    /// Set once a crash has been reported; further ticks are no-ops
    pub crashed: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            ghost: Ghost::new(),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            score: 0,
            spawner: SpawnDirector::new(),
            ticks: 0,
            crashed: false,
        }
    }

    /// Current speed multiplier
    #[inline]
    pub fn difficulty(&self) -> f32 {
        difficulty_multiplier(self.score)
    }

    /// Jump request. True when the ghost actually left the ground.
    pub fn jump(&mut self) -> bool {
        if self.crashed {
            return false;
        }
        self.ghost.jump()
    }

    /// Advance one Playing frame
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.crashed {
            return events;
        }
        self.ticks += 1;

        self.ghost.update();
        let difficulty = self.difficulty();

        // Scroll, then drop and score whatever left the screen
        for obstacle in &mut self.obstacles {
            obstacle.update();
        }
        let mut passed = Vec::new();
        self.obstacles.retain_mut(|obstacle| {
            if obstacle.is_off_screen() {
                if obstacle.mark_passed() {
                    passed.push(obstacle.kind);
                }
                false
            } else {
                true
            }
        });
        for kind in passed {
            self.score += OBSTACLE_PASS_POINTS;
            events.push(SessionEvent::ObstaclePassed { kind });
        }

        for collectible in &mut self.collectibles {
            collectible.update();
        }
        self.collectibles.retain(|c| !c.is_off_screen());

        let spawned = self.spawner.tick(self.score, difficulty, rng);
        self.obstacles.extend(spawned.obstacle);
        self.collectibles.extend(spawned.collectible);

        let hitbox = self.ghost.hitbox();
        let report = collision::resolve(&hitbox, &self.obstacles, &mut self.collectibles);
        if let Some(index) = report.fatal {
            let obstacle = &self.obstacles[index];
            let hit = obstacle.hitbox();
            log::trace!("crash into {:?} at tick {}", obstacle.kind, self.ticks);
            events.push(SessionEvent::Crashed {
                kind: obstacle.kind,
                ghost_pos: self.ghost.pos,
                obstacle_pos: Vec2::new(hit.x, hit.y),
            });
            self.crashed = true;
            return events;
        }
        for item in report.collected {
            self.score += COLLECTIBLE_POINTS;
            events.push(SessionEvent::Collected { pos: item.pos });
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn grounded_session() -> Session {
        let mut session = Session::new();
        while !session.ghost.on_ground {
            session.ghost.update();
        }
        session
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert_eq!(session.score, 0);
        assert!(session.obstacles.is_empty());
        assert!(session.collectibles.is_empty());
        assert_eq!(session.difficulty(), 1.0);
    }

    #[test]
    fn test_passing_obstacle_scores_ten_once() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut session = grounded_session();
        // A bat flies over a grounded ghost
        session.obstacles.push(Obstacle::new(ObstacleKind::Bat, -35.0, 1.0));
        let events = session.tick(&mut rng);
        assert!(events.contains(&SessionEvent::ObstaclePassed { kind: ObstacleKind::Bat }));
        assert_eq!(session.score, 10);
        assert!(session.obstacles.iter().all(|o| o.kind != ObstacleKind::Bat || o.x > 0.0));

        session.tick(&mut rng);
        assert_eq!(session.score, 10);
    }

    #[test]
    fn test_collectible_scores_fifty() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut session = grounded_session();
        let ghost = session.ghost.hitbox();
        // Placed so that after one 5 px scroll it still overlaps the ghost
        session
            .collectibles
            .push(Collectible::new(Vec2::new(ghost.x + 10.0, ghost.y + 5.0), 1.0));
        let events = session.tick(&mut rng);
        assert_eq!(session.score, 50);
        assert!(matches!(events.last(), Some(SessionEvent::Collected { .. })));
        assert!(session.collectibles.iter().all(|c| c.pos.x > 1000.0));
    }

    #[test]
    fn test_crash_ends_tick_and_freezes_session() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut session = grounded_session();
        session
            .obstacles
            .push(Obstacle::new(ObstacleKind::Rock, GHOST_X + 8.0, 1.0));
        session
            .collectibles
            .push(Collectible::new(session.ghost.pos + Vec2::new(5.0, 5.0), 1.0));

        let events = session.tick(&mut rng);
        assert!(matches!(
            events.last(),
            Some(SessionEvent::Crashed { kind: ObstacleKind::Rock, .. })
        ));
        assert!(session.crashed);
        assert_eq!(session.score, 0, "pickup is skipped on a fatal frame");

        let ticks = session.ticks;
        assert!(session.tick(&mut rng).is_empty());
        assert_eq!(session.ticks, ticks);
        assert!(!session.jump());
    }

    #[test]
    fn test_jump_clears_a_rock() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut session = grounded_session();
        session.spawner.obstacle_timer = 0;
        session.obstacles.push(Obstacle::new(ObstacleKind::Rock, 400.0, 1.0));
        let mut passed = false;
        for _ in 0..200 {
            let rock_gap = session
                .obstacles
                .iter()
                .find(|o| o.kind == ObstacleKind::Rock)
                .map(|o| o.x - session.ghost.hitbox().right());
            if matches!(rock_gap, Some(gap) if gap < 40.0) {
                session.jump();
            }
            let events = session.tick(&mut rng);
            // Keep the field clear of spawned obstacles
            session.obstacles.retain(|o| o.x < 1000.0);
            assert!(!session.crashed, "crashed: {events:?}");
            if session.obstacles.is_empty() {
                passed = true;
                break;
            }
        }
        assert!(passed);
    }

    proptest! {
        #[test]
        fn prop_score_monotone(
            seed in any::<u64>(),
            jumps in proptest::collection::vec(any::<bool>(), 1..600),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut session = Session::new();
            let mut last = 0;
            for press in jumps {
                if press {
                    session.jump();
                }
                for event in session.tick(&mut rng) {
                    if let SessionEvent::Crashed { .. } = event {
                        prop_assert!(session.crashed);
                    }
                }
                prop_assert!(session.score >= last);
                prop_assert_eq!((session.score - last) % 10, 0);
                last = session.score;
                prop_assert!(session.ghost.pos.y + GHOST_SIZE <= GROUND_LINE + 1e-3);
            }
        }
    }
}
