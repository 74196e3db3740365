//! Attract-mode pilot
//!
//! Jumps when a ground obstacle is about to reach the ghost. Bats are
//! ignored; a grounded ghost already passes under them.

use super::session::Session;

/// Frames of warning before a ground obstacle reaches the ghost
pub const DEFAULT_LEAD_FRAMES: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Autopilot {
    pub lead_frames: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            lead_frames: DEFAULT_LEAD_FRAMES,
        }
    }
}

impl Autopilot {
    /// True when the ghost is grounded and a tree or rock is inside the lead window
    pub fn wants_jump(&self, session: &Session) -> bool {
        if !session.ghost.on_ground || session.crashed {
            return false;
        }
        let front = session.ghost.hitbox().right();
        session
            .obstacles
            .iter()
            .filter(|o| o.kind.is_grounded())
            .any(|o| {
                let gap = o.x - front;
                gap > 0.0 && gap <= o.speed * self.lead_frames
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{Obstacle, ObstacleKind};
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
    fn test_ignores_far_obstacles_and_bats() {
        let pilot = Autopilot::default();
        let mut session = grounded_session();
        session.obstacles.push(Obstacle::new(ObstacleKind::Tree, 900.0, 1.0));
        session.obstacles.push(Obstacle::new(ObstacleKind::Bat, 200.0, 1.0));
        assert!(!pilot.wants_jump(&session));

        session.obstacles[0].x = 230.0;
        assert!(pilot.wants_jump(&session));
    }

    #[test]
    fn test_never_asks_while_airborne() {
        let pilot = Autopilot::default();
        let mut session = grounded_session();
        session.obstacles.push(Obstacle::new(ObstacleKind::Rock, 220.0, 1.0));
        assert!(session.jump());
        assert!(!pilot.wants_jump(&session));
    }

    #[test]
    fn test_clears_ground_obstacles_at_speed() {
        let pilot = Autopilot::default();
        for difficulty in [1.0, 1.5, 2.0] {
            for kind in [ObstacleKind::Tree, ObstacleKind::Rock] {
                let mut rng = Pcg32::seed_from_u64(11);
                let mut session = grounded_session();
                session.obstacles.push(Obstacle::new(kind, 700.0, difficulty));
                for _ in 0..200 {
                    if pilot.wants_jump(&session) {
                        session.jump();
                    }
                    session.tick(&mut rng);
                    // Only the scripted obstacle stays on the field
                    session.obstacles.retain(|o| o.x < 1000.0);
                    assert!(!session.crashed, "{kind:?} at x{difficulty}");
                }
                assert!(session.obstacles.is_empty());
            }
        }
    }
}
