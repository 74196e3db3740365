//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - One call to `Session::tick` per fixed 1/60 s frame
//! - Seeded RNG only (passed in by the caller)
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collectible;
pub mod collision;
pub mod ghost;
pub mod obstacle;
pub mod particles;
pub mod session;
pub mod spawn;

pub use autopilot::Autopilot;
pub use collectible::{COLLECTIBLE_SIZE, Collectible};
pub use collision::{CollisionReport, Rect, find_fatal, resolve};
pub use ghost::Ghost;
pub use obstacle::{Obstacle, ObstacleKind};
pub use particles::{Burst, Particle, ParticleSystem};
pub use session::{Session, SessionEvent};
pub use spawn::{SpawnDirector, choose_obstacle_kind, obstacle_threshold_floor};
