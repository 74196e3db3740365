//! Persisted best score
//!
//! Wraps a `ScoreStore` and applies the recovery rules: a missing or broken
//! record reads as 0, and failed writes are logged and dropped.

use crate::persistence::ScoreStore;

/// The best score seen so far. Never decreases.
pub struct HighScore {
    best: u64,
    store: Box<dyn ScoreStore>,
}

impl std::fmt::Debug for HighScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScore").field("best", &self.best).finish()
    }
}

impl HighScore {
    /// Read the stored value, falling back to 0
    pub fn load(store: Box<dyn ScoreStore>) -> Self {
        let best = match store.load() {
            Ok(best) => {
                log::info!("Loaded high score {best}");
                best
            }
            Err(e) if e.is_not_found() => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Ignoring unreadable high score: {e}");
                0
            }
        };
        Self { best, store }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Record a finished session. Returns true (and writes through) only
    /// when `score` beats the current best.
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        match self.store.save(score) {
            Ok(()) => log::info!("New high score {score} saved"),
            Err(e) => log::warn!("Failed to save high score: {e}"),
        }
        true
    }
}
