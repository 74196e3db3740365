//! High score persistence
//!
//! One record, `{"highscore": N}`, behind a small store trait:
//! - `JsonFileStore`: a JSON file on disk (native)
//! - `LocalStorageStore`: a LocalStorage key (wasm32)
//! - `MemoryStore`: in-process, for tests and headless runs
//!
//! Stores report errors; `HighScore` decides how to recover from them.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persistence failures
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl PersistError {
    /// Missing file or key, as opposed to a broken one
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// On-disk shape of the high score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub highscore: u64,
}

/// Read/write a single integer
pub trait ScoreStore {
    fn load(&self) -> Result<u64, PersistError>;
    fn save(&mut self, score: u64) -> Result<(), PersistError>;
}

/// `{"highscore": N}` in a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<u64, PersistError> {
        let text = std::fs::read_to_string(&self.path)?;
        let record: ScoreRecord = serde_json::from_str(&text)?;
        Ok(record.highscore)
    }

    fn save(&mut self, score: u64) -> Result<(), PersistError> {
        let json = serde_json::to_string(&ScoreRecord { highscore: score })?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<Cell<Option<u64>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(score: u64) -> Self {
        Self {
            value: Rc::new(Cell::new(Some(score))),
        }
    }

    pub fn get(&self) -> Option<u64> {
        self.value.get()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, PersistError> {
        self.value.get().ok_or_else(|| {
            PersistError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no score stored",
            ))
        })
    }

    fn save(&mut self, score: u64) -> Result<(), PersistError> {
        self.value.set(Some(score));
        Ok(())
    }
}

/// `{"highscore": N}` under a LocalStorage key
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub const DEFAULT_KEY: &'static str = "ghost_run_highscore";

    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, PersistError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistError::Unavailable("LocalStorage".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn load(&self) -> Result<u64, PersistError> {
        let json = Self::storage()?
            .get_item(&self.key)
            .map_err(|_| PersistError::Unavailable("LocalStorage read".into()))?
            .ok_or_else(|| {
                let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no score stored");
                PersistError::Io(missing)
            })?;
        let record: ScoreRecord = serde_json::from_str(&json)?;
        Ok(record.highscore)
    }

    fn save(&mut self, score: u64) -> Result<(), PersistError> {
        let json = serde_json::to_string(&ScoreRecord { highscore: score })?;
        Self::storage()?
            .set_item(&self.key, &json)
            .map_err(|_| PersistError::Unavailable("LocalStorage write".into()))
    }
}
