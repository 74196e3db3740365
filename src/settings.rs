//! Game settings and preferences
//!
//! Native builds read `ghost_run.json` from the working directory; the web
//! build keeps them in LocalStorage. Missing fields take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence::PersistError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Start with audio muted
    pub start_muted: bool,

    // === Visual Effects ===
    /// Particle effects (dust, debris, sparkles)
    pub particles: bool,
    /// Live particle cap
    pub max_particles: usize,

    // === Files ===
    /// Optional music file that replaces the synthesized loop (native only)
    pub music_path: PathBuf,
    /// High score record (native only)
    pub highscore_path: PathBuf,

    /// Fixed RNG seed; random per run when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            music_volume: 1.0,
            sfx_volume: 1.0,
            start_muted: false,

            particles: true,
            max_particles: 512,

            music_path: PathBuf::from("music.mp3"),
            highscore_path: PathBuf::from("highscore.json"),

            seed: None,
        }
    }
}

impl Settings {
    /// Settings file name (native)
    pub const FILE_NAME: &'static str = "ghost_run.json";

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "ghost_run_settings";

    /// Clamp out-of-range values
    pub fn sanitized(mut self) -> Self {
        let clamp = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 1.0 };
        self.master_volume = clamp(self.master_volume);
        self.music_volume = clamp(self.music_volume);
        self.sfx_volume = clamp(self.sfx_volume);
        self
    }

    /// Master × music
    pub fn effective_music_volume(&self) -> f32 {
        self.master_volume * self.music_volume
    }

    /// Master × effects
    pub fn effective_sfx_volume(&self) -> f32 {
        self.master_volume * self.sfx_volume
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.max_particles
        }
    }

    /// Parse a settings file
    pub fn load_from(path: &Path) -> Result<Self, PersistError> {
        let text = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&text)?;
        Ok(settings.sanitized())
    }

    /// Write a settings file
    pub fn save_to(&self, path: &Path) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<Settings>(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings.sanitized();
                    }
                    Err(e) => log::warn!("Ignoring malformed settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Persist to LocalStorage (WASM only); failures are logged
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok()).flatten() else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("LocalStorage rejected settings");
                }
            }
            Err(e) => log::warn!("Failed to encode settings: {e}"),
        }
    }

    /// Load `ghost_run.json` from the working directory (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = Path::new(Self::FILE_NAME);
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) if e.is_not_found() => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring malformed {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Write `ghost_run.json` to the working directory (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        let path = Path::new(Self::FILE_NAME);
        if let Err(e) = self.save_to(path) {
            log::warn!("Failed to save settings: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_relative_eq!(settings.effective_music_volume(), 0.8);
        assert_relative_eq!(settings.effective_sfx_volume(), 0.8);
        assert_eq!(settings.max_particles(), 512);
        assert_eq!(settings.music_path, PathBuf::from("music.mp3"));
    }

    #[test]
    fn test_partial_file_fills_defaults_and_clamps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(Settings::FILE_NAME);
        let json = r#"{"master_volume": 3.0, "sfx_volume": -1, "particles": false}"#;
        std::fs::write(&path, json).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
        assert_eq!(settings.music_volume, 1.0);
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(Settings::FILE_NAME);
        let settings = Settings {
            seed: Some(99),
            start_muted: true,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_malformed_file_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(Settings::FILE_NAME);
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(PersistError::Json(_))));
        assert!(Settings::load_from(&dir.path().join("absent.json")).unwrap_err().is_not_found());
    }
}
