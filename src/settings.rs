//! Game settings and preferences
//!
//! Persisted as JSON beside the game. Gameplay tuning is not configurable;
//! see [`crate::consts`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence::StoreError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Loop background music while playing
    pub music_enabled: bool,
    /// Silence everything
    pub muted: bool,

    // === Simulation ===
    /// Fixed base seed for reproducible runs (random if unset)
    pub seed: Option<u64>,

    // === Storage ===
    /// Local best score file, relative to the settings file's directory
    pub high_score_file: PathBuf,
    /// Leaderboard file, relative to the settings file's directory
    pub leaderboard_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 0.09,
            music_enabled: true,
            muted: false,
            seed: None,
            high_score_file: PathBuf::from("highscore.json"),
            leaderboard_file: PathBuf::from("leaderboard.json"),
        }
    }
}

impl Settings {
    /// Clamp volumes into range after loading hand-edited files
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self
    }

    /// Effective sound effect volume (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music volume (respects mute and the music toggle)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted || !self.music_enabled {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Resolve the store files against the directory holding the settings
    /// file (the working directory when there is none). Absolute paths are
    /// kept as they are.
    pub fn store_paths(&self, settings_path: Option<&Path>) -> (PathBuf, PathBuf) {
        let base = settings_path
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new(""));
        (
            base.join(&self.high_score_file),
            base.join(&self.leaderboard_file),
        )
    }

    /// Load settings, falling back to defaults if the file is missing or bad
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings.sanitized();
                }
                Err(e) => log::warn!("Ignoring malformed settings {}: {}", path.display(), e),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Could not read settings {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults_and_clamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "master_volume": 3.0, "seed": 42 }"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.music_volume, 0.09);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            muted: true,
            seed: Some(7),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        assert_eq!(settings.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn test_store_paths_sit_beside_settings_file() {
        let settings = Settings::default();
        let (best, board) = settings.store_paths(Some(Path::new("/srv/pop/settings.json")));
        assert_eq!(best, PathBuf::from("/srv/pop/highscore.json"));
        assert_eq!(board, PathBuf::from("/srv/pop/leaderboard.json"));

        let (best, _) = settings.store_paths(None);
        assert_eq!(best, PathBuf::from("highscore.json"));

        let settings = Settings {
            leaderboard_file: PathBuf::from("/var/board.json"),
            ..Default::default()
        };
        let (_, board) = settings.store_paths(Some(Path::new("conf/settings.json")));
        assert_eq!(board, PathBuf::from("/var/board.json"));
    }

    #[test]
    fn test_music_toggle() {
        let settings = Settings {
            music_enabled: false,
            ..Default::default()
        };
        assert_eq!(settings.effective_music_volume(), 0.0);
        assert_eq!(Settings::default().effective_music_volume(), 0.09);
    }
}
