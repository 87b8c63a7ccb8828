//! Game settings and preferences
//!
//! Read from a JSON file next to the game; anything missing falls back to
//! the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_SCREEN_HEIGHT, BASE_SCREEN_WIDTH, FRAME_MILLIS};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Log the debug snapshot every frame
    pub show_debug: bool,

    // === Levels ===
    /// Directory holding one sub-directory per level
    pub levels_root: PathBuf,
    /// Reload level definitions when files under `levels_root` change
    pub watch_levels: bool,

    // === Audio ===
    pub audio_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Loop ===
    /// Base seed for enemy placement and velocities
    pub seed: u64,
    /// Frame time (ms)
    pub frame_millis: u64,
    /// Stop after this many frames (headless runs); `None` runs forever
    pub max_frames: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: BASE_SCREEN_WIDTH,
            screen_height: BASE_SCREEN_HEIGHT,
            show_debug: false,

            levels_root: PathBuf::from("levels"),
            watch_levels: true,

            audio_enabled: true,
            master_volume: 0.8,

            seed: 0x5eed,
            frame_millis: FRAME_MILLIS,
            max_frames: Some(3_600),
        }
    }
}

impl Settings {
    /// Volume actually applied (0 when audio is off)
    pub fn effective_volume(&self) -> f32 {
        if self.audio_enabled {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Load settings from `path`, falling back to defaults when the file
    /// is missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "seed": 7, "audio_enabled": false }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert!(!settings.audio_enabled);
        assert_eq!(settings.screen_width, BASE_SCREEN_WIDTH);
        assert_eq!(settings.frame_millis, FRAME_MILLIS);
    }

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_volume(), 0.8);
        settings.master_volume = 3.0;
        assert_eq!(settings.effective_volume(), 1.0);
        settings.audio_enabled = false;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load_from(Path::new("/nonexistent/space-rocks/settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("space-rocks-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");

        let settings = Settings {
            show_debug: true,
            max_frames: None,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
