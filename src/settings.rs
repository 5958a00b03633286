//! User settings
//!
//! Loaded once at start-up from `settings.json` in the tagkit config
//! directory (or a file given with `--config`). Every field is optional in the
//! file; anything missing takes its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Player used for track previews; `ffplay` on PATH when unset
    pub player_path: Option<PathBuf>,
    /// Where previews start, in seconds
    pub preview_offset_secs: u64,
    /// Folder for files without a genre
    pub unknown_genre: String,
    /// Prefix removed by `strip-prefix`
    pub filename_prefix: String,
    /// Marker removed from comments by `strip-comment`
    pub comment_marker: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_path: None,
            preview_offset_secs: 60,
            unknown_genre: "Unknown".to_string(),
            filename_prefix: "undefined - ".to_string(),
            comment_marker: "color=".to_string(),
        }
    }
}

impl Settings {
    const SETTINGS_FILE: &'static str = "settings.json";

    /// Default location: `<config dir>/tagkit/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tagkit").join(Self::SETTINGS_FILE))
    }

    /// Load settings
    ///
    /// An explicit path must exist and parse. Without one, the default file
    /// is used when present and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, String> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(settings) => {
                    log::debug!("Loaded settings from {}", path.display());
                    Ok(settings)
                }
                Err(e) => {
                    log::warn!("Using default settings: {}", e);
                    Ok(Self::default())
                }
            },
            _ => {
                log::debug!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings {}: {}", path.display(), e))?;

        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse settings {}: {}", path.display(), e))
    }

    /// Save settings to `path`, creating its folder if needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create settings directory: {}", e))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        fs::write(path, json).map_err(|e| format!("Failed to write settings: {}", e))?;

        log::debug!("Saved settings to {:?}", path);
        Ok(())
    }
}
