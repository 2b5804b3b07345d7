//! Settings persistence
//!
//! Saves and loads [`EngineSettings`] to/from a JSON file.
//!
//! # File Location
//!
//! Settings are stored in `settings.json` in the platform configuration
//! directory, e.g. `~/.config/tars/settings.json` on Linux. `--settings`
//! points the tool at another file.
//!
//! # Error Handling
//!
//! Loading never fails: a missing or unreadable file means default settings,
//! and the reason is reported through [`LoadOutcome`] so it can be logged
//! once the subscriber is installed. Saving reports errors to the caller.

use super::error::AppResult;
use super::settings::EngineSettings;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// How [`load_settings`] obtained its settings
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded,
    Missing,
    /// The file exists but could not be read or parsed; defaults were used
    Failed(String),
}

impl LoadOutcome {
    pub fn log(&self, path: &Path) {
        match self {
            LoadOutcome::Loaded => info!("[SETTINGS] Loaded settings from {:?}", path),
            LoadOutcome::Missing => {
                info!("[SETTINGS] No settings file found at {:?}. Using defaults.", path)
            }
            LoadOutcome::Failed(reason) => warn!(
                "[SETTINGS] Failed to load settings file at {:?}: {}. Using defaults.",
                path, reason
            ),
        }
    }
}

/// Path of `settings.json` in the user's configuration directory
///
/// Falls back to `settings.json` in the working directory if the platform
/// has no config directory.
pub fn settings_path() -> PathBuf {
    match ProjectDirs::from("org", "tars", "tars") {
        Some(dirs) => dirs.config_dir().join(SETTINGS_FILENAME),
        None => PathBuf::from(SETTINGS_FILENAME),
    }
}

/// Read settings, falling back to defaults
pub fn load_settings(path: &Path) -> (EngineSettings, LoadOutcome) {
    if !path.exists() {
        return (EngineSettings::default(), LoadOutcome::Missing);
    }
    match read_settings(path) {
        Ok(settings) => (settings, LoadOutcome::Loaded),
        Err(err) => (EngineSettings::default(), LoadOutcome::Failed(err.to_string())),
    }
}

fn read_settings(path: &Path) -> AppResult<EngineSettings> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write settings as pretty JSON, creating the directory if needed
pub fn save_settings(path: &Path, settings: &EngineSettings) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    info!("[SETTINGS] Saved settings to {:?}", path);
    Ok(())
}
