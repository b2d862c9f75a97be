//! User settings stored as `settings.json` in the platform config directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};

/// Overrides the directory the todo state is stored in.
pub const ENV_DATA_DIR: &str = "RUST_TODO_DATA_DIR";
/// Overrides the log level.
pub const ENV_LOG_LEVEL: &str = "RUST_TODO_LOG";

const SETTINGS_FILE: &str = "settings.json";

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "RustTodoApp")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where state is stored; the platform data directory when unset.
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: crate::logging::default_log_level().to_string(),
            window_width: 1100.0,
            window_height: 720.0,
        }
    }
}

impl Settings {
    /// Path of `settings.json`, if the platform has a config directory.
    pub fn path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Load from the default location, writing defaults on first run, then
    /// apply environment overrides.
    pub fn load() -> Self {
        let settings = match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                let settings = Self::default();
                if let Err(err) = settings.save_to(&path) {
                    log::warn!("event=settings_save module=config status=error error={err}");
                }
                settings
            }
            None => Self::default(),
        };
        settings.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Missing or unreadable files give the defaults.
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save_to(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| StorageError::io(path, e))
    }

    /// Apply `RUST_TODO_DATA_DIR` / `RUST_TODO_LOG` as read by `lookup`.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir.trim()));
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            self.log_level = level.trim().to_string();
        }
        self
    }

    pub fn data_dir(&self) -> StorageResult<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => project_dirs()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or(StorageError::NoDataDir),
        }
    }

    pub fn log_dir(&self) -> StorageResult<PathBuf> {
        Ok(self.data_dir()?.join("logs"))
    }
}
