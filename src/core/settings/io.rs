use directories::UserDirs;
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::data::{path_display, Settings};
use super::error::SettingsError;

pub const SETTINGS_FILE_NAME: &str = "chat_app_config.json";

/// Reads and writes the settings document at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store at `<home>/Documents/chat_app_config.json`.
    pub fn default_location() -> Result<Self, SettingsError> {
        let dirs = UserDirs::new().ok_or(SettingsError::NoHomeDirectory)?;
        Ok(Self::new(
            dirs.home_dir().join("Documents").join(SETTINGS_FILE_NAME),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, returning defaults when the file is absent or corrupt.
    pub fn load(&self) -> Settings {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path_display(&self.path), "no settings file, using defaults");
                return Settings::default();
            }
            Err(err) => {
                warn!(path = %path_display(&self.path), error = %err, "failed to read settings, using defaults");
                return Settings::default();
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(document)) => Settings::from_document(document),
            Ok(_) => {
                warn!(path = %path_display(&self.path), "settings file is not a JSON object, using defaults");
                Settings::default()
            }
            Err(err) => {
                warn!(path = %path_display(&self.path), error = %err, "failed to parse settings, using defaults");
                Settings::default()
            }
        }
    }

    /// Overwrite the document with `settings`.
    ///
    /// The file is replaced atomically so a failed write never leaves a
    /// truncated document behind.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let write_error = |source: std::io::Error| SettingsError::Write {
            path: self.path.clone(),
            source,
        };

        let parent = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir).map_err(write_error)?;
        }

        let contents = serde_json::to_string_pretty(settings).map_err(SettingsError::Encode)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new_in("."),
        }
        .map_err(write_error)?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(write_error)?;
        temp_file.as_file_mut().sync_all().map_err(write_error)?;
        temp_file
            .persist(&self.path)
            .map_err(|err| write_error(err.error))?;

        debug!(path = %path_display(&self.path), theme = %settings.theme, model = %settings.model, "settings saved");
        Ok(())
    }

    /// Load, apply `mutator`, and save. Nothing is written if the mutator
    /// fails.
    pub fn mutate<F, T>(&self, mutator: F) -> Result<T, SettingsError>
    where
        F: FnOnce(&mut Settings) -> Result<T, SettingsError>,
    {
        let mut working = self.load();
        let result = mutator(&mut working)?;
        self.save(&working)?;
        Ok(result)
    }
}
