use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use super::data::{path_display, AVAILABLE_MODELS};

/// Errors surfaced by settings persistence and validation.
///
/// Loading never produces one of these; a missing or corrupt document
/// silently yields defaults.
#[derive(Debug)]
pub enum SettingsError {
    /// No home directory could be determined for the settings file.
    NoHomeDirectory,

    /// Writing the settings document failed.
    Write {
        /// Path to the settings file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The settings could not be encoded as JSON.
    Encode(serde_json::Error),

    /// A model outside the selectable list was requested.
    UnknownModel(String),

    /// A theme name other than Dark or Light was requested.
    UnknownTheme(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::NoHomeDirectory => {
                write!(f, "Could not determine the home directory for settings")
            }
            SettingsError::Write { path, source } => {
                write!(
                    f,
                    "Failed to write settings at {}: {}",
                    path_display(path),
                    source
                )
            }
            SettingsError::Encode(source) => write!(f, "Failed to encode settings: {source}"),
            SettingsError::UnknownModel(model) => write!(
                f,
                "Unknown model '{}'. Available models: {}",
                model,
                AVAILABLE_MODELS.join(", ")
            ),
            SettingsError::UnknownTheme(theme) => {
                write!(f, "Unknown theme '{theme}'. Available themes: Dark, Light")
            }
        }
    }
}

impl StdError for SettingsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            SettingsError::Write { source, .. } => Some(source),
            SettingsError::Encode(source) => Some(source),
            SettingsError::NoHomeDirectory
            | SettingsError::UnknownModel(_)
            | SettingsError::UnknownTheme(_) => None,
        }
    }
}
