use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::SettingsError;

/// Models offered for selection, in display order.
pub const AVAILABLE_MODELS: &[&str] = &["gpt-4", "gpt-4-turbo", "gpt-4o"];

pub const DEFAULT_MODEL: &str = "gpt-4-turbo";

const THEME_KEY: &str = "theme";
const MODEL_KEY: &str = "model";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Terminal colours used when printing turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    White,
    Black,
    LightBlue,
}

impl TextColor {
    pub fn ansi(self) -> &'static str {
        match self {
            TextColor::White => "\x1b[97m",
            TextColor::Black => "\x1b[30m",
            TextColor::LightBlue => "\x1b[94m",
        }
    }
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Dark, Theme::Light];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }

    /// Colour for user turns; chosen to contrast with the theme background.
    pub fn text_color(self) -> TextColor {
        match self {
            Theme::Dark => TextColor::White,
            Theme::Light => TextColor::Black,
        }
    }

    pub fn assistant_color(self) -> TextColor {
        match self {
            Theme::Dark | Theme::Light => TextColor::LightBlue,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| SettingsError::UnknownTheme(value.to_string()))
    }
}

pub fn is_available_model(model: &str) -> bool {
    AVAILABLE_MODELS.contains(&model)
}

/// Persisted user preferences.
///
/// Keys this version does not understand are carried in `extra` so a save
/// never drops data written by another version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub theme: Theme,
    pub model: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            model: DEFAULT_MODEL.to_string(),
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Build settings from a parsed document, falling back per key.
    pub fn from_document(mut document: Map<String, Value>) -> Self {
        let defaults = Settings::default();

        let theme = match document.remove(THEME_KEY) {
            Some(value) => match value.as_str().map(str::parse::<Theme>) {
                Some(Ok(theme)) => theme,
                _ => {
                    tracing::warn!(%value, "ignoring unrecognized theme in settings");
                    defaults.theme
                }
            },
            None => defaults.theme,
        };

        let model = match document.remove(MODEL_KEY) {
            Some(Value::String(model)) if is_available_model(&model) => model,
            Some(value) => {
                tracing::warn!(%value, "ignoring unrecognized model in settings");
                defaults.model
            }
            None => defaults.model,
        };

        Self {
            theme,
            model,
            extra: document,
        }
    }

    pub fn set_model(&mut self, model: &str) -> Result<(), SettingsError> {
        let model = model.trim();
        if !is_available_model(model) {
            return Err(SettingsError::UnknownModel(model.to_string()));
        }
        self.model = model.to_string();
        Ok(())
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Keys preserved from disk that this version does not interpret.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn print_all(&self) {
        println!("Current settings:");
        println!("  theme: {}", self.theme);
        println!("  model: {}", self.model);
        if !self.extra.is_empty() {
            let mut keys: Vec<_> = self.extra.keys().collect();
            keys.sort();
            println!(
                "  preserved keys: {}",
                keys.into_iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
}

/// Get a user-friendly display string for a path, using `~` for the home
/// directory on Unix-like systems.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
