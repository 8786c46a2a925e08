pub mod data;
pub mod error;
pub mod io;

pub use data::{is_available_model, Settings, TextColor, Theme, AVAILABLE_MODELS, DEFAULT_MODEL};
pub use error::SettingsError;
pub use io::{SettingsStore, SETTINGS_FILE_NAME};
