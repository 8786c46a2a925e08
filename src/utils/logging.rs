use chrono::Local;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::conversation::Conversation;
use crate::core::message::Turn;

/// Appends displayed turns to a plain-text transcript file.
pub struct LoggingState {
    file_path: Option<PathBuf>,
    is_active: bool,
}

impl LoggingState {
    /// Start logging to `log_file` right away when one is given.
    pub fn new(log_file: Option<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut logging = LoggingState {
            file_path: None,
            is_active: false,
        };
        if let Some(path) = log_file {
            logging.set_log_file(path)?;
        }
        Ok(logging)
    }

    pub fn set_log_file(
        &mut self,
        path: impl Into<PathBuf>,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let path = path.into();
        test_file_access(&path)?;

        self.file_path = Some(path.clone());
        self.is_active = true;
        self.log_note(&format!(
            "Logging started at {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ))?;

        Ok(format!("Logging enabled to: {}", path.display()))
    }

    pub fn toggle_logging(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        let Some(path) = self.file_path.clone() else {
            return Err("No log file specified. Use /log <filename> to enable logging first.".into());
        };

        if self.is_active {
            // Written before pausing so the gap is visible in the file.
            self.log_note(&format!(
                "Logging paused at {}",
                Local::now().format("%Y-%m-%d %H:%M:%S")
            ))?;
            self.is_active = false;
            Ok(format!("Logging paused (file: {})", path.display()))
        } else {
            self.is_active = true;
            Ok(format!("Logging resumed to: {}", path.display()))
        }
    }

    pub fn log_turn(&self, turn: &Turn) -> Result<(), Box<dyn std::error::Error>> {
        self.write_block(&turn.to_string())
    }

    fn log_note(&self, note: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.write_block(&format!("## {note}"))
    }

    fn write_block(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = self.file_path.as_ref().filter(|_| self.is_active) else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        // Blank line between turns, matching the on-screen spacing.
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn status_string(&self) -> String {
        let file_name = |path: &Path| {
            path.file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned()
        };
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!("active ({})", file_name(path)),
            (Some(path), false) => format!("paused ({})", file_name(path)),
        }
    }
}

fn test_file_access(path: &Path) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.flush()
}

/// Write the whole transcript to a new file. Existing files are never
/// overwritten.
pub fn dump_transcript(conversation: &Conversation, path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let mut writer = BufWriter::new(file);

    for turn in conversation.turns() {
        for line in turn.to_string().lines() {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    writer.get_ref().sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn disabled_logging_writes_nothing() {
        let logging = LoggingState::new(None).unwrap();
        assert!(!logging.is_active());
        assert_eq!(logging.status_string(), "disabled");
        logging.log_turn(&Turn::user("hi")).unwrap();
    }

    #[test]
    fn turns_are_appended_with_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chat.log");
        let logging = LoggingState::new(Some(path.clone())).unwrap();

        logging.log_turn(&Turn::user("Hello")).unwrap();
        logging
            .log_turn(&Turn::assistant("Hi!\nHow can I help?"))
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("## Logging started at "));
        assert!(contents.ends_with("User: Hello\n\nChatGPT: Hi!\nHow can I help?\n\n"));
        assert_eq!(logging.status_string(), "active (chat.log)");
    }

    #[test]
    fn paused_logging_skips_turns_until_resumed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chat.log");
        let mut logging = LoggingState::new(Some(path.clone())).unwrap();

        let message = logging.toggle_logging().unwrap();
        assert!(message.starts_with("Logging paused"));
        logging.log_turn(&Turn::user("hidden")).unwrap();

        let message = logging.toggle_logging().unwrap();
        assert!(message.starts_with("Logging resumed"));
        logging.log_turn(&Turn::user("visible")).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("## Logging paused at "));
        assert!(!contents.contains("hidden"));
        assert!(contents.contains("User: visible"));
    }

    #[test]
    fn toggle_without_file_is_an_error() {
        let mut logging = LoggingState::new(None).unwrap();
        assert!(logging.toggle_logging().is_err());
    }

    #[test]
    fn dump_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dump.txt");
        let mut conversation = Conversation::new();
        conversation.append("User", "Hello");
        conversation.append("ChatGPT", "Hi");

        dump_transcript(&conversation, &path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "User: Hello\n\nChatGPT: Hi\n\n"
        );

        let err = dump_transcript(&conversation, &path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
    }
}
