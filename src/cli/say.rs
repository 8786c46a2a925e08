//! One-shot "say" command

use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;

use tokio::sync::mpsc;

use crate::core::session::{provider_error_text, ChatSession, SendError};

/// Send `prompt` once and stream the reply to stdout.
///
/// A provider failure prints the error text to stderr and yields
/// `ExitCode::FAILURE`; it is not treated as an error of the program.
pub async fn run_say(mut session: ChatSession, prompt: &str) -> Result<ExitCode, Box<dyn Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let printer = async {
        while let Some(chunk) = rx.recv().await {
            print!("{chunk}");
            let _ = io::stdout().flush();
        }
    };

    let (result, ()) = tokio::join!(session.exchange(prompt, Some(tx)), printer);

    match result {
        Ok(_) => {
            println!();
            Ok(ExitCode::SUCCESS)
        }
        Err(SendError::Provider(err)) => {
            eprintln!("\n❌ {}", provider_error_text(&err));
            Ok(ExitCode::FAILURE)
        }
        Err(SendError::EmptyMessage) => {
            eprintln!("Usage: chatdesk say <prompt>");
            Ok(ExitCode::FAILURE)
        }
    }
}
