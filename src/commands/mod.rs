mod registry;

pub use registry::{all_commands, CommandInvocation};

use crate::core::app::App;
use crate::core::settings::{Theme, AVAILABLE_MODELS};
use crate::utils::logging::dump_transcript;
use chrono::Local;
use std::path::Path;

#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    /// A one-line notice for the user.
    Status(String),
    ProcessAsMessage(String),
    Quit,
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return CommandResult::Continue;
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) => {
            (command.handler)(app, CommandInvocation { args })
        }
        None => CommandResult::Status(format!(
            "Unknown command: /{command_name}. Type /help for a list."
        )),
    }
}

pub(super) fn handle_help(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let mut help = String::from("Commands:");
    for command in all_commands() {
        help.push_str(&format!("\n  {:<22}{}", command.usage, command.help));
    }
    CommandResult::Status(help)
}

pub(super) fn handle_clear(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.session.clear();
    CommandResult::Status("Chat history cleared".to_string())
}

pub(super) fn handle_model(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        let mut listing = String::from("Available models:");
        for model in AVAILABLE_MODELS {
            let marker = if *model == app.session.model() { "*" } else { " " };
            listing.push_str(&format!("\n  {marker} {model}"));
        }
        return CommandResult::Status(listing);
    }

    match app.session.change_model(invocation.args) {
        Ok(()) => CommandResult::Status(format!("Model set: {}", app.session.model())),
        Err(e) => CommandResult::Status(format!("Model error: {e}")),
    }
}

pub(super) fn handle_theme(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return CommandResult::Status(format!(
            "Theme: {} (available: Dark, Light)",
            app.session.theme()
        ));
    }

    let result = invocation
        .args
        .parse::<Theme>()
        .and_then(|theme| app.session.change_theme(theme));
    match result {
        Ok(()) => CommandResult::Status(format!("Theme set: {}", app.session.theme())),
        Err(e) => CommandResult::Status(format!("Theme error: {e}")),
    }
}

pub(super) fn handle_log(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let parts: Vec<&str> = invocation.args.split_whitespace().collect();

    let result = match parts.as_slice() {
        [] => app.logging.toggle_logging(),
        [filename] => app.logging.set_log_file(*filename),
        _ => return CommandResult::Status("Usage: /log [filename]".to_string()),
    };

    match result {
        Ok(message) => CommandResult::Status(message),
        Err(e) => CommandResult::Status(format!("Log error: {e}")),
    }
}

pub(super) fn handle_dump(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let parts: Vec<&str> = invocation.args.split_whitespace().collect();

    let filename = match parts.as_slice() {
        [] => format!("chatdesk-log-{}.txt", Local::now().format("%Y-%m-%d")),
        [filename] => filename.to_string(),
        _ => return CommandResult::Status("Usage: /dump [filename]".to_string()),
    };

    if app.session.transcript().is_empty() {
        return CommandResult::Status("Nothing to dump yet".to_string());
    }

    match dump_transcript(app.session.transcript(), Path::new(&filename)) {
        Ok(()) => CommandResult::Status(format!("Conversation dumped to: {filename}")),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => CommandResult::Status(
            format!("{filename} already exists. Use /dump <filename> to pick another name."),
        ),
        Err(e) => CommandResult::Status(format!("Dump error: {e}")),
    }
}

pub(super) fn handle_quit(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}
