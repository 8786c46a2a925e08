use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    /// Everything after the command name, trimmed.
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands.",
        handler: super::handle_help,
    },
    Command {
        name: "clear",
        usage: "/clear",
        help: "Clear the chat history.",
        handler: super::handle_clear,
    },
    Command {
        name: "model",
        usage: "/model [id]",
        help: "List models or switch to another one.",
        handler: super::handle_model,
    },
    Command {
        name: "theme",
        usage: "/theme [Dark|Light]",
        help: "Show or change the colour theme.",
        handler: super::handle_theme,
    },
    Command {
        name: "log",
        usage: "/log [filename]",
        help: "Toggle logging or set the log file path.",
        handler: super::handle_log,
    },
    Command {
        name: "dump",
        usage: "/dump [filename]",
        help: "Export the current conversation to a new file.",
        handler: super::handle_dump,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Leave the chat.",
        handler: super::handle_quit,
    },
];
