//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;
pub mod say;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::chat::run_chat;
use crate::cli::say::run_say;
use crate::core::app::App;
use crate::core::provider::OpenAiProvider;
use crate::core::session::ChatSession;
use crate::core::settings::{
    is_available_model, SettingsError, SettingsStore, Theme, AVAILABLE_MODELS,
};
use crate::core::update::{check_update, current_version};
use crate::utils::logging::LoggingState;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("VERGEN_GIT_DESCRIBE"),
    "\nbuilt:  ",
    env!("VERGEN_BUILD_DATE"),
    "\nrustc:  ",
    env!("VERGEN_RUSTC_SEMVER"),
);

#[derive(Parser)]
#[command(name = "chatdesk", version, long_version = LONG_VERSION)]
#[command(about = "Chat with OpenAI-compatible models from the terminal")]
#[command(
    long_about = "chatdesk sends your messages, together with the conversation so far, \
to a chat-completion API and prints the replies. The selected model and colour theme are \
remembered in ~/Documents/chat_app_config.json.\n\n\
Environment Variables:\n\
  OPENAI_API_KEY    API key sent as a bearer token (optional)\n\
  OPENAI_BASE_URL   API base URL (defaults to https://api.openai.com/v1)\n\
  CHATDESK_LOG      Diagnostic log filter, e.g. debug or chatdesk=trace (default: warn)\n\n\
Commands inside the chat:\n\
  /help             List commands\n\
  /clear            Clear the chat history\n\
  /model [id]       List or switch models\n\
  /theme [name]     Show or switch the theme\n\
  /quit             Leave"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for this run without changing the saved preference
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Append the conversation to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat (default)
    Chat,
    /// Send a single message and print the reply
    Say {
        /// Message to send (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        prompt: Vec<String>,
    },
    /// Show or change saved settings
    Set {
        /// Setting to change: theme or model
        key: Option<String>,
        /// New value; omit to print the current one
        value: Option<String>,
    },
    /// List the models that can be selected
    Models,
    /// Check whether a newer release is available
    CheckUpdate,
}

const LOG_ENV: &str = "CHATDESK_LOG";

/// Diagnostics go to stderr so stdout carries only the conversation.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn main() -> Result<ExitCode, Box<dyn Error>> {
    init_tracing();
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Args::parse();

    if let Some(model) = args.model.as_deref() {
        if !is_available_model(model) {
            return Err(SettingsError::UnknownModel(model.to_string()).into());
        }
    }

    let store = SettingsStore::default_location()?;

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let session = build_session(store, args.model);
            let logging = LoggingState::new(args.log)?;
            run_chat(App::new(session, logging)).await?;
        }
        Commands::Say { prompt } => {
            let session = build_session(store, args.model);
            return run_say(session, &prompt.join(" ")).await;
        }
        Commands::Set { key, value } => handle_set(&store, key.as_deref(), value.as_deref())?,
        Commands::Models => {
            let selected = args.model.unwrap_or_else(|| store.load().model);
            for model in AVAILABLE_MODELS {
                let marker = if *model == selected { "*" } else { " " };
                println!("{marker} {model}");
            }
        }
        Commands::CheckUpdate => {
            let current = current_version();
            let status = check_update(&reqwest::Client::new(), current).await;
            println!("{}", status.summary(current));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn build_session(store: SettingsStore, model_override: Option<String>) -> ChatSession {
    let provider = OpenAiProvider::from_env(reqwest::Client::new());
    debug!(base_url = provider.base_url(), "using completion endpoint");
    if !provider.has_api_key() {
        warn!("OPENAI_API_KEY is not set; requests are sent without authorization");
    }
    let session = ChatSession::new(Arc::new(provider), store);
    match model_override {
        Some(model) => session.with_model_override(model),
        None => session,
    }
}

pub(crate) fn handle_set(
    store: &SettingsStore,
    key: Option<&str>,
    value: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let Some(key) = key else {
        store.load().print_all();
        return Ok(());
    };

    match (key, value) {
        ("theme", None) => println!("theme: {}", store.load().theme),
        ("model", None) => println!("model: {}", store.load().model),
        ("theme", Some(value)) => {
            let theme = value.parse::<Theme>()?;
            store.mutate(|settings| {
                settings.set_theme(theme);
                Ok(())
            })?;
            println!("✅ Set theme to: {theme}");
        }
        ("model", Some(value)) => {
            store.mutate(|settings| settings.set_model(value))?;
            println!("✅ Set model to: {}", value.trim());
        }
        _ => {
            return Err(format!("Unknown setting: {key} (expected theme or model)").into());
        }
    }
    Ok(())
}
