//! chatdesk is a small chat client for OpenAI-compatible completion APIs.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the settings store, the conversation transcript and prompt
//!   assembly, the provider seam, the chat session, and the release check.
//! - [`commands`] implements slash-command parsing and execution for the
//!   interactive loop.
//! - [`api`] defines the chat-completion and release-tag payloads.
//! - [`utils`] holds transcript logging helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which builds a [`core::session::ChatSession`]
//! and dispatches into the interactive or one-shot front ends.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod utils;
