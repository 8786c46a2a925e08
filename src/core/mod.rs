pub mod app;
pub mod chat_stream;
pub mod constants;
pub mod conversation;
pub mod message;
pub mod provider;
pub mod session;
pub mod settings;
pub mod update;
