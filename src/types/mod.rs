//! Core data model for chat-completion calls

pub mod messages;

pub use messages::{EvalOptions, MaxTokens, Message, Prompt, Role, TokenCallback};
