//! stackbuddy - desktop Git client glue
//!
//! # Architecture
//!
//! - **streaming**: LM Studio chat-completion client and SSE aggregation
//! - **stacks**: view-model helpers for stacks and branches
//! - **backend**: typed dispatch of backend commands
//! - **hotkeys** and **menu**: shortcut registry, keybindings, menu model

pub mod errors;
pub mod types;
pub mod streaming;

// Re-export commonly used types
pub use errors::{BuddyError, Result};

pub mod stacks;
pub mod backend;

pub mod hotkeys;
pub mod menu;

pub mod cli;
