//! CLI module for stackbuddy
//!
//! Handles command-line argument parsing and configuration management.

pub mod args;
pub mod config;

pub use args::{Args, Commands};
pub use config::{AiConfig, Config, LoggingConfig};
