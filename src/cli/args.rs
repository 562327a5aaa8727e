//! Command-line argument parsing for stackbuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stackbuddy - desktop Git client glue from the terminal
#[derive(Parser, Debug)]
#[command(name = "stackbuddy")]
#[command(version)]
#[command(about = "Ask a local LM Studio model, inspect shortcuts and menu actions", long_about = None)]
pub struct Args {
    /// LM Studio endpoint (overrides config)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Model name (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -v (info), -vv (debug), -vvv (trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a prompt to the model
    Ask {
        /// User message
        #[arg(value_name = "PROMPT")]
        prompt: String,

        /// Optional system message placed before the prompt
        #[arg(long)]
        system: Option<String>,

        /// Print tokens as they arrive
        #[arg(long)]
        stream: bool,

        /// Maximum tokens to generate (-1 for no limit)
        #[arg(long, allow_hyphen_values = true)]
        max_tokens: Option<i64>,
    },

    /// List keyboard shortcuts
    Shortcuts,

    /// Show the action bound to a menu item id
    MenuEvent {
        /// Menu item id, e.g. file/create-branch
        id: String,
    },

    /// Display current configuration
    Config,

    /// Check that the LM Studio server is reachable
    Health,
}

impl Args {
    /// Log filter directive derived from flags, falling back to `configured`
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => configured,
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let args = Args::parse_from([
            "stackbuddy",
            "--model",
            "phi-3",
            "ask",
            "hello",
            "--stream",
            "--max-tokens",
            "-1",
        ]);
        assert_eq!(args.model.as_deref(), Some("phi-3"));
        match args.command {
            Commands::Ask {
                prompt,
                stream,
                max_tokens,
                system,
            } => {
                assert_eq!(prompt, "hello");
                assert!(stream);
                assert_eq!(max_tokens, Some(-1));
                assert!(system.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_log_level() {
        let args = Args::parse_from(["stackbuddy", "shortcuts"]);
        assert_eq!(args.log_level("warn"), "warn");

        let args = Args::parse_from(["stackbuddy", "-vv", "shortcuts"]);
        assert_eq!(args.log_level("warn"), "debug");

        let args = Args::parse_from(["stackbuddy", "-q", "shortcuts"]);
        assert_eq!(args.log_level("info"), "error");
    }

    #[test]
    fn test_parse_menu_event() {
        let args = Args::parse_from(["stackbuddy", "menu-event", "view/zoom-in"]);
        assert!(matches!(args.command, Commands::MenuEvent { ref id } if id == "view/zoom-in"));
    }
}
