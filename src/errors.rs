//! Error types for stackbuddy
//!
//! One error enum shared by the AI client, the stack helpers and the menu
//! model. The AI client funnels every failure into
//! [`BuddyError::Communication`] before returning it.

use thiserror::Error;

/// Main error type for the stackbuddy library
#[derive(Error, Debug)]
pub enum BuddyError {
    /// Prompt rejected before any request was issued
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    /// Server answered with a non-success status
    #[error("LM Studio API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response carried no readable body stream
    #[error("Unable to obtain a reader from the response")]
    StreamUnavailable,

    /// Transport failure while reading a streamed body
    #[error("Streaming error: {0}")]
    Streaming(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A stack without any branch heads
    #[error("Stack has no branch heads")]
    EmptyStack,

    /// Key combination that cannot be parsed
    #[error("Invalid shortcut: {0}")]
    InvalidShortcut(String),

    /// Menu lookup by id failed
    #[error("menu item not found: {0}")]
    MenuItemNotFound(String),

    /// Normalized failure of a chat-completion call
    #[error("Failed to communicate with LM Studio server: {source}")]
    Communication {
        #[source]
        source: Box<BuddyError>,
    },

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

impl BuddyError {
    /// Wrap an error at the AI client's rethrow point.
    pub fn communication(source: BuddyError) -> Self {
        BuddyError::Communication {
            source: Box::new(source),
        }
    }

    /// The underlying cause of a [`BuddyError::Communication`], if any.
    pub fn cause(&self) -> Option<&BuddyError> {
        match self {
            BuddyError::Communication { source } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias for stackbuddy operations
pub type Result<T> = std::result::Result<T, BuddyError>;

/// Convert anyhow errors to BuddyError
impl From<anyhow::Error> for BuddyError {
    fn from(err: anyhow::Error) -> Self {
        BuddyError::Generic(err.to_string())
    }
}
