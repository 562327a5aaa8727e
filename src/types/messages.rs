//! Prompt types for chat-completion calls
//!
//! Defines the conversation messages sent to the model and the per-call
//! evaluation options.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Ordered conversation sent to the model
pub type Prompt = Vec<Message>;

/// Upper bound on generated tokens
///
/// The server treats `-1` as "no limit", so `Unlimited` goes over the wire
/// as `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxTokens {
    Limit(u32),
    #[default]
    Unlimited,
}

impl MaxTokens {
    /// Wire value understood by the server
    pub fn as_wire(&self) -> i64 {
        match self {
            MaxTokens::Limit(n) => i64::from(*n),
            MaxTokens::Unlimited => -1,
        }
    }

    /// Inverse of [`MaxTokens::as_wire`]; any negative value means unlimited.
    pub fn from_wire(value: i64) -> Self {
        if value < 0 {
            MaxTokens::Unlimited
        } else {
            MaxTokens::Limit(u32::try_from(value).unwrap_or(u32::MAX))
        }
    }
}

impl Serialize for MaxTokens {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_wire())
    }
}

/// Callback invoked once per streamed token
pub type TokenCallback<'a> = Box<dyn FnMut(&str) + Send + 'a>;

/// Options for a single evaluation
///
/// Supplying `on_token` switches the call to streaming mode.
#[derive(Default)]
pub struct EvalOptions<'a> {
    pub on_token: Option<TokenCallback<'a>>,
    pub max_tokens: Option<MaxTokens>,
}

impl<'a> EvalOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream tokens into `callback` as they arrive
    pub fn on_token(mut self, callback: impl FnMut(&str) + Send + 'a) -> Self {
        self.on_token = Some(Box::new(callback));
        self
    }

    pub fn max_tokens(mut self, max_tokens: MaxTokens) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn is_streaming(&self) -> bool {
        self.on_token.is_some()
    }
}

impl fmt::Debug for EvalOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalOptions")
            .field("on_token", &self.on_token.is_some())
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
