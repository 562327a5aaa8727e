//! Command dispatch for data fetching
//!
//! Every query names a backend command; the arguments are forwarded as-is
//! and failures come back as a [`QueryError`] carrying the command name.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Error name used when a query cannot be dispatched at all
pub const DISPATCH_FAILED: &str = "Failed to execute backend query";

/// Failure reported by a backend command
#[derive(Debug, Clone, PartialEq)]
pub enum InvokeError {
    /// Backend error carrying a machine-readable code
    Structured {
        message: String,
        code: Option<String>,
    },
    /// Anything with a message
    Message(String),
    /// Unrecognized error payload
    Opaque(Value),
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokeError::Structured { message, .. } | InvokeError::Message(message) => {
                f.write_str(message)
            }
            InvokeError::Opaque(Value::String(s)) => f.write_str(s),
            InvokeError::Opaque(value) => write!(f, "{}", value),
        }
    }
}

impl std::error::Error for InvokeError {}

/// Transport to the application backend
#[async_trait]
pub trait Backend: Send + Sync {
    async fn invoke(
        &self,
        command: &str,
        args: Option<&Value>,
    ) -> std::result::Result<Value, InvokeError>;
}

/// Error value handed back to the data-fetching layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryError {
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl QueryError {
    fn dispatch(message: &str) -> Self {
        Self {
            name: DISPATCH_FAILED.to_string(),
            message: message.to_string(),
            code: None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for QueryError {}

/// Per-endpoint options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub command: Option<String>,
}

impl QueryOptions {
    pub fn command(command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
        }
    }
}

/// Base query bound to one backend
#[derive(Clone)]
pub struct BackendQuery {
    backend: Arc<dyn Backend>,
}

impl BackendQuery {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Build from an optionally injected backend
    pub fn from_extra(backend: Option<Arc<dyn Backend>>) -> std::result::Result<Self, QueryError> {
        backend
            .map(Self::new)
            .ok_or_else(|| QueryError::dispatch("Redux dependency Backend not found!"))
    }

    /// Invoke the command named in `options` with `args`
    pub async fn query(
        &self,
        args: Option<Value>,
        options: &QueryOptions,
    ) -> std::result::Result<Value, QueryError> {
        let Some(command) = options.command.as_deref() else {
            return Err(QueryError::dispatch("Command required!"));
        };

        match self.backend.invoke(command, args.as_ref()).await {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::debug!(command, error = %e, "backend command failed");
                Err(describe_failure(command, args.as_ref(), e))
            }
        }
    }
}

impl fmt::Debug for BackendQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendQuery").finish_non_exhaustive()
    }
}

fn describe_failure(command: &str, args: Option<&Value>, error: InvokeError) -> QueryError {
    let name = format!("API error: ({})", command);

    match error {
        InvokeError::Structured { message, code } => {
            let args = args
                .map(Value::to_string)
                .unwrap_or_else(|| "undefined".to_string());
            QueryError {
                name,
                message: format!("Command: {}\nParameters: {})\n\n{}", command, args, message),
                code,
            }
        }
        other => QueryError {
            name,
            message: other.to_string(),
            code: None,
        },
    }
}
