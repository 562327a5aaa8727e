//! Streaming client module
//!
//! Provides the LM Studio chat-completion client and the incremental
//! response aggregator.

pub mod client;
pub mod parser;
pub mod prompts;

// Re-export commonly used types
pub use client::{
    normalize_base_url, LmStudioClient, LM_STUDIO_DEFAULT_ENDPOINT, LM_STUDIO_DEFAULT_MODEL_NAME,
};
pub use parser::{aggregate, StreamAggregator, Utf8Decoder, DONE_SENTINEL};
