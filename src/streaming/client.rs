//! LM Studio chat-completion client
//!
//! LM Studio serves an OpenAI-compatible API:
//! - Endpoint: POST {base}/v1/chat/completions
//! - Streaming: `data:` framed deltas, consumed by [`aggregate`]
//! - Non-streaming: a single JSON completion

use crate::cli::config::AiConfig;
use crate::errors::{BuddyError, Result};
use crate::streaming::parser::aggregate;
use crate::streaming::prompts;
use crate::types::{EvalOptions, MaxTokens, Message, Prompt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default LM Studio server address
pub const LM_STUDIO_DEFAULT_ENDPOINT: &str = "http://127.0.0.1:1234";

/// Model name LM Studio maps to whatever model is loaded
pub const LM_STUDIO_DEFAULT_MODEL_NAME: &str = "default";

/// Sampling temperature used for every request
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Token limit used when the caller gives none
pub const DEFAULT_MAX_TOKENS: MaxTokens = MaxTokens::Unlimited;

/// Connection timeout; reading a streamed body is not bounded
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Ensure the endpoint ends with `/v1`
pub fn normalize_base_url(endpoint: &str) -> String {
    if endpoint.ends_with("/v1") {
        endpoint.to_string()
    } else if endpoint.ends_with('/') {
        format!("{}v1", endpoint)
    } else {
        format!("{}/v1", endpoint)
    }
}

/// Chat-completion client for an LM Studio server
#[derive(Debug, Clone)]
pub struct LmStudioClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    default_max_tokens: MaxTokens,
}

impl LmStudioClient {
    /// Create client for `endpoint` using `model`
    pub fn new(endpoint: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(BuddyError::HttpError)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(endpoint),
            model: model.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            default_max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Create client from the `[ai]` configuration section
    pub fn with_config(config: &AiConfig) -> Result<Self> {
        let mut client = Self::new(&config.endpoint, &config.model)?;
        client.temperature = config.temperature;
        client.default_max_tokens = config.max_tokens();
        Ok(client)
    }

    /// Run the prompt and return the full response text
    ///
    /// With `options.on_token` set the response is streamed and every token
    /// is handed to the callback as it is decoded; the returned text is the
    /// concatenation of those tokens. Every failure comes back as
    /// [`BuddyError::Communication`].
    pub async fn evaluate(&self, prompt: &[Message], options: EvalOptions<'_>) -> Result<String> {
        match self.try_evaluate(prompt, options).await {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::error!(error = %e, "error calling the LM Studio API");
                Err(BuddyError::communication(e))
            }
        }
    }

    async fn try_evaluate(&self, prompt: &[Message], mut options: EvalOptions<'_>) -> Result<String> {
        if prompt.is_empty() {
            return Err(BuddyError::InvalidPrompt(
                "prompt must be a non-empty list of messages".to_string(),
            ));
        }

        let stream = options.is_streaming();
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: prompt,
            temperature: self.temperature,
            max_tokens: options.max_tokens.unwrap_or(self.default_max_tokens),
            stream,
        };

        tracing::debug!(%url, messages = prompt.len(), stream, "sending chat completion request");

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BuddyError::Api { status, body });
        }

        match options.on_token.as_mut() {
            Some(on_token) => aggregate(Some(response.bytes_stream()), &mut **on_token).await,
            None => {
                let completion: ChatCompletionResponse = response.json().await?;
                Ok(completion.into_content())
            }
        }
    }

    /// Check if the server answers on its model listing endpoint
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Prompt used to generate commit messages
    pub fn default_commit_template(&self) -> Prompt {
        prompts::short_commit_template()
    }

    /// Prompt used to generate branch names
    pub fn default_branch_template(&self) -> Prompt {
        prompts::short_branch_template()
    }

    /// Prompt used to generate pull request descriptions
    pub fn default_pr_template(&self) -> Prompt {
        prompts::short_pr_template()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Base URL, always ending in `/v1`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: MaxTokens,
    stream: bool,
}

/// Non-streaming completion: `{"choices":[{"message":{"content":"..."}}]}`
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default()
    }
}
