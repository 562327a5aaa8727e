//! Integration tests for stackbuddy
//!
//! Runs the LM Studio client against a mock server, so no model is needed.

use httpmock::prelude::*;
use stackbuddy::{
    streaming::LmStudioClient,
    types::{EvalOptions, MaxTokens, Message},
    BuddyError,
};

const STREAM_BODY: &str = concat!(
    "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\"He\"}}]}\n\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\"llo\"}}]}\n\n",
    "data: [DONE]\n\n",
);

fn prompt() -> Vec<Message> {
    vec![Message::system("Be brief."), Message::user("Say hello")]
}

#[tokio::test]
async fn test_non_streaming_completion() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .json_body_partial(r#"{"stream": false, "max_tokens": -1}"#);
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#);
        })
        .await;

    let client = LmStudioClient::new(&server.base_url(), "default").unwrap();
    let text = client.evaluate(&prompt(), EvalOptions::new()).await.unwrap();

    assert_eq!(text, "hi");
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_streaming_completion_invokes_callback() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .json_body_partial(r#"{"stream": true}"#);
            then.status(200)
                .header("content-type", "text/event-stream")
                .body(STREAM_BODY);
        })
        .await;

    let client = LmStudioClient::new(&server.base_url(), "default").unwrap();
    let mut tokens = Vec::new();
    let options = EvalOptions::new().on_token(|token| tokens.push(token.to_string()));
    let text = client.evaluate(&prompt(), options).await.unwrap();

    assert_eq!(text, "Hello");
    assert_eq!(tokens, vec!["He", "llo"]);
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_max_tokens_override() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .json_body_partial(r#"{"max_tokens": 64}"#);
            then.status(200)
                .body(r#"{"choices":[{"message":{"content":"ok"}}]}"#);
        })
        .await;

    let client = LmStudioClient::new(&server.base_url(), "default").unwrap();
    let options = EvalOptions::new().max_tokens(MaxTokens::Limit(64));
    assert_eq!(client.evaluate(&prompt(), options).await.unwrap(), "ok");
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_empty_prompt_sends_nothing() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200);
        })
        .await;

    let client = LmStudioClient::new(&server.base_url(), "default").unwrap();
    let err = client.evaluate(&[], EvalOptions::new()).await.unwrap_err();

    assert!(matches!(err.cause(), Some(BuddyError::InvalidPrompt(_))));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_error_status_is_wrapped() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(404).body("model not found");
        })
        .await;

    let client = LmStudioClient::new(&server.base_url(), "missing").unwrap();
    let err = client.evaluate(&prompt(), EvalOptions::new()).await.unwrap_err();

    match err.cause() {
        Some(BuddyError::Api { status, body }) => {
            assert_eq!(*status, 404);
            assert_eq!(body, "model not found");
        }
        other => panic!("unexpected cause: {:?}", other),
    }
    assert!(err
        .to_string()
        .starts_with("Failed to communicate with LM Studio server:"));
}

#[tokio::test]
async fn test_streaming_error_status_skips_callback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(500).body("boom");
        })
        .await;

    let client = LmStudioClient::new(&server.base_url(), "default").unwrap();
    let mut calls = 0;
    let options = EvalOptions::new().on_token(|_| calls += 1);
    let err = client.evaluate(&prompt(), options).await.unwrap_err();

    assert!(matches!(err.cause(), Some(BuddyError::Api { status: 500, .. })));
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/models");
            then.status(200).body(r#"{"data":[]}"#);
        })
        .await;

    let client = LmStudioClient::new(&server.base_url(), "default").unwrap();
    assert!(client.health_check().await.unwrap());

    let offline = LmStudioClient::new("http://127.0.0.1:9", "default").unwrap();
    assert!(!offline.health_check().await.unwrap());
}
