//! Incremental decoder for streamed chat-completion responses
//!
//! Turns a body of `text/event-stream` style frames into token deltas:
//! - UTF-8 decoding that holds split multi-byte sequences across chunks
//! - Line buffering that holds a partial line across chunks
//! - Per-line frame decoding; malformed frames are logged and skipped
//!
//! Termination is driven by the end of the byte stream. The `data: [DONE]`
//! line is ignored like any other non-token line.

use crate::errors::{BuddyError, Result};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use std::char::REPLACEMENT_CHARACTER;

/// Prefix carried by every payload line
pub const DATA_PREFIX: &str = "data:";

/// Literal line sent by the server after the last frame
pub const DONE_SENTINEL: &str = "data: [DONE]";

/// Streaming UTF-8 decoder
///
/// Bytes of an incomplete sequence at the end of a chunk are kept until the
/// next call. Invalid sequences decode to U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `bytes` as forms complete characters
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(bytes);

        let mut out = String::with_capacity(input.len());
        let mut rest: &[u8] = &input;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&rest[..valid_up_to]));

                    match e.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT_CHARACTER);
                            rest = &rest[valid_up_to + len..];
                        }
                        None => {
                            // Truncated sequence at the end: wait for more bytes
                            self.pending = rest[valid_up_to..].to_vec();
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// True if a partial character is waiting for its remaining bytes
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// One streamed frame: `{"choices":[{"delta":{"content":"..."}}]}`
#[derive(Debug, Deserialize)]
struct StreamFrame {
    #[serde(default)]
    choices: Vec<FrameChoice>,
}

#[derive(Debug, Deserialize)]
struct FrameChoice {
    #[serde(default)]
    delta: Option<FrameDelta>,
}

#[derive(Debug, Deserialize)]
struct FrameDelta {
    #[serde(default)]
    content: Option<String>,
}

impl StreamFrame {
    /// Content of the first choice's delta, if non-empty
    fn into_token(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content)
            .filter(|content| !content.is_empty())
    }
}

/// Accumulates token deltas from a chunked response body
#[derive(Debug, Default)]
pub struct StreamAggregator {
    decoder: Utf8Decoder,
    /// Text after the last newline seen so far
    pending: String,
    result: String,
    tokens: usize,
    dropped_frames: usize,
}

impl StreamAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk; returns the number of tokens it produced
    ///
    /// `on_token` runs synchronously, once per token, in arrival order.
    pub fn push_chunk(&mut self, bytes: &[u8], on_token: &mut dyn FnMut(&str)) -> usize {
        let text = self.decoder.decode(bytes);
        self.pending.push_str(&text);

        let Some(last_newline) = self.pending.rfind('\n') else {
            return 0;
        };

        let complete: String = self.pending.drain(..=last_newline).collect();
        let mut emitted = 0;

        for line in complete.split('\n') {
            if let Some(token) = self.decode_line(line) {
                on_token(&token);
                self.result.push_str(&token);
                emitted += 1;
            }
        }

        self.tokens += emitted;
        emitted
    }

    /// Extract the token carried by one complete line, if any
    fn decode_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() || line == DONE_SENTINEL {
            return None;
        }

        let payload = line.strip_prefix(DATA_PREFIX)?.trim();
        if payload.is_empty() {
            return None;
        }

        match serde_json::from_str::<StreamFrame>(payload) {
            Ok(frame) => frame.into_token(),
            Err(e) => {
                self.dropped_frames += 1;
                tracing::warn!(error = %e, frame = payload, "skipping malformed stream frame");
                None
            }
        }
    }

    /// Text accumulated so far
    pub fn text(&self) -> &str {
        &self.result
    }

    /// Number of tokens delivered so far
    pub fn token_count(&self) -> usize {
        self.tokens
    }

    /// Number of frames that failed to parse
    pub fn dropped_frames(&self) -> usize {
        self.dropped_frames
    }

    /// Length of the buffered, not yet terminated line
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// End of stream: return the aggregate
    ///
    /// A trailing line without a newline is discarded unparsed.
    pub fn finish(self) -> String {
        if !self.pending.trim().is_empty() || self.decoder.has_pending() {
            tracing::debug!(
                bytes = self.pending.len(),
                "discarding unterminated line at end of stream"
            );
        }
        self.result
    }
}

/// Drive a response body through a [`StreamAggregator`]
///
/// `None` means the transport handed over no readable body. A transport
/// error on any chunk aborts the whole call.
pub async fn aggregate<S, B, E>(
    body: Option<S>,
    on_token: &mut (dyn FnMut(&str) + Send),
) -> Result<String>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let stream = body.ok_or(BuddyError::StreamUnavailable)?;
    futures_util::pin_mut!(stream);

    let mut aggregator = StreamAggregator::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| BuddyError::Streaming(e.to_string()))?;
        aggregator.push_chunk(chunk.as_ref(), &mut *on_token);
    }

    tracing::debug!(
        tokens = aggregator.token_count(),
        dropped = aggregator.dropped_frames(),
        "stream finished"
    );

    Ok(aggregator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures_util::stream;

    fn frame(content: &str) -> String {
        format!(
            "data: {}\n",
            serde_json::json!({"choices": [{"delta": {"content": content}}]})
        )
    }

    fn feed(chunks: &[&[u8]]) -> (String, Vec<String>) {
        let mut tokens = Vec::new();
        let mut aggregator = StreamAggregator::new();
        for chunk in chunks {
            aggregator.push_chunk(chunk, &mut |t: &str| tokens.push(t.to_string()));
        }
        (aggregator.finish(), tokens)
    }

    #[test]
    fn test_two_chunks_two_tokens() {
        let (text, tokens) = feed(&[
            br#"data: {"choices":[{"delta":{"content":"He"}}]}
"#,
            br#"data: {"choices":[{"delta":{"content":"llo"}}]}
"#,
        ]);
        assert_eq!(text, "Hello");
        assert_eq!(tokens, vec!["He", "llo"]);
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let line = frame("€uro");
        let bytes = line.as_bytes();
        // '€' is E2 82 AC; split after its first byte
        let split = line.find('€').unwrap() + 1;

        let (text, tokens) = feed(&[&bytes[..split], &bytes[split..]]);
        assert_eq!(text, "€uro");
        assert_eq!(tokens, vec!["€uro"]);
    }

    #[test]
    fn test_line_split_across_chunks() {
        let line = frame("partial");
        let (head, tail) = line.as_bytes().split_at(17);

        let mut tokens = Vec::new();
        let mut aggregator = StreamAggregator::new();
        assert_eq!(aggregator.push_chunk(head, &mut |t: &str| tokens.push(t.to_string())), 0);
        assert!(aggregator.pending_len() > 0);
        assert_eq!(aggregator.push_chunk(tail, &mut |t: &str| tokens.push(t.to_string())), 1);
        assert_eq!(aggregator.pending_len(), 0);
        assert_eq!(aggregator.finish(), "partial");
        assert_eq!(tokens, vec!["partial"]);
    }

    #[test]
    fn test_malformed_frame_is_skipped() {
        let input = format!("{}data: {{not json\n{}", frame("a"), frame("b"));
        let mut tokens = Vec::new();
        let mut aggregator = StreamAggregator::new();
        aggregator.push_chunk(input.as_bytes(), &mut |t: &str| tokens.push(t.to_string()));

        assert_eq!(aggregator.dropped_frames(), 1);
        assert_eq!(aggregator.finish(), "ab");
        assert_eq!(tokens, vec!["a", "b"]);
    }

    #[test]
    fn test_done_sentinel_is_ignored() {
        let mut aggregator = StreamAggregator::new();
        let mut calls = 0;
        aggregator.push_chunk(b"data: [DONE]\n", &mut |_: &str| calls += 1);
        assert_eq!(calls, 0);
        assert_eq!(aggregator.dropped_frames(), 0);
        assert_eq!(aggregator.finish(), "");
    }

    #[test]
    fn test_unterminated_final_line_is_dropped() {
        let line = frame("tail");
        let (text, tokens) = feed(&[frame("kept").as_bytes(), line.trim_end().as_bytes()]);
        assert_eq!(text, "kept");
        assert_eq!(tokens, vec!["kept"]);
    }

    #[test]
    fn test_non_data_lines_and_crlf() {
        let input = format!(
            ": keep-alive\r\nevent: message\r\n\r\n{}data:{}\r\n",
            frame("x").replace('\n', "\r\n"),
            r#"{"choices":[{"delta":{"content":"y"}}]}"#
        );
        let (text, tokens) = feed(&[input.as_bytes()]);
        assert_eq!(text, "xy");
        assert_eq!(tokens, vec!["x", "y"]);
    }

    #[test]
    fn test_frames_without_content() {
        let input = concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":null}}]}\n",
            "data: {\"choices\":[]}\n",
            "data: {\"id\":\"no-choices\"}\n",
            "data:   \n",
        );
        let (text, tokens) = feed(&[input.as_bytes()]);
        assert_eq!(text, "");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_byte_at_a_time() {
        let input = format!("{}{}{}", frame("ß"), frame("😀"), frame("ok"));
        let chunks: Vec<&[u8]> = input.as_bytes().chunks(1).collect();
        let (text, tokens) = feed(&chunks);
        assert_eq!(text, "ß😀ok");
        assert_eq!(tokens, vec!["ß", "😀", "ok"]);
    }

    #[test]
    fn test_decoder_replaces_invalid_bytes() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"a\xFFb"), "a\u{FFFD}b");
        assert!(!decoder.has_pending());

        assert_eq!(decoder.decode(&[0xF0, 0x9F]), "");
        assert!(decoder.has_pending());
        assert_eq!(decoder.decode(&[0x98, 0x80]), "😀");
        assert!(!decoder.has_pending());
    }

    #[tokio::test]
    async fn test_aggregate_over_stream() {
        let chunks: Vec<std::result::Result<Bytes, String>> = vec![
            Ok(Bytes::from(frame("He"))),
            Ok(Bytes::from_static(b"data: [DONE]\n")),
            Ok(Bytes::from(frame("y"))),
        ];
        let mut seen = Vec::new();
        let text = aggregate(Some(stream::iter(chunks)), &mut |t: &str| {
            seen.push(t.to_string())
        })
        .await
        .unwrap();
        assert_eq!(text, "Hey");
        assert_eq!(seen, vec!["He", "y"]);
    }

    #[tokio::test]
    async fn test_aggregate_without_body() {
        let body: Option<stream::Iter<std::vec::IntoIter<std::result::Result<Vec<u8>, String>>>> =
            None;
        let result = aggregate(body, &mut |_: &str| {}).await;
        assert!(matches!(result, Err(BuddyError::StreamUnavailable)));
    }

    #[tokio::test]
    async fn test_aggregate_transport_error_aborts() {
        let chunks: Vec<std::result::Result<Vec<u8>, String>> = vec![
            Ok(frame("a").into_bytes()),
            Err("connection reset".to_string()),
            Ok(frame("b").into_bytes()),
        ];
        let mut seen = Vec::new();
        let result = aggregate(Some(stream::iter(chunks)), &mut |t: &str| {
            seen.push(t.to_string())
        })
        .await;

        match result {
            Err(BuddyError::Streaming(msg)) => assert!(msg.contains("connection reset")),
            other => panic!("expected streaming error, got {:?}", other),
        }
        assert_eq!(seen, vec!["a"]);
    }
}
