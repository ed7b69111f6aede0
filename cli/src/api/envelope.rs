//! # Response Envelope
//!
//! File: cli/src/api/envelope.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Every operation returns an [`Envelope`]: the daemon either accepted the
//! request (`Success`) or answered with something else (`Failure`). The
//! boolean view (`status()`) is `true` only for HTTP 200, 201 and 204; any
//! other code, including other 2xx codes, is a failure.
//!
//! ## Content decoding
//!
//! For successful responses, in order of precedence:
//! 1. Streaming requests yield [`Content::Lines`], a lazy stream of lines.
//! 2. A `content-type` containing `application/json` is parsed as JSON.
//! 3. Anything else, or JSON that fails to parse, is kept as raw bytes.
//!
//! Failure responses always keep the raw body bytes.
//!
use crate::api::transport::{RawResponse, ResponseBody};
use crate::core::error::{DockhandError, Result};
use anyhow::anyhow;
use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, Stream, StreamExt};
use serde_json::{json, Value};
use std::{fmt, pin::Pin};
use tracing::warn;

/// HTTP status codes treated as success.
pub const SUCCESS_CODES: [u16; 3] = [200, 201, 204];

/// Lazy sequence of newline-delimited records from a streamed body.
pub type LineStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Decoded body of a daemon response.
pub enum Content {
    Empty,
    Json(Value),
    Bytes(Bytes),
    Lines(LineStream),
}

impl Content {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Content::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Content::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn into_lines(self) -> Option<LineStream> {
        match self {
            Content::Lines(lines) => Some(lines),
            _ => None,
        }
    }

    /// JSON rendering for display. Bytes become a lossy UTF-8 string; a line
    /// stream cannot be rendered without consuming it and yields `None`.
    pub fn to_json_value(&self) -> Option<Value> {
        match self {
            Content::Empty => Some(Value::String(String::new())),
            Content::Json(value) => Some(value.clone()),
            Content::Bytes(bytes) => Some(Value::String(
                String::from_utf8_lossy(bytes).into_owned(),
            )),
            Content::Lines(_) => None,
        }
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Empty => f.write_str("Empty"),
            Content::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Content::Bytes(bytes) => f.debug_tuple("Bytes").field(bytes).finish(),
            Content::Lines(_) => f.write_str("Lines(..)"),
        }
    }
}

/// Uniform result of a daemon call.
#[derive(Debug)]
pub enum Envelope {
    Success(Content),
    Failure { status_code: u16, content: Content },
}

impl Envelope {
    /// Classifies a raw response by status code and decodes its body.
    pub fn from_response(response: RawResponse) -> Self {
        let RawResponse {
            status_code,
            content_type,
            body,
        } = response;

        if !is_success_code(status_code) {
            let content = match body {
                ResponseBody::Full(bytes) => Content::Bytes(bytes),
                ResponseBody::Streaming(lines) => Content::Lines(lines),
            };
            return Envelope::Failure {
                status_code,
                content,
            };
        }

        let content = match body {
            ResponseBody::Streaming(lines) => Content::Lines(lines),
            ResponseBody::Full(bytes) => decode_body(content_type.as_deref(), bytes),
        };
        Envelope::Success(content)
    }

    /// `true` iff the daemon answered 200, 201 or 204.
    pub fn status(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn content(&self) -> &Content {
        match self {
            Envelope::Success(content) => content,
            Envelope::Failure { content, .. } => content,
        }
    }

    pub fn into_content(self) -> Content {
        match self {
            Envelope::Success(content) => content,
            Envelope::Failure { content, .. } => content,
        }
    }

    /// Applies `f` to the content of a successful envelope; failures pass through.
    pub fn map_success<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(Content) -> Result<Content>,
    {
        match self {
            Envelope::Success(content) => Ok(Envelope::Success(f(content)?)),
            failure => Ok(failure),
        }
    }

    /// `{"status": bool, "content": ...}`, or `None` for streamed content.
    pub fn to_json_value(&self) -> Option<Value> {
        let content = self.content().to_json_value()?;
        Some(json!({ "status": self.status(), "content": content }))
    }
}

pub fn is_success_code(status_code: u16) -> bool {
    SUCCESS_CODES.contains(&status_code)
}

/// Decodes a fully buffered success body according to its content type.
pub fn decode_body(content_type: Option<&str>, body: Bytes) -> Content {
    if body.is_empty() {
        return Content::Empty;
    }
    if content_type.is_some_and(|ct| ct.contains("application/json")) {
        match serde_json::from_slice(&body) {
            Ok(value) => return Content::Json(value),
            Err(e) => warn!("Response declared JSON but did not parse ({}); keeping raw bytes.", e),
        }
    }
    Content::Bytes(body)
}

/// Longest line [`split_lines`] buffers before giving up on the stream.
pub const MAX_LINE_LEN: usize = 16 * 1024 * 1024;

/// Re-chunks a byte stream into lines. Line terminators (`\n` or `\r\n`) are
/// stripped; a final unterminated line is still yielded. After an error the
/// stream ends.
pub fn split_lines<S>(chunks: S) -> LineStream
where
    S: Stream<Item = Result<Bytes>> + Send + 'static,
{
    split_lines_with_limit(chunks, MAX_LINE_LEN)
}

fn split_lines_with_limit<S>(chunks: S, max_line_len: usize) -> LineStream
where
    S: Stream<Item = Result<Bytes>> + Send + 'static,
{
    struct State<S> {
        chunks: Pin<Box<S>>,
        buffer: BytesMut,
        // Bytes of `buffer` already known to hold no '\n'.
        scanned: usize,
        done: bool,
    }

    let initial = State {
        chunks: Box::pin(chunks),
        buffer: BytesMut::new(),
        scanned: 0,
        done: false,
    };

    Box::pin(stream::unfold(initial, move |mut state| async move {
        loop {
            let newline = state.buffer[state.scanned..]
                .iter()
                .position(|b| *b == b'\n')
                .map(|offset| state.scanned + offset);
            if let Some(pos) = newline {
                state.scanned = 0;
                let mut line = state.buffer.split_to(pos + 1);
                line.truncate(pos);
                if line.ends_with(b"\r") {
                    line.truncate(pos - 1);
                }
                return Some((Ok(line.freeze()), state));
            }
            state.scanned = state.buffer.len();
            if state.done {
                if state.buffer.is_empty() {
                    return None;
                }
                state.scanned = 0;
                let rest = state.buffer.split().freeze();
                return Some((Ok(rest), state));
            }
            if state.buffer.len() > max_line_len {
                warn!(
                    "Dropping line stream: {} bytes buffered without a newline",
                    state.buffer.len()
                );
                state.done = true;
                state.scanned = 0;
                state.buffer.clear();
                let err = anyhow!(DockhandError::LineTooLong {
                    limit: max_line_len
                });
                return Some((Err(err), state));
            }
            match state.chunks.next().await {
                Some(Ok(chunk)) => state.buffer.extend_from_slice(&chunk),
                Some(Err(e)) => {
                    state.done = true;
                    state.scanned = 0;
                    state.buffer.clear();
                    return Some((Err(e), state));
                }
                None => state.done = true,
            }
        }
    }))
}
