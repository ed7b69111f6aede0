//! # Envelope Output
//!
//! File: cli/src/commands/output.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! Buffered envelopes are printed as pretty JSON
//! (`{"status": ..., "content": ...}`). Streamed content is printed one line
//! per item as it arrives, until the daemon closes the stream or the user
//! interrupts.
//!
use anyhow::Context;
use dockhand::{api::Envelope, Result};
use futures_util::StreamExt;
use tracing::{debug, warn};

/// Pretty JSON for a buffered envelope, `None` for a streamed one.
pub fn render_envelope(envelope: &Envelope) -> Result<Option<String>> {
    match envelope.to_json_value() {
        Some(value) => Ok(Some(
            serde_json::to_string_pretty(&value).context("Failed to render response as JSON")?,
        )),
        None => Ok(None),
    }
}

/// Prints `envelope` to stdout and reports whether the daemon accepted the request.
pub async fn print_envelope(envelope: Envelope) -> Result<bool> {
    let accepted = envelope.status();
    if let Some(rendered) = render_envelope(&envelope)? {
        println!("{rendered}");
    } else if let Some(mut lines) = envelope.into_content().into_lines() {
        let mut count = 0usize;
        while let Some(line) = lines.next().await {
            let line = line.context("Stream from the Docker daemon was interrupted")?;
            println!("{}", String::from_utf8_lossy(&line));
            count += 1;
        }
        debug!("Stream ended after {} lines", count);
    }
    if !accepted {
        warn!("The Docker daemon rejected the request.");
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockhand::api::Content;
    use serde_json::{json, Value};

    #[test]
    fn test_render_json_success() {
        let envelope = Envelope::Success(Content::Json(json!({"Containers": 2})));
        let rendered = render_envelope(&envelope).unwrap().unwrap();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, json!({"status": true, "content": {"Containers": 2}}));
    }

    #[test]
    fn test_render_failure_bytes_as_text() {
        let envelope = Envelope::Failure {
            status_code: 404,
            content: Content::Bytes(bytes::Bytes::from_static(b"no such image")),
        };
        let rendered = render_envelope(&envelope).unwrap().unwrap();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, json!({"status": false, "content": "no such image"}));
    }

    #[tokio::test]
    async fn test_print_envelope_reports_status() {
        assert!(print_envelope(Envelope::Success(Content::Empty)).await.unwrap());
        let failure = Envelope::Failure {
            status_code: 500,
            content: Content::Empty,
        };
        assert!(!print_envelope(failure).await.unwrap());
    }
}
