//! # Dockhand Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! This module defines the error types used throughout dockhand.
//!
//! An unsuccessful HTTP status from the Docker daemon is *not* an error here:
//! it is reported through [`Envelope::Failure`](crate::api::envelope::Envelope).
//! Errors are reserved for things that prevent a response from existing at all
//! (connection refused, TLS handshake failure, timeout) or that make a request
//! impossible to build (bad configuration, unreadable certificates).
//!
//! ## Architecture
//!
//! - `DockhandError`: A custom error enum using `thiserror`.
//! - `Result<T>`: A type alias for `anyhow::Result<T>`, so call sites can add
//!   `.context(...)` while callers can still `downcast_ref::<DockhandError>()`.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use dockhand::core::error::DockhandError;
//! # async fn run(manager: dockhand::DockerManager) -> dockhand::Result<()> {
//! match manager.ping().await {
//!     Ok(envelope) => println!("daemon answered, ok = {}", envelope.status()),
//!     Err(e) if matches!(
//!         e.downcast_ref::<DockhandError>(),
//!         Some(DockhandError::Transport { .. })
//!     ) => println!("daemon unreachable: {e:#}"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```
//!
use thiserror::Error;

/// Custom error type for dockhand.
#[derive(Error, Debug)]
pub enum DockhandError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("Docker API request failed: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Streamed line exceeds {limit} bytes without a terminator")]
    LineTooLong { limit: usize },

    #[error("Container inspect document is missing '{field}'")]
    Inspect { field: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = DockhandError::Config("cert given without key".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: cert given without key"
        );

        let inspect_err = DockhandError::Inspect {
            field: "Config.Image".into(),
        };
        assert_eq!(
            inspect_err.to_string(),
            "Container inspect document is missing 'Config.Image'"
        );
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = DockhandError::InvalidRequest("empty id".into()).into();
        let err = err.context("Failed to inspect container");
        assert!(matches!(
            err.downcast_ref::<DockhandError>(),
            Some(DockhandError::InvalidRequest(_))
        ));
    }
}
