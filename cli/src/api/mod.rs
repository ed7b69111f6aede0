//! # Dockhand Docker API Layer
//!
//! File: cli/src/api/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Everything between an operation call and the wire:
//!
//! - **`endpoints`**: The endpoint table (path templates with positional slots).
//! - **`transport`**: Request model, the `Transport` trait and the `reqwest` implementation.
//! - **`envelope`**: Success/failure classification and content decoding.
//! - **`frames`**: Demultiplexing of framed stdout/stderr log streams.
//!

/// Static table of Docker Engine REST endpoints.
pub mod endpoints;
/// Response envelope and content decoding.
pub mod envelope;
/// Decoder for multiplexed (framed) log streams.
pub mod frames;
/// HTTP transport to the daemon.
pub mod transport;

pub use endpoints::{ContainerAction, Endpoint};
pub use envelope::{Content, Envelope, LineStream};
pub use transport::{ApiRequest, HttpTransport, Transport};
