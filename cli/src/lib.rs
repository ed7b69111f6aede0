//! # Dockhand Library
//!
//! File: cli/src/lib.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! A thin client for the Docker Engine HTTP API. Every call returns an
//! [`Envelope`](api::Envelope): `status()` is `true` only for HTTP 200, 201
//! and 204, and the content is the decoded body (parsed JSON for
//! `application/json` responses, raw bytes otherwise, or a lazy line stream
//! for streaming calls).
//!
//! ## Architecture
//!
//! - **`core`**: Configuration loading and the error type.
//! - **`api`**: Endpoint table, HTTP transport, envelope decoding and the
//!   log frame demultiplexer.
//! - **`ops`**: The operation groups (`basic`, `image`, `container`)
//!   implemented as methods on [`DockerManager`].
//! - **`client`**: [`DockerManager`] itself.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dockhand::{core::config::{load_config, ConnectionOverrides}, DockerManager};
//!
//! # async fn run() -> dockhand::Result<()> {
//! let config = load_config(&ConnectionOverrides::default())?;
//! let docker = DockerManager::new(&config)?;
//! let version = docker.get_version().await?;
//! println!("{}", version.to_json_value().unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!

pub mod api;
pub mod client;
pub mod core;
pub mod ops;

pub use crate::client::DockerManager;
pub use crate::core::error::{DockhandError, Result};
