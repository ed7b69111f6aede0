//! # Dockhand Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Foundational pieces shared by the API layer and the command-line front end:
//! - `config`: Connection settings, loaded from TOML files and merged with defaults
//! - `error`: Error types and the crate-wide `Result` alias
//!
//! ```rust,ignore
//! use crate::core::config; // For loading connection settings
//! use crate::core::error::{DockhandError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
