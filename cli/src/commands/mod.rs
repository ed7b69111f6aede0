//! # Dockhand Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Command-line front end over the library. Every subcommand maps to exactly
//! one [`DockerManager`] operation and hands the resulting envelope to
//! [`output::print_envelope`].
//!
//! ## Command Groups
//!
//! - `container`: Container lifecycle and introspection
//! - `image`: Image management and registry lookups
//! - `output`: Rendering of envelopes and streamed lines
//!
//! `ping`, `info` and `version` take no arguments and are dispatched
//! directly from `main.rs`.
//!
//! Connection settings ([`ConnectionArgs`]) are global flags, each with a
//! `DOCKHAND_*` environment variable, layered over the configuration files.
//!
use anyhow::{anyhow, Context};
use clap::Args;
use dockhand::{
    core::{
        config::{load_config, ConnectionOverrides},
        error::{DockhandError, Result},
    },
    DockerManager,
};
use std::collections::HashMap;

/// Command group for containers: `ls`, `inspect`, `create`, `start`, `logs`, ...
pub mod container;
/// Command group for images: `ls`, `rm`, `pull`, `push`, `tags`, ...
pub mod image;
/// Printing of envelopes.
pub mod output;

/// Connection flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Docker daemon address as `host:port`.
    #[arg(long, env = "DOCKHAND_HOST", global = true)]
    pub host: Option<String>,

    /// Talk HTTPS to the daemon.
    #[arg(long, env = "DOCKHAND_TLS_VERIFY", global = true)]
    pub tls_verify: bool,

    /// Client certificate (PEM), used with --key.
    #[arg(long, env = "DOCKHAND_CERT", global = true)]
    pub cert: Option<String>,

    /// Client private key (PEM), used with --cert.
    #[arg(long, env = "DOCKHAND_KEY", global = true)]
    pub key: Option<String>,

    /// CA bundle (PEM) used to verify the daemon certificate.
    #[arg(long, env = "DOCKHAND_CA", global = true)]
    pub ca: Option<String>,

    /// Timeout in seconds for connecting and for non-streaming requests.
    #[arg(long, env = "DOCKHAND_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl ConnectionArgs {
    pub fn overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            host: self.host.clone(),
            tls_verify: self.tls_verify.then_some(true),
            cert: self.cert.clone(),
            key: self.key.clone(),
            ca: self.ca.clone(),
            timeout_secs: self.timeout,
        }
    }
}

/// Loads the configuration and builds a manager for it. No network traffic
/// happens until the first operation.
pub fn connect(args: &ConnectionArgs) -> Result<DockerManager> {
    let config = load_config(&args.overrides())?;
    DockerManager::new(&config).context("Failed to set up the Docker client")
}

/// `key=value` pairs into the API's filter map; repeated keys accumulate.
pub fn parse_filters(pairs: &[String]) -> Result<HashMap<String, Vec<String>>> {
    let mut filters: HashMap<String, Vec<String>> = HashMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| {
                anyhow!(DockhandError::InvalidRequest(format!(
                    "filter '{pair}' is not of the form key=value"
                )))
            })?;
        filters
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }
    Ok(filters)
}
