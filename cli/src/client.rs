//! # Docker Manager
//!
//! File: cli/src/client.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! [`DockerManager`] is the single entry point of the library. It owns a
//! [`Transport`] and the registry base URL; the operation groups in
//! [`crate::ops`] (`basic`, `image`, `container`) add their methods to it
//! through separate `impl` blocks.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dockhand::{core::config::Config, DockerManager};
//!
//! # async fn run() -> dockhand::Result<()> {
//! let manager = DockerManager::connect("docker.example.com:2375")?;
//! let envelope = manager.ping().await?;
//! assert!(envelope.status());
//!
//! // Or from a full configuration (TLS, timeout, registry URL).
//! let manager = DockerManager::new(&Config::default())?;
//! # let _ = manager;
//! # Ok(())
//! # }
//! ```
//!
use crate::api::{
    envelope::Envelope,
    transport::{ApiRequest, HttpTransport, Transport},
};
use crate::core::config::{finalize_config, Config, ConnectionConfig, RegistryConfig};
use crate::core::error::Result;
use std::fmt;

/// Client for one Docker daemon.
pub struct DockerManager {
    transport: Box<dyn Transport>,
    registry_url: String,
}

impl DockerManager {
    /// Builds a manager with an HTTP transport for `config`, after the same
    /// host normalization, `~` expansion and validation the config loader does.
    pub fn new(config: &Config) -> Result<Self> {
        let config = finalize_config(config.clone())?;
        let transport = HttpTransport::new(&config.connection)?;
        Ok(Self::with_transport(transport, config.registry.url.clone()))
    }

    /// Plain-HTTP manager for `host` (`name:port`) with default settings.
    pub fn connect(host: &str) -> Result<Self> {
        Self::new(&Config {
            connection: ConnectionConfig::insecure(host),
            registry: RegistryConfig::default(),
        })
    }

    /// Builds a manager over any transport.
    pub fn with_transport(
        transport: impl Transport + 'static,
        registry_url: impl Into<String>,
    ) -> Self {
        Self {
            transport: Box::new(transport),
            registry_url: registry_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Registry base URL used by `get_image_tags`, without trailing slash.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Executes `request` and wraps the response in an [`Envelope`].
    pub(crate) async fn send(&self, request: ApiRequest) -> Result<Envelope> {
        let response = self.transport.execute(request).await?;
        Ok(Envelope::from_response(response))
    }
}

impl fmt::Debug for DockerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockerManager")
            .field("registry_url", &self.registry_url)
            .finish_non_exhaustive()
    }
}
