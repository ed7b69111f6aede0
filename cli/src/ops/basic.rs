//! # Basic Daemon Operations
//!
//! File: cli/src/ops/basic.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! Health check and metadata of the daemon itself.
//!
use crate::api::{endpoints::Endpoint, envelope::Envelope, transport::ApiRequest};
use crate::client::DockerManager;
use crate::core::error::Result;
use tracing::instrument;

impl DockerManager {
    /// Pings the daemon. A healthy daemon answers `200 OK` with body `OK`.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<Envelope> {
        self.send(ApiRequest::get(Endpoint::Ping, &[])?).await
    }

    /// System-wide information (`docker info`).
    #[instrument(skip(self))]
    pub async fn get_info(&self) -> Result<Envelope> {
        self.send(ApiRequest::get(Endpoint::Info, &[])?).await
    }

    /// Daemon and API versions (`docker version`).
    #[instrument(skip(self))]
    pub async fn get_version(&self) -> Result<Envelope> {
        self.send(ApiRequest::get(Endpoint::Version, &[])?).await
    }
}
