//! # Image Operations
//!
//! File: cli/src/ops/image.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Methods on [`DockerManager`] for images stored on the daemon, plus two
//! registry-facing calls: `search_image` (proxied by the daemon) and
//! `get_image_tags` (sent directly to the configured registry URL).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dockhand::{DockerManager, ops::PullImageOptions};
//!
//! # async fn run(docker: DockerManager) -> dockhand::Result<()> {
//! let pulled = docker
//!     .download_image(&PullImageOptions::new("alpine").tag("3.20"))
//!     .await?;
//! if pulled.status() {
//!     let history = docker.get_image_history("alpine:3.20").await?;
//!     println!("{:?}", history.content().as_json());
//! }
//! # Ok(())
//! # }
//! ```
//!
use super::encode_filters;
use crate::api::{endpoints::Endpoint, envelope::Envelope, transport::ApiRequest};
use crate::client::DockerManager;
use crate::core::error::Result;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// `X-Registry-Auth` value sent when the caller supplies none: base64 of `{}`.
const EMPTY_REGISTRY_AUTH: &str = "e30=";

/// Query options for `list_images`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListImagesOptions {
    /// Include intermediate layers.
    pub all: bool,
    /// Include digest information.
    pub digests: bool,
    /// API filters, e.g. `dangling=["true"]`, `reference=["alpine:*"]`.
    pub filters: HashMap<String, Vec<String>>,
}

/// Parameters of `POST /images/create`. Unset values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullImageOptions {
    pub from_image: Option<String>,
    pub tag: Option<String>,
    pub from_src: Option<String>,
    pub repo: Option<String>,
    pub registry: Option<String>,
}

impl PullImageOptions {
    /// Pull `image` from a registry.
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            from_image: Some(image.into()),
            ..Default::default()
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

impl DockerManager {
    /// Lists images on the daemon.
    #[instrument(skip(self))]
    pub async fn list_images(&self, options: &ListImagesOptions) -> Result<Envelope> {
        let request = ApiRequest::get(Endpoint::ListImages, &[])?
            .query("all", options.all)
            .query("digests", options.digests)
            .query_opt("filters", encode_filters(&options.filters));
        self.send(request).await
    }

    /// Removes an image. `force` also removes it when containers use it.
    #[instrument(skip(self))]
    pub async fn delete_image(&self, image_id: &str, force: bool) -> Result<Envelope> {
        let request = ApiRequest::delete(Endpoint::RemoveImage, &[image_id])?.query("force", force);
        self.send(request).await
    }

    /// Low-level information on an image.
    #[instrument(skip(self))]
    pub async fn get_image_detail(&self, image_id: &str) -> Result<Envelope> {
        self.send(ApiRequest::get(Endpoint::InspectImage, &[image_id])?)
            .await
    }

    /// Layer history of an image.
    #[instrument(skip(self))]
    pub async fn get_image_history(&self, image_id: &str) -> Result<Envelope> {
        self.send(ApiRequest::get(Endpoint::ImageHistory, &[image_id])?)
            .await
    }

    /// Searches Docker Hub through the daemon.
    #[instrument(skip(self))]
    pub async fn search_image(&self, term: &str) -> Result<Envelope> {
        let request = ApiRequest::get(Endpoint::SearchImage, &[])?.query("term", term);
        self.send(request).await
    }

    /// Lists the tags of a repository, asking the registry directly.
    #[instrument(skip(self))]
    pub async fn get_image_tags(&self, image_name: &str) -> Result<Envelope> {
        let path = Endpoint::ImageTags.render(&[image_name])?;
        let url = format!("{}{}", self.registry_url(), path);
        debug!("Fetching tags from {}", url);
        self.send(ApiRequest::get_absolute(url)).await
    }

    /// Pulls (or imports) an image. The daemon reports progress as a series
    /// of JSON objects; since that body is not a single JSON document it is
    /// returned as raw bytes.
    #[instrument(skip(self))]
    pub async fn download_image(&self, options: &PullImageOptions) -> Result<Envelope> {
        let request = ApiRequest::post(Endpoint::CreateImage, &[])?
            .query_opt("fromImage", options.from_image.as_deref())
            .query_opt("tag", options.tag.as_deref())
            .query_opt("fromSrc", options.from_src.as_deref())
            .query_opt("repo", options.repo.as_deref())
            .query_opt("registry", options.registry.as_deref());
        self.send(request).await
    }

    /// Pushes `repo_name` (optionally a single `tag`) to its registry.
    /// `registry_auth` is the base64 `X-Registry-Auth` payload; without it an
    /// empty credential object is sent.
    #[instrument(skip(self, registry_auth))]
    pub async fn push_image(
        &self,
        repo_name: &str,
        tag: Option<&str>,
        registry_auth: Option<&str>,
    ) -> Result<Envelope> {
        let request = ApiRequest::post(Endpoint::PushImage, &[repo_name])?
            .query_opt("tag", tag)
            .header(
                "X-Registry-Auth",
                registry_auth.unwrap_or(EMPTY_REGISTRY_AUTH),
            );
        self.send(request).await
    }
}
