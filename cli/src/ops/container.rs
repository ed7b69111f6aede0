//! # Container Operations
//!
//! File: cli/src/ops/container.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Methods on [`DockerManager`] covering the container lifecycle: listing,
//! inspection, creation, start/stop/restart/pause/unpause/rename, removal,
//! commit, resource statistics, logs and the process table.
//!
//! ## Architecture
//!
//! Most methods are a single request whose envelope is returned untouched.
//! Two post-process successful content:
//!
//! - **`inspect_container`** with `flatten = true` replaces the inspect
//!   document with a [`ContainerDetails`] record.
//! - **`get_container_logs`** strips the 8-byte frame headers the daemon puts
//!   in front of every log chunk of a non-TTY container. Logs that are not
//!   framed (TTY containers) are returned unchanged.
//!
//! `get_container_stats` with `stream = true` returns
//! [`Content::Lines`], one JSON document per line, until the caller stops
//! reading or the container exits.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dockhand::{DockerManager, ops::LogsOptions};
//! use serde_json::json;
//!
//! # async fn run(docker: DockerManager) -> dockhand::Result<()> {
//! let created = docker
//!     .create_container_from_config(&json!({"Image": "alpine", "Cmd": ["echo", "hi"]}), Some("hello"))
//!     .await?;
//! if created.status() {
//!     docker.start_container("hello").await?;
//!     let logs = docker.get_container_logs("hello", &LogsOptions::default()).await?;
//!     println!("{:?}", logs.content().as_bytes());
//! }
//! # Ok(())
//! # }
//! ```
//!
use super::{encode_filters, inspect::ContainerDetails};
use crate::api::{
    endpoints::{ContainerAction, Endpoint},
    envelope::{Content, Envelope},
    frames,
    transport::ApiRequest,
};
use crate::client::DockerManager;
use crate::core::error::Result;
use bytes::Bytes;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Query options for `list_containers`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListContainersOptions {
    /// Include stopped containers.
    pub all: bool,
    /// Only the `limit` most recently created containers.
    pub limit: Option<u32>,
    /// Only containers created after this id.
    pub since: Option<String>,
    /// Only containers created before this id.
    pub before: Option<String>,
    /// Report container sizes.
    pub size: bool,
    /// API filters, e.g. `status=["exited"]`, `label=["env=prod"]`.
    pub filters: HashMap<String, Vec<String>>,
}

/// Query options for `get_container_logs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogsOptions {
    pub stdout: bool,
    pub stderr: bool,
    /// UNIX timestamp; only entries after it. `0` means no lower bound.
    pub since: i64,
    /// Prefix every line with its timestamp.
    pub timestamps: bool,
    /// Number of trailing lines, or `"all"`.
    pub tail: String,
}

impl Default for LogsOptions {
    fn default() -> Self {
        Self {
            stdout: true,
            stderr: true,
            since: 0,
            timestamps: false,
            tail: "all".to_string(),
        }
    }
}

/// Parameters of `POST /commit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOptions {
    pub container: String,
    pub repo: Option<String>,
    pub tag: Option<String>,
    pub comment: Option<String>,
    pub author: Option<String>,
}

impl CommitOptions {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            ..Default::default()
        }
    }
}

impl DockerManager {
    /// Lists containers (running only unless `options.all`).
    #[instrument(skip(self))]
    pub async fn list_containers(&self, options: &ListContainersOptions) -> Result<Envelope> {
        let request = ApiRequest::get(Endpoint::ListContainers, &[])?
            .query("all", options.all)
            .query_opt("limit", options.limit)
            .query_opt("since", options.since.as_deref())
            .query_opt("before", options.before.as_deref())
            .query("size", options.size)
            .query_opt("filters", encode_filters(&options.filters));
        self.send(request).await
    }

    /// Low-level information on a container. With `flatten`, a successful
    /// document is reduced to a [`ContainerDetails`] record.
    ///
    /// # Errors
    ///
    /// With `flatten`, `DockhandError::Inspect` if the daemon's document lacks
    /// a required field.
    #[instrument(skip(self))]
    pub async fn inspect_container(&self, container_id: &str, flatten: bool) -> Result<Envelope> {
        let envelope = self
            .send(ApiRequest::get(Endpoint::InspectContainer, &[container_id])?)
            .await?;
        if !flatten {
            return Ok(envelope);
        }
        envelope.map_success(|content| match content {
            Content::Json(doc) => {
                let details = ContainerDetails::from_inspect(&doc)?;
                Ok(Content::Json(serde_json::to_value(details)?))
            }
            other => Ok(other),
        })
    }

    /// Creates a container from a raw `ContainerConfig` JSON document.
    #[instrument(skip(self, configuration))]
    pub async fn create_container_from_config(
        &self,
        configuration: &Value,
        name: Option<&str>,
    ) -> Result<Envelope> {
        let request = ApiRequest::post(Endpoint::CreateContainer, &[])?
            .query_opt("name", name)
            .json(configuration.clone());
        self.send(request).await
    }

    pub async fn start_container(&self, container_id: &str) -> Result<Envelope> {
        self.container_action(container_id, ContainerAction::Start)
            .await
    }

    pub async fn stop_container(&self, container_id: &str) -> Result<Envelope> {
        self.container_action(container_id, ContainerAction::Stop)
            .await
    }

    pub async fn restart_container(&self, container_id: &str) -> Result<Envelope> {
        self.container_action(container_id, ContainerAction::Restart)
            .await
    }

    pub async fn pause_container(&self, container_id: &str) -> Result<Envelope> {
        self.container_action(container_id, ContainerAction::Pause)
            .await
    }

    pub async fn unpause_container(&self, container_id: &str) -> Result<Envelope> {
        self.container_action(container_id, ContainerAction::Unpause)
            .await
    }

    /// Renames a container to `name`.
    #[instrument(skip(self))]
    pub async fn rename_container(&self, container_id: &str, name: &str) -> Result<Envelope> {
        let request = ApiRequest::post(
            Endpoint::ContainerOperation,
            &[container_id, ContainerAction::Rename.as_str()],
        )?
        .query("name", name);
        self.send(request).await
    }

    #[instrument(skip(self))]
    async fn container_action(
        &self,
        container_id: &str,
        action: ContainerAction,
    ) -> Result<Envelope> {
        let request =
            ApiRequest::post(Endpoint::ContainerOperation, &[container_id, action.as_str()])?;
        self.send(request).await
    }

    /// Removes a container. `force` kills it first if running; `volumes`
    /// also removes its anonymous volumes.
    #[instrument(skip(self))]
    pub async fn remove_container(
        &self,
        container_id: &str,
        force: bool,
        volumes: bool,
    ) -> Result<Envelope> {
        let request = ApiRequest::delete(Endpoint::RemoveContainer, &[container_id])?
            .query("force", force)
            .query("v", volumes);
        self.send(request).await
    }

    /// Saves a container's filesystem as a new image.
    #[instrument(skip(self))]
    pub async fn commit_container(&self, options: &CommitOptions) -> Result<Envelope> {
        let request = ApiRequest::post(Endpoint::CommitContainer, &[])?
            .query("container", &options.container)
            .query_opt("repo", options.repo.as_deref())
            .query_opt("tag", options.tag.as_deref())
            .query_opt("comment", options.comment.as_deref())
            .query_opt("author", options.author.as_deref());
        self.send(request).await
    }

    /// Resource usage statistics. With `stream`, the content is a lazy
    /// [`Content::Lines`] stream of JSON documents; otherwise a single sample.
    #[instrument(skip(self))]
    pub async fn get_container_stats(&self, container_id: &str, stream: bool) -> Result<Envelope> {
        let mut request =
            ApiRequest::get(Endpoint::ContainerStats, &[container_id])?.query("stream", stream);
        if stream {
            request = request.streaming();
        }
        self.send(request).await
    }

    /// Fetches logs and strips the multiplexing frame headers.
    #[instrument(skip(self))]
    pub async fn get_container_logs(
        &self,
        container_id: &str,
        options: &LogsOptions,
    ) -> Result<Envelope> {
        let request = ApiRequest::get(Endpoint::ContainerLogs, &[container_id])?
            .query("stdout", options.stdout)
            .query("stderr", options.stderr)
            .query("since", options.since)
            .query("timestamps", options.timestamps)
            .query("tail", &options.tail);
        let envelope = self.send(request).await?;
        envelope.map_success(|content| Ok(demultiplex_logs(content)))
    }

    /// Processes running inside a container. `ps_args` is passed to `ps`
    /// (default `-ef`).
    #[instrument(skip(self))]
    pub async fn list_container_processes(
        &self,
        container_id: &str,
        ps_args: Option<&str>,
    ) -> Result<Envelope> {
        let request = ApiRequest::get(Endpoint::ContainerProcessList, &[container_id])?
            .query_opt("ps_args", ps_args);
        self.send(request).await
    }
}

fn demultiplex_logs(content: Content) -> Content {
    match content {
        Content::Bytes(raw) if frames::looks_multiplexed(&raw) => {
            let text = frames::demultiplex(&raw);
            debug!(
                "Demultiplexed {} log bytes into {} payload bytes",
                raw.len(),
                text.len()
            );
            Content::Bytes(Bytes::from(text))
        }
        Content::Bytes(raw) => {
            warn!("Log stream is not multiplexed (TTY container?); returning raw bytes.");
            Content::Bytes(raw)
        }
        other => other,
    }
}
