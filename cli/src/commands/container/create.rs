//! # Dockhand Container Create Handler
//!
//! File: cli/src/commands/container/create.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Implements `dockhand container create`. The container configuration is
//! either read verbatim from a JSON file (`--config`) or assembled from
//! `--image` plus an optional command:
//!
//! ```bash
//! dockhand container create --config web.json --name web
//! dockhand container create --image alpine --name clock -- date -u
//! ```
//!
//! The JSON file is passed through untouched, so any field the Engine API
//! accepts in a create request can be used.
//!
use anyhow::{anyhow, Context};
use clap::Parser;
use dockhand::{
    api::Envelope,
    core::error::{DockhandError, Result},
    DockerManager,
};
use serde_json::{json, Value};
use std::{fs, path::PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// JSON file holding the full container configuration.
    #[arg(long, conflicts_with_all = ["image", "cmd"])]
    config: Option<PathBuf>,

    /// Image to create the container from.
    #[arg(long, required_unless_present = "config")]
    image: Option<String>,

    /// Name to assign to the container.
    #[arg(long)]
    name: Option<String>,

    /// Command to run, overriding the image default.
    #[arg(last = true)]
    cmd: Vec<String>,
}

impl CreateArgs {
    /// The JSON document sent as the create request body.
    pub fn configuration(&self) -> Result<Value> {
        if let Some(path) = &self.config {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read container config: {}", path.display()))?;
            let value: Value = serde_json::from_str(&raw).with_context(|| {
                format!("Container config is not valid JSON: {}", path.display())
            })?;
            if !value.is_object() {
                return Err(anyhow!(DockhandError::InvalidRequest(format!(
                    "container config {} must be a JSON object",
                    path.display()
                ))));
            }
            return Ok(value);
        }

        let image = self.image.as_deref().ok_or_else(|| {
            anyhow!(DockhandError::InvalidRequest(
                "either --config or --image is required".to_string()
            ))
        })?;
        let mut value = json!({ "Image": image });
        if !self.cmd.is_empty() {
            value["Cmd"] = json!(self.cmd);
        }
        Ok(value)
    }
}

pub async fn handle_create(docker: &DockerManager, args: CreateArgs) -> Result<Envelope> {
    let configuration = args.configuration()?;
    info!(
        "Creating container {} from {}",
        args.name.as_deref().unwrap_or("<unnamed>"),
        configuration["Image"]
    );
    docker
        .create_container_from_config(&configuration, args.name.as_deref())
        .await
}
