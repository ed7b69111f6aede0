//! # Dockhand Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates under `cli/tests/`:
//! - `dockhand_cmd`: the compiled binary, isolated from the caller's
//!   `DOCKHAND_*` environment and config files.
//! - `spawn_daemon`: serves an `axum` router on `127.0.0.1:0`, standing in
//!   for a Docker daemon.
//! - `manager_for`: a real `DockerManager` (HTTP transport) pointed at it.
//!

// Each test crate uses a different subset of these helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;

use axum::Router;
use dockhand::{
    core::config::{Config, ConnectionConfig, RegistryConfig},
    DockerManager,
};
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;

/// `dockhand` binary with a clean environment, run from `workdir` so no
/// project `.dockhand.toml` is picked up.
pub fn dockhand_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dockhand").expect("Failed to find dockhand binary for testing");
    cmd.current_dir(workdir)
        .env("HOME", workdir)
        .env("XDG_CONFIG_HOME", workdir.join(".config"))
        .env_remove("RUST_LOG");
    for var in [
        "DOCKHAND_HOST",
        "DOCKHAND_TLS_VERIFY",
        "DOCKHAND_CERT",
        "DOCKHAND_KEY",
        "DOCKHAND_CA",
        "DOCKHAND_TIMEOUT",
        "DOCKHAND_REGISTRY_AUTH",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Serves `router` on an ephemeral local port for the rest of the test.
pub async fn spawn_daemon(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake daemon");
    let addr = listener.local_addr().expect("Fake daemon has no address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Fake daemon stopped");
    });
    addr
}

/// Plain-HTTP manager for `addr`, with the registry served by the same server
/// under `/v1/repositories`.
pub fn manager_for(addr: SocketAddr) -> DockerManager {
    let config = Config {
        connection: ConnectionConfig::insecure(addr.to_string()),
        registry: RegistryConfig {
            url: format!("http://{addr}/v1/repositories"),
        },
    };
    DockerManager::new(&config).expect("Failed to build DockerManager")
}

/// A local address with nothing listening on it.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind scratch listener");
    let addr = listener.local_addr().expect("Scratch listener has no address");
    drop(listener);
    addr
}
