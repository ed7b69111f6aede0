//! # Dockhand Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! This module loads, merges and validates the settings needed to reach a
//! Docker daemon: host, TLS flag, client certificate/key, CA bundle and the
//! request timeout, plus the registry base URL used for tag lookups.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags / `DOCKHAND_*` environment variables (applied by the
//!    binary through [`ConnectionOverrides`])
//! 2. Project-specific `.dockhand.toml` in the current directory or ancestors
//! 3. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/dockhand/config.toml`)
//! 4. Default values defined in the code
//!
//! Certificate paths have `~` expanded, and the merged result is validated
//! before any client is built from it.
//!
//! ## Examples
//!
//! ```toml
//! [connection]
//! host = "docker.example.com:2376"
//! tls_verify = true
//! cert = "~/.docker/cert.pem"
//! key = "~/.docker/key.pem"
//! ca = "~/.docker/ca.pem"
//! timeout_secs = 10
//!
//! [registry]
//! url = "https://registry.hub.docker.com/v1/repositories"
//! ```
//!
use crate::core::error::{DockhandError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// How to reach the Docker daemon.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Daemon address as `host:port`. A leading `tcp://` is accepted and stripped.
    #[serde(default = "default_host")]
    pub host: String,
    /// Use `https://` and present TLS credentials.
    #[serde(default)]
    pub tls_verify: bool,
    /// Client certificate (PEM). Requires `key`.
    #[serde(default)]
    pub cert: Option<String>,
    /// Client private key (PEM). Requires `cert`.
    #[serde(default)]
    pub key: Option<String>,
    /// CA bundle used to verify the daemon. Without it the daemon certificate is not verified.
    #[serde(default)]
    pub ca: Option<String>,
    /// Connect timeout, and total timeout for non-streaming requests.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Where image tag listings are fetched from.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_url")]
    pub url: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            tls_verify: false,
            cert: None,
            key: None,
            ca: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: default_registry_url(),
        }
    }
}

impl ConnectionConfig {
    /// Convenience constructor for a plain-HTTP connection to `host`.
    pub fn insecure(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_host() -> String {
    "localhost:2375".to_string()
}
fn default_timeout_secs() -> u64 {
    5
}
fn default_registry_url() -> String {
    "https://registry.hub.docker.com/v1/repositories".to_string()
}

/// Values supplied on the command line (or via environment variables).
/// `None` leaves the file/default value untouched.
#[derive(Debug, Default, Clone)]
pub struct ConnectionOverrides {
    pub host: Option<String>,
    pub tls_verify: Option<bool>,
    pub cert: Option<String>,
    pub key: Option<String>,
    pub ca: Option<String>,
    pub timeout_secs: Option<u64>,
}

const PROJECT_CONFIG_FILENAME: &str = ".dockhand.toml";

/// One configuration file as written. Keys it leaves out stay `None`, so a
/// later layer only replaces the settings it actually names.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    #[serde(default)]
    connection: ConnectionLayer,
    #[serde(default)]
    registry: RegistryLayer,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ConnectionLayer {
    host: Option<String>,
    tls_verify: Option<bool>,
    cert: Option<String>,
    key: Option<String>,
    ca: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct RegistryLayer {
    url: Option<String>,
}

impl ConfigLayer {
    fn apply_to(self, config: &mut Config) {
        let conn = &mut config.connection;
        let layer = self.connection;
        if let Some(host) = layer.host {
            conn.host = host;
        }
        if let Some(tls_verify) = layer.tls_verify {
            conn.tls_verify = tls_verify;
        }
        if layer.cert.is_some() {
            conn.cert = layer.cert;
        }
        if layer.key.is_some() {
            conn.key = layer.key;
        }
        if layer.ca.is_some() {
            conn.ca = layer.ca;
        }
        if let Some(timeout_secs) = layer.timeout_secs {
            conn.timeout_secs = timeout_secs;
        }
        if let Some(url) = self.registry.url {
            config.registry.url = url;
        }
    }
}

/// Loads user and project configuration, applies `overrides`, expands paths
/// and validates the result.
pub fn load_config(overrides: &ConnectionOverrides) -> Result<Config> {
    let user_layer = load_user_config()?;
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let project_layer = load_project_config(&current_dir)?;
    let mut merged_config = merge_layers([user_layer, project_layer]);
    apply_overrides(&mut merged_config, overrides);
    finalize_config(merged_config)
}

/// Expands and validates a configuration assembled by the caller.
pub fn finalize_config(mut config: Config) -> Result<Config> {
    config.connection.host = normalize_host(&config.connection.host);
    expand_config_paths(&mut config).context("Failed to expand paths in configuration")?;
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<ConfigLayer>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Dockhand", "dockhand") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_layer(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config(start: &Path) -> Result<Option<ConfigLayer>> {
    if let Some(project_config_path) = find_project_config_path(start) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_layer(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.dockhand.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks from `start` towards the filesystem root looking for `.dockhand.toml`.
/// The search stops at the first directory containing `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_layer(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Reads and parses a single TOML configuration file on top of the defaults.
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    Ok(merge_layers([Some(load_layer(path)?)]))
}

/// Applies each present layer over the defaults, later layers winning.
fn merge_layers<const N: usize>(layers: [Option<ConfigLayer>; N]) -> Config {
    let mut merged = Config::default();
    for layer in layers.into_iter().flatten() {
        layer.apply_to(&mut merged);
    }
    merged
}

fn apply_overrides(config: &mut Config, overrides: &ConnectionOverrides) {
    let conn = &mut config.connection;
    if let Some(host) = &overrides.host {
        conn.host = host.clone();
    }
    if let Some(tls_verify) = overrides.tls_verify {
        conn.tls_verify = tls_verify;
    }
    if overrides.cert.is_some() {
        conn.cert = overrides.cert.clone();
    }
    if overrides.key.is_some() {
        conn.key = overrides.key.clone();
    }
    if overrides.ca.is_some() {
        conn.ca = overrides.ca.clone();
    }
    if let Some(timeout_secs) = overrides.timeout_secs {
        conn.timeout_secs = timeout_secs;
    }
}

/// Strips the `tcp://` prefix used by `DOCKER_HOST` and any trailing slash.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    host.strip_prefix("tcp://")
        .unwrap_or(host)
        .trim_end_matches('/')
        .to_string()
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    let conn = &mut config.connection;
    for path in [&mut conn.cert, &mut conn.key, &mut conn.ca]
        .into_iter()
        .flatten()
    {
        *path = shellexpand::tilde(path.as_str()).into_owned();
        debug!("Expanded certificate path: {}", path);
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    let conn = &config.connection;
    if conn.host.is_empty() {
        return Err(anyhow!(DockhandError::Config(
            "Docker host cannot be empty.".to_string()
        )));
    }
    if conn.host.contains("://") {
        return Err(anyhow!(DockhandError::Config(format!(
            "Invalid Docker host '{}'. Expected HOST:PORT; the scheme follows `tls_verify`.",
            conn.host
        ))));
    }
    if conn.cert.is_some() != conn.key.is_some() {
        return Err(anyhow!(DockhandError::Config(
            "Client certificate and key must be configured together.".to_string()
        )));
    }
    if conn.timeout_secs == 0 {
        return Err(anyhow!(DockhandError::Config(
            "timeout_secs must be greater than zero.".to_string()
        )));
    }
    if !conn.tls_verify && (conn.cert.is_some() || conn.ca.is_some()) {
        warn!("TLS material is configured but tls_verify is off; it will not be used.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [connection]
            host = "docker.example.com:2376"
            tls_verify = true
            cert = "~/certs/cert.pem"
            key = "~/certs/key.pem"

            [registry]
            url = "https://registry.example.com/v1/repositories"
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.connection.host, "docker.example.com:2376");
        assert!(config.connection.tls_verify);
        assert_eq!(config.connection.cert.as_deref(), Some("~/certs/cert.pem")); // Not yet expanded
        assert_eq!(config.connection.ca, None);
        assert_eq!(config.connection.timeout_secs, 5); // Default
        assert_eq!(
            config.registry.url,
            "https://registry.example.com/v1/repositories"
        );
    }

    #[test]
    fn test_empty_toml_matches_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.connection.host, "localhost:2375");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[connection]\nhots = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config {
            connection: ConnectionConfig {
                cert: Some("~/cert.pem".to_string()),
                key: Some("/absolute/key.pem".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        expand_config_paths(&mut config).unwrap();

        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(
            config.connection.cert.as_deref(),
            Some(home_dir.join("cert.pem").to_string_lossy().as_ref())
        );
        assert_eq!(config.connection.key.as_deref(), Some("/absolute/key.pem"));
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("tcp://10.0.0.5:2376"), "10.0.0.5:2376");
        assert_eq!(normalize_host(" localhost:2375/ "), "localhost:2375");
        assert_eq!(normalize_host("docker:2375"), "docker:2375");
    }

    #[test]
    fn test_validate_config_cert_without_key() {
        let config = Config {
            connection: ConnectionConfig {
                tls_verify: true,
                cert: Some("/c.pem".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("certificate and key"));
    }

    #[test]
    fn test_validate_config_rejects_http_scheme() {
        let config = Config {
            connection: ConnectionConfig::insecure("https://docker:2376"),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_zero_timeout() {
        let config = Config {
            connection: ConnectionConfig {
                timeout_secs: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    fn layer(toml_content: &str) -> Option<ConfigLayer> {
        Some(toml::from_str(toml_content).expect("Failed to parse layer"))
    }

    #[test]
    fn test_merge_project_wins_over_user() {
        let user = layer(
            "[connection]\nhost = \"user-host:2375\"\nca = \"/user/ca.pem\"\ntimeout_secs = 30\n",
        );
        let project = layer("[connection]\nhost = \"project-host:2375\"\n");
        let merged = merge_layers([user, project]);
        assert_eq!(merged.connection.host, "project-host:2375");
        assert_eq!(merged.connection.ca.as_deref(), Some("/user/ca.pem"));
        assert_eq!(merged.connection.timeout_secs, 30);
    }

    #[test]
    fn test_project_can_turn_tls_off_and_restore_defaults() {
        let user = layer(
            "[connection]\nhost = \"remote:2376\"\ntls_verify = true\ntimeout_secs = 30\n",
        );
        let project = layer(
            "[connection]\nhost = \"localhost:2375\"\ntls_verify = false\ntimeout_secs = 5\n",
        );
        let merged = merge_layers([user, project]);
        assert!(!merged.connection.tls_verify);
        assert_eq!(merged.connection.host, "localhost:2375");
        assert_eq!(merged.connection.timeout_secs, 5);
    }

    #[test]
    fn test_missing_layers_leave_defaults() {
        assert_eq!(merge_layers([None, None]), Config::default());
        let user = layer("[connection]\ntls_verify = true\n");
        assert!(merge_layers([user, layer("")]).connection.tls_verify);
    }

    #[test]
    fn test_overrides_apply_last() {
        let mut config = Config::default();
        let overrides = ConnectionOverrides {
            host: Some("cli-host:2376".into()),
            tls_verify: Some(true),
            timeout_secs: Some(9),
            ..Default::default()
        };
        apply_overrides(&mut config, &overrides);
        assert_eq!(config.connection.host, "cli-host:2376");
        assert!(config.connection.tls_verify);
        assert_eq!(config.connection.timeout(), Duration::from_secs(9));
    }

    #[test]
    fn test_find_project_config_in_ancestor() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            temp_dir.path().join(PROJECT_CONFIG_FILENAME),
            "[connection]\nhost = \"found:2375\"\n",
        )
        .unwrap();

        let found = find_project_config_path(&nested).expect("config should be found");
        let config = load_config_from_path(&found).unwrap();
        assert_eq!(config.connection.host, "found:2375");
    }

    #[test]
    fn test_find_project_config_stops_at_git_root() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(PROJECT_CONFIG_FILENAME),
            "[connection]\nhost = \"outside:2375\"\n",
        )
        .unwrap();
        let repo = temp_dir.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();

        assert!(find_project_config_path(&repo).is_none());
    }

    #[test]
    fn test_finalize_config_normalizes_host() {
        let config = Config {
            connection: ConnectionConfig::insecure("tcp://build-box:2375"),
            ..Default::default()
        };
        let config = finalize_config(config).unwrap();
        assert_eq!(config.connection.host, "build-box:2375");
    }
}
