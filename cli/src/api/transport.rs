//! # Docker API Transport
//!
//! File: cli/src/api/transport.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! The transport turns an [`ApiRequest`] into an HTTP exchange and hands
//! back a [`RawResponse`] (status code, content type, body). Classification
//! into success/failure happens one level up, in
//! [`Envelope::from_response`](crate::api::envelope::Envelope::from_response).
//!
//! ## Architecture
//!
//! - [`Transport`]: the seam between operation groups and the network. The
//!   production implementation is [`HttpTransport`]; tests substitute a
//!   scripted one.
//! - [`HttpTransport`]: `reqwest` client built from a
//!   [`ConnectionConfig`]. The URL scheme follows `tls_verify`
//!   (`https://` or `http://`). With TLS on, an optional client identity
//!   (cert + key) is presented and an optional CA bundle is trusted. Without
//!   a CA bundle the daemon certificate is not verified, as with
//!   `docker --tls` (a warning is logged).
//! - Registry lookups ([`Target::Absolute`]) go through a separate default
//!   client, so daemon TLS settings never apply to the public registry.
//!
//! Transport-level failures (DNS, refused connection, TLS, timeout) are
//! returned as `Err(DockhandError::Transport)`. Nothing is retried.
//!
use crate::api::endpoints::Endpoint;
use crate::api::envelope::{is_success_code, split_lines, LineStream};
use crate::core::config::{normalize_host, ConnectionConfig};
use crate::core::error::{DockhandError, Result};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::{header::CONTENT_TYPE, Certificate, Client, Identity};
use serde_json::Value;
use std::{fmt, fs, time::Duration};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

/// Where a request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Path on the configured daemon, e.g. `/containers/json`.
    Daemon(String),
    /// Fully qualified URL outside the daemon (registry lookups).
    Absolute(String),
}

/// A request in transport-neutral form.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub target: Target,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// JSON request body.
    pub body: Option<Value>,
    /// Return the body as a lazy line stream instead of buffering it.
    pub stream: bool,
}

impl ApiRequest {
    fn new(method: Method, target: Target) -> Self {
        Self {
            method,
            target,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            stream: false,
        }
    }

    pub fn get(endpoint: Endpoint, args: &[&str]) -> Result<Self> {
        Ok(Self::new(Method::Get, Target::Daemon(endpoint.render(args)?)))
    }

    pub fn post(endpoint: Endpoint, args: &[&str]) -> Result<Self> {
        Ok(Self::new(Method::Post, Target::Daemon(endpoint.render(args)?)))
    }

    pub fn delete(endpoint: Endpoint, args: &[&str]) -> Result<Self> {
        Ok(Self::new(Method::Delete, Target::Daemon(endpoint.render(args)?)))
    }

    pub fn get_absolute(url: impl Into<String>) -> Self {
        Self::new(Method::Get, Target::Absolute(url.into()))
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Adds the parameter only when `value` is `Some`.
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    /// Looks up a query parameter by name.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Body of a [`RawResponse`].
pub enum ResponseBody {
    Full(Bytes),
    Streaming(LineStream),
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Full(bytes) => f.debug_tuple("Full").field(bytes).finish(),
            ResponseBody::Streaming(_) => f.write_str("Streaming(..)"),
        }
    }
}

/// Status, content type and body of a daemon response.
#[derive(Debug)]
pub struct RawResponse {
    pub status_code: u16,
    pub content_type: Option<String>,
    pub body: ResponseBody,
}

/// Sends requests to the daemon.
///
/// Implementations return [`ResponseBody::Streaming`] only when the request
/// asked for streaming *and* the status code is a success code; error bodies
/// are always buffered.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// `reqwest`-backed transport for a single daemon.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    registry_client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Builds the HTTP clients for `config`, loading TLS material from disk.
    ///
    /// # Errors
    ///
    /// * `DockhandError::Config` - only one of `cert` and `key` is set.
    /// * `DockhandError::Io` - a certificate, key or CA file cannot be read.
    /// * `DockhandError::Tls` - a PEM file cannot be parsed.
    /// * `DockhandError::Transport` - the client cannot be constructed.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let timeout = config.timeout();
        let mut builder = Client::builder().connect_timeout(timeout);

        if config.tls_verify {
            match (&config.cert, &config.key) {
                (Some(cert), Some(key)) => {
                    builder = builder.identity(load_identity(cert, key)?);
                }
                (None, None) => {}
                _ => {
                    return Err(anyhow!(DockhandError::Config(
                        "Client certificate and key must be configured together.".to_string()
                    )));
                }
            }
            match &config.ca {
                Some(ca) => {
                    builder = builder.add_root_certificate(load_ca(ca)?);
                }
                None => {
                    warn!(
                        "TLS enabled for '{}' without a CA bundle; the daemon certificate will not be verified.",
                        config.host
                    );
                    builder = builder.danger_accept_invalid_certs(true);
                }
            }
        }

        let client = builder
            .build()
            .map_err(|e| anyhow!(DockhandError::Transport { source: e }))
            .context("Failed to build HTTP client for the Docker daemon")?;
        let registry_client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| anyhow!(DockhandError::Transport { source: e }))
            .context("Failed to build HTTP client for the registry")?;

        Ok(Self {
            client,
            registry_client,
            base_url: base_url(config),
            timeout,
        })
    }

    /// Scheme and host every daemon path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// `https://host` when TLS is on, `http://host` otherwise.
pub fn base_url(config: &ConnectionConfig) -> String {
    let scheme = if config.tls_verify {
        "https://"
    } else {
        "http://"
    };
    format!("{scheme}{}", normalize_host(&config.host))
}

fn load_identity(cert: &str, key: &str) -> Result<Identity> {
    let mut pem = fs::read(cert)
        .map_err(|e| anyhow!(DockhandError::Io { source: e }))
        .with_context(|| format!("Failed to read client certificate: {cert}"))?;
    pem.push(b'\n');
    pem.extend(
        fs::read(key)
            .map_err(|e| anyhow!(DockhandError::Io { source: e }))
            .with_context(|| format!("Failed to read client key: {key}"))?,
    );
    Identity::from_pem(&pem).map_err(|e| {
        anyhow!(DockhandError::Tls(format!(
            "invalid client certificate/key ({cert}, {key}): {e}"
        )))
    })
}

fn load_ca(ca: &str) -> Result<Certificate> {
    let pem = fs::read(ca)
        .map_err(|e| anyhow!(DockhandError::Io { source: e }))
        .with_context(|| format!("Failed to read CA bundle: {ca}"))?;
    Certificate::from_pem(&pem)
        .map_err(|e| anyhow!(DockhandError::Tls(format!("invalid CA bundle ({ca}): {e}"))))
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, stream = request.stream))]
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let (client, url) = match &request.target {
            Target::Daemon(path) => (&self.client, format!("{}{}", self.base_url, path)),
            Target::Absolute(url) => (&self.registry_client, url.clone()),
        };
        debug!(url = %url, query = ?request.query, "Sending request");

        let mut builder = client.request(request.method.into(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if !request.stream {
            builder = builder.timeout(self.timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| anyhow!(DockhandError::Transport { source: e }))
            .with_context(|| format!("{} {} failed", request.method, url))?;

        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        debug!(status_code, content_type = ?content_type, "Received response");

        let body = if request.stream && is_success_code(status_code) {
            let chunks = response
                .bytes_stream()
                .map(|chunk| chunk.map_err(|e| anyhow!(DockhandError::Transport { source: e })));
            ResponseBody::Streaming(split_lines(chunks))
        } else {
            ResponseBody::Full(
                response
                    .bytes()
                    .await
                    .map_err(|e| anyhow!(DockhandError::Transport { source: e }))
                    .with_context(|| format!("Failed to read response body from {url}"))?,
            )
        };

        Ok(RawResponse {
            status_code,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_follows_tls_flag() {
        let mut config = ConnectionConfig::insecure("docker.example.com:2376");
        assert_eq!(base_url(&config), "http://docker.example.com:2376");
        config.tls_verify = true;
        assert_eq!(base_url(&config), "https://docker.example.com:2376");
    }

    #[test]
    fn test_base_url_strips_tcp_prefix() {
        let config = ConnectionConfig::insecure("tcp://10.0.0.5:2375/");
        assert_eq!(base_url(&config), "http://10.0.0.5:2375");
    }

    #[test]
    fn test_request_builder_keeps_query_order_and_skips_none() {
        let request = ApiRequest::get(Endpoint::ContainerLogs, &["web"])
            .unwrap()
            .query("stdout", true)
            .query_opt::<&str>("since", None)
            .query("tail", "all");
        assert_eq!(request.target, Target::Daemon("/containers/web/logs".into()));
        assert_eq!(
            request.query,
            vec![
                ("stdout".to_string(), "true".to_string()),
                ("tail".to_string(), "all".to_string()),
            ]
        );
        assert_eq!(request.query_value("since"), None);
        assert!(!request.stream);
    }

    #[test]
    fn test_http_transport_without_tls_needs_no_files() {
        let transport = HttpTransport::new(&ConnectionConfig::insecure("127.0.0.1:2375")).unwrap();
        assert_eq!(transport.base_url(), "http://127.0.0.1:2375");
    }

    #[test]
    fn test_missing_certificate_is_io_error() {
        let config = ConnectionConfig {
            tls_verify: true,
            cert: Some("/nonexistent/cert.pem".into()),
            key: Some("/nonexistent/key.pem".into()),
            ..ConnectionConfig::insecure("docker:2376")
        };
        let err = HttpTransport::new(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DockhandError>(),
            Some(DockhandError::Io { .. })
        ));
    }

    #[test]
    fn test_cert_without_key_is_config_error() {
        let config = ConnectionConfig {
            tls_verify: true,
            cert: Some("/nonexistent/cert.pem".into()),
            ..ConnectionConfig::insecure("docker:2376")
        };
        let err = HttpTransport::new(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DockhandError>(),
            Some(DockhandError::Config(_))
        ));
    }
}
