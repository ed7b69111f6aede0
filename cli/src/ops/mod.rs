//! # Dockhand Operation Groups
//!
//! File: cli/src/ops/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Each submodule adds one group of methods to
//! [`DockerManager`](crate::client::DockerManager):
//!
//! - **`basic`**: Daemon health and metadata (`ping`, `get_info`, `get_version`).
//! - **`image`**: Listing, inspecting, searching, pulling, pushing and removing images,
//!   plus tag lookups against the registry.
//! - **`container`**: Listing, creating, lifecycle actions, removal, commit, stats,
//!   logs and process listing.
//! - **`inspect`**: Flattening of container inspect documents.
//!
//! Every method returns `Result<Envelope>`: `Err` only for transport
//! failures or invalid arguments, `Envelope::Failure` for any non-success
//! HTTP status.
//!

/// Ping, info and version.
pub mod basic;
/// Container lifecycle and introspection.
pub mod container;
/// Image management and registry lookups.
pub mod image;
/// Flattened container inspect record.
pub mod inspect;

pub use container::{CommitOptions, ListContainersOptions, LogsOptions};
pub use image::{ListImagesOptions, PullImageOptions};
pub use inspect::ContainerDetails;

use std::collections::HashMap;

/// Docker list filters (`{"status": ["running"]}`), JSON-encoded as the API expects.
/// Empty filters are omitted entirely.
pub(crate) fn encode_filters(filters: &HashMap<String, Vec<String>>) -> Option<String> {
    if filters.is_empty() {
        None
    } else {
        serde_json::to_string(filters).ok()
    }
}

/// Scripted transport shared by the operation-group unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use crate::api::envelope::{is_success_code, split_lines};
    use crate::api::transport::{ApiRequest, RawResponse, ResponseBody, Transport};
    use crate::client::DockerManager;
    use crate::core::error::Result;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use bytes::Bytes;
    use futures_util::stream;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    pub type RequestLog = Arc<Mutex<Vec<ApiRequest>>>;

    /// Replays canned responses in order and records every request.
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<RawResponse>>,
        requests: RequestLog,
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
            let wants_stream = request.stream;
            self.requests.lock().unwrap().push(request);
            let mut response = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| anyhow!("no scripted response left"))?;
            if wants_stream && is_success_code(response.status_code) {
                if let ResponseBody::Full(bytes) = &response.body {
                    let chunks = stream::iter(vec![Ok(bytes.clone())]);
                    response.body = ResponseBody::Streaming(split_lines(chunks));
                }
            }
            Ok(response)
        }
    }

    pub fn manager(responses: Vec<RawResponse>) -> (DockerManager, RequestLog) {
        let requests = RequestLog::default();
        let transport = ScriptedTransport {
            responses: Mutex::new(responses.into()),
            requests: requests.clone(),
        };
        (
            DockerManager::with_transport(transport, "https://registry.test/v1/repositories/"),
            requests,
        )
    }

    pub fn json(status_code: u16, body: Value) -> RawResponse {
        RawResponse {
            status_code,
            content_type: Some("application/json".to_string()),
            body: ResponseBody::Full(Bytes::from(body.to_string())),
        }
    }

    pub fn raw(status_code: u16, content_type: &str, body: impl Into<Bytes>) -> RawResponse {
        RawResponse {
            status_code,
            content_type: Some(content_type.to_string()),
            body: ResponseBody::Full(body.into()),
        }
    }

    pub fn last_request(requests: &RequestLog) -> ApiRequest {
        requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}
