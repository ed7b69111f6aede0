//! # Docker Engine Endpoint Table
//!
//! File: cli/src/api/endpoints.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Static mapping from logical operations to the URL path templates of the
//! Docker Engine REST API. Templates use positional placeholders (`{0}`,
//! `{1}`) that [`Endpoint::render`] substitutes in order.
//!
//! Query strings are never baked into templates; they are passed separately
//! to the transport so values get percent-encoded.
//!
use crate::core::error::{DockhandError, Result};
use anyhow::anyhow;
use std::fmt;

/// Every REST endpoint dockhand talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    // Basic
    Ping,
    Info,
    Version,

    // Containers
    ListContainers,
    InspectContainer,
    CreateContainer,
    ContainerOperation,
    RemoveContainer,
    CommitContainer,
    ContainerStats,
    ContainerLogs,
    ContainerProcessList,

    // Images
    ListImages,
    RemoveImage,
    InspectImage,
    ImageHistory,
    SearchImage,
    CreateImage,
    PushImage,

    // Registry (absolute, relative to the configured registry URL)
    ImageTags,
}

impl Endpoint {
    /// The raw path template.
    pub const fn template(self) -> &'static str {
        match self {
            Endpoint::Ping => "/_ping",
            Endpoint::Info => "/info",
            Endpoint::Version => "/version",

            Endpoint::ListContainers => "/containers/json",
            Endpoint::InspectContainer => "/containers/{0}/json",
            Endpoint::CreateContainer => "/containers/create",
            Endpoint::ContainerOperation => "/containers/{0}/{1}",
            Endpoint::RemoveContainer => "/containers/{0}",
            Endpoint::CommitContainer => "/commit",
            Endpoint::ContainerStats => "/containers/{0}/stats",
            Endpoint::ContainerLogs => "/containers/{0}/logs",
            Endpoint::ContainerProcessList => "/containers/{0}/top",

            Endpoint::ListImages => "/images/json",
            Endpoint::RemoveImage => "/images/{0}",
            Endpoint::InspectImage => "/images/{0}/json",
            Endpoint::ImageHistory => "/images/{0}/history",
            Endpoint::SearchImage => "/images/search",
            Endpoint::CreateImage => "/images/create",
            Endpoint::PushImage => "/images/{0}/push",

            Endpoint::ImageTags => "/{0}/tags",
        }
    }

    /// Number of positional slots in the template.
    pub fn arity(self) -> usize {
        self.template().matches('{').count()
    }

    /// Substitutes `args` into the template's positional slots.
    ///
    /// Fails if the argument count does not match the template, or if an
    /// argument has an empty, `.` or `..` path segment (which would silently
    /// address a different endpoint). Slashes are allowed since image names
    /// such as `library/ubuntu` contain them.
    pub fn render(self, args: &[&str]) -> Result<String> {
        if args.len() != self.arity() {
            return Err(anyhow!(DockhandError::InvalidRequest(format!(
                "{self} expects {} path argument(s), got {}",
                self.arity(),
                args.len()
            ))));
        }
        let mut path = self.template().to_string();
        for (index, arg) in args.iter().enumerate() {
            if !is_valid_path_arg(arg) {
                return Err(anyhow!(DockhandError::InvalidRequest(format!(
                    "invalid path argument '{arg}' for {self}"
                ))));
            }
            path = path.replace(&format!("{{{index}}}"), arg);
        }
        Ok(path)
    }
}

fn is_valid_path_arg(arg: &str) -> bool {
    arg.split('/')
        .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.template())
    }
}

/// Actions accepted by [`Endpoint::ContainerOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
    Pause,
    Unpause,
    Rename,
}

impl ContainerAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            ContainerAction::Start => "start",
            ContainerAction::Stop => "stop",
            ContainerAction::Restart => "restart",
            ContainerAction::Pause => "pause",
            ContainerAction::Unpause => "unpause",
            ContainerAction::Rename => "rename",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_without_slots() {
        assert_eq!(Endpoint::Ping.render(&[]).unwrap(), "/_ping");
        assert_eq!(Endpoint::CommitContainer.render(&[]).unwrap(), "/commit");
    }

    #[test]
    fn test_render_positional_slots_in_order() {
        assert_eq!(
            Endpoint::ContainerOperation
                .render(&["0bd62601d47c", ContainerAction::Unpause.as_str()])
                .unwrap(),
            "/containers/0bd62601d47c/unpause"
        );
        assert_eq!(
            Endpoint::InspectImage.render(&["sha256:abc"]).unwrap(),
            "/images/sha256:abc/json"
        );
    }

    #[test]
    fn test_render_rejects_wrong_arity() {
        assert!(Endpoint::InspectContainer.render(&[]).is_err());
        assert!(Endpoint::Info.render(&["extra"]).is_err());
    }

    #[test]
    fn test_render_rejects_path_injection() {
        let err = Endpoint::RemoveContainer.render(&["../images/x"]).unwrap_err();
        assert!(err.to_string().contains("invalid path argument"));
        assert!(Endpoint::RemoveContainer.render(&[""]).is_err());
        assert!(Endpoint::InspectImage.render(&["library//ubuntu"]).is_err());
    }

    #[test]
    fn test_namespaced_image_names_allowed() {
        assert_eq!(
            Endpoint::ImageTags.render(&["library/ubuntu"]).unwrap(),
            "/library/ubuntu/tags"
        );
        assert_eq!(
            Endpoint::ImageHistory.render(&["myorg/app:1.2"]).unwrap(),
            "/images/myorg/app:1.2/history"
        );
    }

    #[test]
    fn test_arity() {
        assert_eq!(Endpoint::Version.arity(), 0);
        assert_eq!(Endpoint::ContainerLogs.arity(), 1);
        assert_eq!(Endpoint::ContainerOperation.arity(), 2);
    }
}
