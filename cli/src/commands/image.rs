//! # Dockhand Image Command Group
//!
//! File: cli/src/commands/image.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Router for `dockhand image <subcommand>`, one image operation per
//! subcommand.
//!
//! ## Examples
//!
//! ```bash
//! dockhand image ls --filter dangling=true
//! dockhand image pull alpine --tag 3.20
//! dockhand image tags library/ubuntu
//! dockhand image push myorg/app --tag 1.0 --auth "$(base64 -w0 auth.json)"
//! dockhand image rm -f alpine:3.20
//! ```
//!
use crate::commands::parse_filters;
use clap::{Parser, Subcommand};
use dockhand::{
    api::Envelope,
    core::error::Result,
    ops::{ListImagesOptions, PullImageOptions},
    DockerManager,
};

#[derive(Parser, Debug)]
pub struct ImageArgs {
    #[command(subcommand)]
    command: ImageCommand,
}

#[derive(Subcommand, Debug)]
enum ImageCommand {
    /// List images.
    Ls {
        /// Include intermediate layers.
        #[arg(short, long)]
        all: bool,
        /// Include digest information.
        #[arg(long)]
        digests: bool,
        /// Filter as key=value (repeatable), e.g. dangling=true.
        #[arg(long = "filter")]
        filters: Vec<String>,
    },

    /// Remove an image.
    Rm {
        image: String,
        /// Remove even if containers use the image.
        #[arg(short, long)]
        force: bool,
    },

    /// Show low-level information on an image.
    Inspect { image: String },

    /// Show the layer history of an image.
    History { image: String },

    /// Search Docker Hub for images.
    Search { term: String },

    /// List the tags of a repository on the registry.
    Tags { repository: String },

    /// Pull an image from a registry.
    Pull {
        image: String,
        /// Tag to pull; the daemon pulls every tag when omitted.
        #[arg(short, long)]
        tag: Option<String>,
        /// Registry to pull from.
        #[arg(long)]
        registry: Option<String>,
    },

    /// Push an image to its registry.
    Push {
        repository: String,
        /// Push only this tag.
        #[arg(short, long)]
        tag: Option<String>,
        /// Base64-encoded registry credentials (X-Registry-Auth).
        #[arg(long, env = "DOCKHAND_REGISTRY_AUTH", hide_env_values = true)]
        auth: Option<String>,
    },
}

/// Runs the selected image subcommand.
pub async fn handle_image(docker: &DockerManager, args: ImageArgs) -> Result<Envelope> {
    match args.command {
        ImageCommand::Ls {
            all,
            digests,
            filters,
        } => {
            let options = ListImagesOptions {
                all,
                digests,
                filters: parse_filters(&filters)?,
            };
            docker.list_images(&options).await
        }
        ImageCommand::Rm { image, force } => docker.delete_image(&image, force).await,
        ImageCommand::Inspect { image } => docker.get_image_detail(&image).await,
        ImageCommand::History { image } => docker.get_image_history(&image).await,
        ImageCommand::Search { term } => docker.search_image(&term).await,
        ImageCommand::Tags { repository } => docker.get_image_tags(&repository).await,
        ImageCommand::Pull {
            image,
            tag,
            registry,
        } => {
            let options = PullImageOptions {
                tag,
                registry,
                ..PullImageOptions::new(image)
            };
            docker.download_image(&options).await
        }
        ImageCommand::Push {
            repository,
            tag,
            auth,
        } => {
            docker
                .push_image(&repository, tag.as_deref(), auth.as_deref())
                .await
        }
    }
}
