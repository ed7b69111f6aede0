//! # Dockhand Container Command Group
//!
//! File: cli/src/commands/container/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Router for `dockhand container <subcommand>`. Each subcommand calls one
//! container operation on [`DockerManager`] and returns its envelope to
//! `main.rs` for printing.
//!
//! Subcommands with more than an id live in their own files (`ls`, `create`,
//! `commit`, `logs`); the rest are declared inline below.
//!
//! ## Examples
//!
//! ```bash
//! dockhand container ls -a --filter status=exited
//! dockhand container create --image alpine --name clock -- date
//! dockhand container start clock
//! dockhand container logs clock --tail 20
//! dockhand container stats clock
//! dockhand container inspect clock --flatten
//! ```
//!
use clap::{Parser, Subcommand};
use dockhand::{api::Envelope, core::error::Result, DockerManager};

/// Implements `dockhand container commit`.
mod commit;
/// Implements `dockhand container create`.
mod create;
/// Implements `dockhand container logs`.
mod logs;
/// Implements `dockhand container ls`.
mod ls;

#[derive(Parser, Debug)]
pub struct ContainerArgs {
    #[command(subcommand)]
    command: ContainerCommand,
}

#[derive(Subcommand, Debug)]
enum ContainerCommand {
    /// List containers.
    #[command(alias = "ps")]
    Ls(ls::LsArgs),

    /// Show low-level information on a container.
    Inspect {
        container: String,
        /// Reduce the document to a flat record of common fields.
        #[arg(long)]
        flatten: bool,
    },

    /// Create a container from an image or a JSON configuration file.
    Create(create::CreateArgs),

    /// Start a container.
    Start { container: String },

    /// Stop a running container.
    Stop { container: String },

    /// Restart a container.
    Restart { container: String },

    /// Pause all processes in a container.
    Pause { container: String },

    /// Resume a paused container.
    Unpause { container: String },

    /// Rename a container.
    Rename { container: String, new_name: String },

    /// Remove a container.
    Rm {
        container: String,
        /// Kill the container first if it is running.
        #[arg(short, long)]
        force: bool,
        /// Also remove anonymous volumes.
        #[arg(long)]
        volumes: bool,
    },

    /// Create an image from a container's filesystem.
    Commit(commit::CommitArgs),

    /// Show resource usage statistics, streaming by default.
    Stats {
        container: String,
        /// Print a single sample and exit.
        #[arg(long)]
        no_stream: bool,
    },

    /// Fetch a container's logs.
    Logs(logs::LogsArgs),

    /// List the processes running inside a container.
    Top {
        container: String,
        /// Arguments passed to `ps` inside the container (default `-ef`).
        ps_args: Option<String>,
    },
}

/// Runs the selected container subcommand.
pub async fn handle_container(docker: &DockerManager, args: ContainerArgs) -> Result<Envelope> {
    match args.command {
        ContainerCommand::Ls(args) => docker.list_containers(&args.options()?).await,
        ContainerCommand::Inspect { container, flatten } => {
            docker.inspect_container(&container, flatten).await
        }
        ContainerCommand::Create(args) => create::handle_create(docker, args).await,
        ContainerCommand::Start { container } => docker.start_container(&container).await,
        ContainerCommand::Stop { container } => docker.stop_container(&container).await,
        ContainerCommand::Restart { container } => docker.restart_container(&container).await,
        ContainerCommand::Pause { container } => docker.pause_container(&container).await,
        ContainerCommand::Unpause { container } => docker.unpause_container(&container).await,
        ContainerCommand::Rename {
            container,
            new_name,
        } => docker.rename_container(&container, &new_name).await,
        ContainerCommand::Rm {
            container,
            force,
            volumes,
        } => docker.remove_container(&container, force, volumes).await,
        ContainerCommand::Commit(args) => docker.commit_container(&args.options()).await,
        ContainerCommand::Stats {
            container,
            no_stream,
        } => docker.get_container_stats(&container, !no_stream).await,
        ContainerCommand::Logs(args) => {
            docker
                .get_container_logs(&args.container, &args.options())
                .await
        }
        ContainerCommand::Top { container, ps_args } => {
            docker
                .list_container_processes(&container, ps_args.as_deref())
                .await
        }
    }
}
