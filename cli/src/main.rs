//! # Dockhand Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Entry point of the `dockhand` binary. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Building a [`DockerManager`] from configuration files and flags
//! - Routing execution to the matching operation and printing the envelope
//!
//! ## Exit status
//!
//! - `0`: the daemon answered 200, 201 or 204.
//! - `1`: the daemon answered with any other status (the envelope is still
//!   printed), or the request could not be made at all (error on stderr).
//!
//! ## Examples
//!
//! ```bash
//! dockhand --host docker.internal:2375 ping
//! dockhand -vv --tls-verify --ca ~/.docker/ca.pem --host docker:2376 info
//! dockhand container ls -a
//! ```
//!
use clap::Parser;
use dockhand::{core::error::Result, DockerManager};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "dockhand",
    about = "Thin client for the Docker Engine HTTP API",
    long_about = "Talks to a Docker daemon over TCP (optionally TLS) and prints every\n\
                  response as {\"status\": bool, \"content\": ...}.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(flatten)]
    connection: commands::ConnectionArgs,

    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Check that the daemon is reachable.
    Ping,
    /// Show system-wide information.
    Info,
    /// Show daemon and API versions.
    Version,
    #[command(alias = "c")]
    Container(commands::container::ContainerArgs),
    #[command(alias = "i")]
    Image(commands::image::ImageArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    match run(cli).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("Command execution failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Executes the command and prints its envelope. `Ok(false)` when the daemon
/// rejected the request.
async fn run(cli: Cli) -> Result<bool> {
    let docker: DockerManager = commands::connect(&cli.connection)?;
    let envelope = match cli.command {
        Commands::Ping => docker.ping().await?,
        Commands::Info => docker.get_info().await?,
        Commands::Version => docker.get_version().await?,
        Commands::Container(args) => {
            commands::container::handle_container(&docker, args).await?
        }
        Commands::Image(args) => commands::image::handle_image(&docker, args).await?,
    };
    commands::output::print_envelope(envelope).await
}
