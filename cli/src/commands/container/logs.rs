//! # Dockhand Container Logs Handler
//!
//! File: cli/src/commands/container/logs.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! Implements `dockhand container logs`. Logs of non-TTY containers arrive
//! framed per stream; the library strips the frame headers, so the printed
//! content is the plain interleaved stdout/stderr text.
//!
//! ## Usage
//!
//! ```bash
//! # Everything the container has written
//! dockhand container logs my-container
//!
//! # Last 50 lines of stderr only, with timestamps
//! dockhand container logs my-container --tail 50 --no-stdout -t
//! ```
//!
use clap::Parser;
use dockhand::ops::LogsOptions;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(about = "Fetch logs from a container")]
pub struct LogsArgs {
    /// Name or id of the container.
    pub container: String,

    /// Number of lines to show from the end of the logs, or "all".
    #[arg(short = 'n', long, default_value = "all")]
    tail: String,

    /// Only entries after this UNIX timestamp.
    #[arg(long, default_value_t = 0)]
    since: i64,

    /// Prefix each line with its timestamp.
    #[arg(short, long)]
    timestamps: bool,

    /// Leave out stdout.
    #[arg(long)]
    no_stdout: bool,

    /// Leave out stderr.
    #[arg(long)]
    no_stderr: bool,
}

impl LogsArgs {
    pub fn options(&self) -> LogsOptions {
        let tail = self.tail.trim();
        let tail = if tail.eq_ignore_ascii_case("all") || tail.parse::<u32>().is_ok() {
            tail.to_ascii_lowercase()
        } else {
            warn!("Invalid value for --tail: '{}'. Showing all lines.", self.tail);
            "all".to_string()
        };
        LogsOptions {
            stdout: !self.no_stdout,
            stderr: !self.no_stderr,
            since: self.since,
            timestamps: self.timestamps,
            tail,
        }
    }
}
