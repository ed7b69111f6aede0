//! # Dockhand Container List Handler
//!
//! File: cli/src/commands/container/ls.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ```bash
//! dockhand container ls                      # running containers
//! dockhand container ls -a -n 5              # five most recent, any state
//! dockhand container ls --filter status=exited --filter label=env=prod
//! ```
//!
use crate::commands::parse_filters;
use clap::Parser;
use dockhand::{core::error::Result, ops::ListContainersOptions};

#[derive(Parser, Debug)]
pub struct LsArgs {
    /// Show all containers, not only running ones.
    #[arg(short, long)]
    all: bool,

    /// Show only the N most recently created containers.
    #[arg(short = 'n', long)]
    limit: Option<u32>,

    /// Only containers created after this id or name.
    #[arg(long)]
    since: Option<String>,

    /// Only containers created before this id or name.
    #[arg(long)]
    before: Option<String>,

    /// Include container sizes.
    #[arg(short, long)]
    size: bool,

    /// Filter as key=value (repeatable), e.g. status=exited.
    #[arg(long = "filter")]
    filters: Vec<String>,
}

impl LsArgs {
    pub fn options(&self) -> Result<ListContainersOptions> {
        Ok(ListContainersOptions {
            all: self.all,
            limit: self.limit,
            since: self.since.clone(),
            before: self.before.clone(),
            size: self.size,
            filters: parse_filters(&self.filters)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ls_args_to_options() {
        let args = LsArgs::try_parse_from([
            "ls", "-a", "-n", "3", "--filter", "status=exited", "--filter", "status=dead",
        ])
        .unwrap();
        let options = args.options().unwrap();
        assert!(options.all);
        assert_eq!(options.limit, Some(3));
        assert!(!options.size);
        assert_eq!(options.filters["status"], vec!["exited", "dead"]);
    }

    #[test]
    fn test_ls_rejects_malformed_filter() {
        let args = LsArgs::try_parse_from(["ls", "--filter", "exited"]).unwrap();
        assert!(args.options().is_err());
    }
}
