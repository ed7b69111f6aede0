//! # Dockhand Container Commit Handler
//!
//! File: cli/src/commands/container/commit.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ```bash
//! dockhand container commit web --repo myorg/web --tag snapshot -m "before upgrade"
//! ```
//!
use clap::Parser;
use dockhand::ops::CommitOptions;

#[derive(Parser, Debug)]
pub struct CommitArgs {
    /// Container to commit.
    container: String,

    /// Repository name for the new image.
    #[arg(long)]
    repo: Option<String>,

    /// Tag for the new image.
    #[arg(long)]
    tag: Option<String>,

    /// Commit message.
    #[arg(short = 'm', long = "message")]
    comment: Option<String>,

    /// Author of the image, e.g. "Jane Doe <jane@example.com>".
    #[arg(short, long)]
    author: Option<String>,
}

impl CommitArgs {
    pub fn options(&self) -> CommitOptions {
        CommitOptions {
            container: self.container.clone(),
            repo: self.repo.clone(),
            tag: self.tag.clone(),
            comment: self.comment.clone(),
            author: self.author.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_args_to_options() {
        let args = CommitArgs::try_parse_from([
            "commit", "web", "--repo", "myorg/web", "-m", "snapshot",
        ])
        .unwrap();
        let options = args.options();
        assert_eq!(options.container, "web");
        assert_eq!(options.repo.as_deref(), Some("myorg/web"));
        assert_eq!(options.comment.as_deref(), Some("snapshot"));
        assert_eq!(options.tag, None);
    }
}
