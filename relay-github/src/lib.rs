//! Relay GitHub - GitHub integration for the review relay
//!
//! This crate posts and lists pull request comments and reads check runs,
//! implementing the comment and check-run traits from `relay-core`.

mod checks;
mod client;
mod comments;
mod error;

pub use checks::GitHubCheckRuns;
pub use client::{parse_github_url, GitHubClient};
pub use comments::{relay_target, summary_target, PullRequestCommenter};
pub use error::{Error, Result};
