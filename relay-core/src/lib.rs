//! Review Relay Core - forward changed files to AI reviewers
//!
//! This crate provides the relay that sends changed source files to an
//! external code review service and posts the answer as a pull request
//! comment, plus the summary poster that aggregates those comments.

pub mod comments;
pub mod config;
pub mod error;
pub mod files;
pub mod relay;
pub mod review;
pub mod secrets;
pub mod summary;

#[cfg(test)]
mod testing;

pub use comments::{PrComment, PullRequestComments, UnpostedComments};
pub use config::{Config, GitHubConfig, ServiceConfig};
pub use error::{Error, Result};
pub use files::{ChangedFiles, SourceFile, MAX_FILES};
pub use relay::{run_relay, Relay, RelayOutcome, SkipReason};
pub use review::{Provider, ReviewService, ServiceSettings};
pub use secrets::Secrets;
pub use summary::{post_summary, CheckRun, CheckRunSource, CheckStatus, NoCheckRuns, SummaryOutcome};
