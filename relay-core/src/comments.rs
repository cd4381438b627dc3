//! Pull request comment abstraction
//!
//! Relays and the summary poster talk to the comment API only through
//! [`PullRequestComments`], bound to a single pull request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Error, Result};

/// A comment on a pull request conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrComment {
    /// Comment ID
    pub id: u64,
    /// Author login
    pub author: String,
    /// Comment body, empty when the API omitted it
    pub body: String,
    /// When the comment was created
    pub created_at: Option<DateTime<Utc>>,
}

/// Append-only comment access for one pull request
#[async_trait]
pub trait PullRequestComments: Send + Sync {
    /// Human-readable target, e.g. `owner/repo#12`
    fn target(&self) -> String;

    /// Post a new comment
    async fn post_comment(&self, body: &str) -> Result<()>;

    /// List every comment on the pull request
    async fn list_comments(&self) -> Result<Vec<PrComment>>;
}

/// Stand-in used when the pull request, repository or token is unknown
///
/// Posting logs what was missing and fails with [`Error::NoTarget`], which
/// relays report as "not posted" rather than as an API failure.
#[derive(Debug, Clone, Default)]
pub struct UnpostedComments {
    pub pr_number: Option<String>,
    pub repo: Option<String>,
    pub token_present: bool,
}

#[async_trait]
impl PullRequestComments for UnpostedComments {
    fn target(&self) -> String {
        format!(
            "{}#{}",
            self.repo.as_deref().unwrap_or("<unknown repo>"),
            self.pr_number.as_deref().unwrap_or("?")
        )
    }

    async fn post_comment(&self, body: &str) -> Result<()> {
        info!(
            pr = self.pr_number.as_deref().unwrap_or("missing"),
            repo = self.repo.as_deref().unwrap_or("missing"),
            token = if self.token_present { "present" } else { "missing" },
            body_chars = body.chars().count(),
            "Missing required parameters for posting comment"
        );
        Err(Error::NoTarget(self.target()))
    }

    async fn list_comments(&self) -> Result<Vec<PrComment>> {
        Err(Error::Comments(format!(
            "cannot list comments without a pull request target ({})",
            self.target()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unposted_comments_post_reports_no_target() {
        let sink = UnpostedComments {
            pr_number: Some("7".to_string()),
            repo: None,
            token_present: true,
        };
        let err = sink.post_comment("hello").await.unwrap_err();
        assert!(matches!(err, Error::NoTarget(ref target) if target == "<unknown repo>#7"));
        assert_eq!(sink.target(), "<unknown repo>#7");
    }

    #[tokio::test]
    async fn test_unposted_comments_list_fails() {
        let sink = UnpostedComments::default();
        assert!(sink.list_comments().await.is_err());
    }
}
