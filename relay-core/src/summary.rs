//! Summary poster: one aggregate comment after the relays ran
//!
//! Relay comments are recognized by their banner marker. This is a plain
//! substring match, so a human comment quoting a banner is counted too.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::comments::{PrComment, PullRequestComments};
use crate::review::Provider;
use crate::Result;

/// Check-run name fragments identifying the lint job
pub const LINT_CHECK_PATTERNS: &[&str] = &["golangci-lint", "Go Lint"];

/// Check-run name fragments identifying the test job
pub const TEST_CHECK_PATTERNS: &[&str] = &["test", "Test"];

/// Outcome of a CI check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Success,
    Failure,
    InProgress,
    Unknown,
}

impl CheckStatus {
    /// Map GitHub's `status` / `conclusion` pair onto a check status
    pub fn from_github(status: Option<&str>, conclusion: Option<&str>) -> Self {
        match (conclusion, status) {
            (Some("success"), _) => CheckStatus::Success,
            (Some("failure"), _) => CheckStatus::Failure,
            (None, Some("in_progress" | "queued")) => CheckStatus::InProgress,
            _ => CheckStatus::Unknown,
        }
    }

    /// Label used in the summary comment
    pub fn label(&self) -> &'static str {
        match self {
            CheckStatus::Success => "✅ Passed",
            CheckStatus::Failure => "❌ Failed",
            CheckStatus::InProgress => "⏳ Running",
            CheckStatus::Unknown => "⏳ Pending",
        }
    }
}

/// A CI check run on the pull request head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRun {
    pub name: String,
    pub status: CheckStatus,
}

/// Source of check runs for the summary
#[async_trait]
pub trait CheckRunSource: Send + Sync {
    async fn check_runs(&self) -> Result<Vec<CheckRun>>;
}

/// Check-run source that never finds any runs
///
/// This is the default: every derived status reads as pending.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCheckRuns;

#[async_trait]
impl CheckRunSource for NoCheckRuns {
    async fn check_runs(&self) -> Result<Vec<CheckRun>> {
        Ok(Vec::new())
    }
}

/// Whether a comment body carries any relay banner
pub fn is_ai_review(body: &str) -> bool {
    Provider::ALL.iter().any(|p| body.contains(p.banner()))
}

/// Number of relay-authored comments
pub fn count_ai_reviews(comments: &[PrComment]) -> usize {
    comments.iter().filter(|c| is_ai_review(&c.body)).count()
}

/// Status of the first run whose name contains any of `patterns`
pub fn check_status(runs: &[CheckRun], patterns: &[&str]) -> CheckStatus {
    runs.iter()
        .find(|run| patterns.iter().any(|p| run.name.contains(p)))
        .map(|run| run.status)
        .unwrap_or(CheckStatus::Unknown)
}

/// Body of the summary comment
pub fn compose_summary(ai_reviews: usize, lint: CheckStatus, test: CheckStatus) -> String {
    format!(
        "## ✅ Go AI Code Review Complete

This Go pull request has been automatically reviewed by AI assistants.

📊 **Review Summary:**
- {ai_reviews} AI review(s) completed
- Linting status: {lint}
- Test status: {test}

🐹 **Go-Specific Checks:**
- Idiomatic Go patterns reviewed
- Concurrency and error handling analyzed
- Performance and security considerations evaluated
- Testing patterns and coverage assessed

*AI reviews are complementary to human code review and should not replace thorough manual review.*",
        lint = lint.label(),
        test = test.label(),
    )
}

/// Result of a summary run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// A summary comment was posted (or its post failed and was logged)
    Posted {
        ai_reviews: usize,
        comment_posted: bool,
    },
    /// No relay comment was found, nothing was posted
    NoAiReviews,
    /// Comments could not be fetched
    Failed(String),
}

/// Count relay comments and post one summary when there is at least one
pub async fn post_summary(
    comments: &dyn PullRequestComments,
    checks: &dyn CheckRunSource,
) -> SummaryOutcome {
    match summarize(comments, checks).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "Error posting summary");
            SummaryOutcome::Failed(e.to_string())
        }
    }
}

async fn summarize(
    comments: &dyn PullRequestComments,
    checks: &dyn CheckRunSource,
) -> Result<SummaryOutcome> {
    let target = comments.target();
    let existing = comments.list_comments().await?;
    let ai_reviews = count_ai_reviews(&existing);

    let runs = match checks.check_runs().await {
        Ok(runs) => runs,
        Err(e) => {
            warn!(error = %e, "Check run lookup failed, reporting statuses as pending");
            Vec::new()
        }
    };
    let lint = check_status(&runs, LINT_CHECK_PATTERNS);
    let test = check_status(&runs, TEST_CHECK_PATTERNS);

    info!(
        target = %target,
        comments = existing.len(),
        ai_reviews,
        check_runs = runs.len(),
        ?lint,
        ?test,
        "Collected review state"
    );

    if ai_reviews == 0 {
        info!("No AI comments found to summarize");
        return Ok(SummaryOutcome::NoAiReviews);
    }

    info!(target = %target, "Posting summary");
    let comment_posted = match comments
        .post_comment(&compose_summary(ai_reviews, lint, test))
        .await
    {
        Ok(()) => {
            info!(target = %target, "Go summary posted successfully");
            true
        }
        Err(e) => {
            error!(target = %target, error = %e, "Failed to post summary comment");
            false
        }
    };

    Ok(SummaryOutcome::Posted {
        ai_reviews,
        comment_posted,
    })
}
