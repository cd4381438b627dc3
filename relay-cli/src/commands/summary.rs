//! Summary command - post one aggregate comment after the relays

use clap::Args;
use relay_core::{post_summary, CheckRunSource, Config, NoCheckRuns, Secrets, SummaryOutcome};
use relay_github::{summary_target, GitHubCheckRuns};

/// Arguments for the summary command
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Pull request number to summarize
    #[arg(long, env = "PR_NUMBER")]
    pub pr_number: Option<String>,

    /// Repository owner
    #[arg(long, env = "REPO_OWNER")]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, env = "REPO_NAME")]
    pub repo: Option<String>,

    /// Look up real check runs for the PR head instead of reporting them as pending
    #[arg(long)]
    pub check_runs: bool,
}

impl SummaryArgs {
    /// Execute the summary command
    pub async fn execute(self, config: &Config, secrets: &Secrets) -> anyhow::Result<()> {
        let Some(commenter) = summary_target(
            self.pr_number.as_deref(),
            self.owner.as_deref(),
            self.repo.as_deref(),
            secrets.github_token(),
            config.github.api_url.as_deref(),
        ) else {
            return Ok(());
        };

        let checks: Box<dyn CheckRunSource> = if self.check_runs {
            Box::new(GitHubCheckRuns::new(
                commenter.client().clone(),
                commenter.pr_number(),
            ))
        } else {
            Box::new(NoCheckRuns)
        };

        if let SummaryOutcome::Posted {
            ai_reviews,
            comment_posted,
        } = post_summary(&commenter, checks.as_ref()).await
        {
            tracing::info!(
                pr = commenter.pr_number(),
                ai_reviews,
                comment_posted,
                "Summary finished"
            );
        }

        Ok(())
    }
}
