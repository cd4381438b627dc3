//! Relay commands - review changed files with Claude or Gemini

use std::path::PathBuf;

use clap::Args;
use relay_core::{run_relay, ChangedFiles, Config, Provider, RelayOutcome, Secrets, ServiceSettings};
use relay_github::relay_target;

/// Arguments shared by the `claude` and `gemini` commands
#[derive(Args, Debug)]
pub struct RelayArgs {
    /// Comma-separated list of changed file paths
    #[arg(default_value = "")]
    pub files: String,

    /// Directory the file paths are relative to
    #[arg(short = 'd', long, default_value = ".")]
    pub workdir: PathBuf,

    /// Model to use (overrides config and env)
    #[arg(long)]
    pub model: Option<String>,

    /// Pull request number to comment on
    #[arg(long, env = "PR_NUMBER")]
    pub pr_number: Option<String>,

    /// Repository as owner/name
    #[arg(long, env = "REPO_FULL_NAME")]
    pub repo: Option<String>,
}

impl RelayArgs {
    /// Execute the relay for `provider`
    pub async fn execute(self, provider: Provider, config: Config, secrets: &Secrets) -> anyhow::Result<()> {
        let config = config.with_cli_overrides(provider, self.model.clone());
        let settings = ServiceSettings::resolve(provider, config.service(provider));
        let files = ChangedFiles::parse(&self.files);

        let target = relay_target(
            self.pr_number.as_deref(),
            self.repo.as_deref(),
            secrets.github_token(),
            config.github.api_url.as_deref(),
        );
        let comments: Box<dyn relay_core::PullRequestComments> = match target {
            Ok(commenter) => Box::new(commenter),
            Err(unposted) => Box::new(unposted),
        };

        let outcome = run_relay(
            provider,
            secrets.api_key(provider),
            &settings,
            &files,
            &self.workdir,
            comments.as_ref(),
        )
        .await?;

        match outcome {
            RelayOutcome::Skipped(reason) => {
                tracing::info!(service = %provider, ?reason, "Review skipped");
            }
            RelayOutcome::Reviewed { file_count, comment_posted } => {
                tracing::info!(service = %provider, file_count, comment_posted, "Review finished");
            }
            RelayOutcome::Failed { file_count, comment_posted, .. } => {
                tracing::warn!(service = %provider, file_count, comment_posted, "Review failed");
            }
        }

        Ok(())
    }
}
