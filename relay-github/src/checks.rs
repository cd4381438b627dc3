//! Check runs for the pull request head commit

use async_trait::async_trait;
use relay_core::{CheckRun, CheckRunSource, CheckStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, GitHubClient, Result};

#[derive(Debug, Serialize)]
struct ListParams {
    per_page: u8,
}

#[derive(Debug, Deserialize)]
struct CheckRunList {
    #[serde(default)]
    check_runs: Vec<RawCheckRun>,
}

#[derive(Debug, Deserialize)]
struct RawCheckRun {
    name: String,
    status: Option<String>,
    conclusion: Option<String>,
}

impl From<RawCheckRun> for CheckRun {
    fn from(run: RawCheckRun) -> Self {
        CheckRun {
            status: CheckStatus::from_github(run.status.as_deref(), run.conclusion.as_deref()),
            name: run.name,
        }
    }
}

/// Check runs reported for a pull request's head commit
#[derive(Debug, Clone)]
pub struct GitHubCheckRuns {
    client: GitHubClient,
    pr_number: u64,
}

impl GitHubCheckRuns {
    pub fn new(client: GitHubClient, pr_number: u64) -> Self {
        Self { client, pr_number }
    }

    /// Head commit SHA of the pull request
    pub async fn head_sha(&self) -> Result<String> {
        let pr = self
            .client
            .client()
            .pulls(self.client.owner(), self.client.repo())
            .get(self.pr_number)
            .await
            .map_err(|e| match &e {
                octocrab::Error::GitHub { source, .. } if source.message.contains("Not Found") => {
                    Error::PrNotFound(self.pr_number)
                }
                _ => Error::Api(e),
            })?;

        Ok(pr.head.sha)
    }

    /// List check runs for the head commit
    pub async fn list(&self) -> Result<Vec<CheckRun>> {
        let sha = self.head_sha().await?;
        debug!(sha = %sha, "Listing check runs");

        let route = format!(
            "/repos/{}/{}/commits/{}/check-runs",
            self.client.owner(),
            self.client.repo(),
            sha
        );
        let list: CheckRunList = self
            .client
            .client()
            .get(route, Some(&ListParams { per_page: 100 }))
            .await
            .map_err(Error::Api)?;

        let runs: Vec<CheckRun> = list.check_runs.into_iter().map(CheckRun::from).collect();
        info!(count = runs.len(), "Fetched check runs");

        Ok(runs)
    }
}

#[async_trait]
impl CheckRunSource for GitHubCheckRuns {
    async fn check_runs(&self) -> relay_core::Result<Vec<CheckRun>> {
        self.list()
            .await
            .map_err(|e| relay_core::Error::CheckRuns(e.to_string()))
    }
}
