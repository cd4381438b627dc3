//! Pull request conversation comments

use async_trait::async_trait;
use relay_core::{PrComment, PullRequestComments, UnpostedComments};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::{Error, GitHubClient, Result};

/// Comments are listed this many per page
const PER_PAGE: u8 = 100;

/// Comment access for one pull request through the issues API
#[derive(Debug, Clone)]
pub struct PullRequestCommenter {
    client: GitHubClient,
    pr_number: u64,
}

impl PullRequestCommenter {
    pub fn new(client: GitHubClient, pr_number: u64) -> Self {
        Self { client, pr_number }
    }

    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    pub fn pr_number(&self) -> u64 {
        self.pr_number
    }

    /// Post a comment on the pull request conversation
    pub async fn create_comment(&self, body: &str) -> Result<()> {
        let comment = self
            .client
            .client()
            .issues(self.client.owner(), self.client.repo())
            .create_comment(self.pr_number, body)
            .await
            .map_err(|e| match &e {
                octocrab::Error::GitHub { source, .. } if source.message.contains("Not Found") => {
                    Error::PrNotFound(self.pr_number)
                }
                _ => Error::Api(e),
            })?;

        debug!(comment_id = comment.id.0, "Created comment");
        Ok(())
    }

    /// Fetch every comment on the pull request conversation
    pub async fn fetch_comments(&self) -> Result<Vec<PrComment>> {
        let octocrab = self.client.client();
        let first = octocrab
            .issues(self.client.owner(), self.client.repo())
            .list_comments(self.pr_number)
            .per_page(PER_PAGE)
            .send()
            .await
            .map_err(Error::Api)?;

        let all = octocrab.all_pages(first).await.map_err(Error::Api)?;

        let comments: Vec<PrComment> = all
            .into_iter()
            .map(|c| PrComment {
                id: c.id.0,
                author: c.user.login,
                body: c.body.unwrap_or_default(),
                created_at: Some(c.created_at),
            })
            .collect();

        info!(count = comments.len(), pr = self.pr_number, "Fetched PR comments");

        Ok(comments)
    }
}

#[async_trait]
impl PullRequestComments for PullRequestCommenter {
    fn target(&self) -> String {
        format!(
            "{}/{}#{}",
            self.client.owner(),
            self.client.repo(),
            self.pr_number
        )
    }

    async fn post_comment(&self, body: &str) -> relay_core::Result<()> {
        Ok(self.create_comment(body).await?)
    }

    async fn list_comments(&self) -> relay_core::Result<Vec<PrComment>> {
        Ok(self.fetch_comments().await?)
    }
}

/// Parse a PR number from the environment, treating junk as absent
fn parse_pr_number(raw: Option<&str>) -> Option<u64> {
    let raw = raw?.trim();
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(value = raw, "PR number is not a positive integer");
            None
        }
    }
}

/// Resolve where a relay posts its comment
///
/// Returns the logged no-op sink when the PR number, repository or token is
/// missing or unusable.
pub fn relay_target(
    pr_number: Option<&str>,
    repo_full_name: Option<&str>,
    token: Option<SecretString>,
    api_url: Option<&str>,
) -> std::result::Result<PullRequestCommenter, UnpostedComments> {
    let unposted = || UnpostedComments {
        pr_number: pr_number.map(String::from),
        repo: repo_full_name.map(String::from),
        token_present: token.is_some(),
    };

    let (Some(number), Some(full_name), Some(token)) =
        (parse_pr_number(pr_number), repo_full_name, token.as_ref())
    else {
        return Err(unposted());
    };

    match GitHubClient::from_url(full_name, token, api_url) {
        Ok(client) => Ok(PullRequestCommenter::new(client, number)),
        Err(e) => {
            warn!(repo = full_name, error = %e, "Cannot create GitHub client");
            Err(unposted())
        }
    }
}

/// Resolve the summary poster's pull request
///
/// Returns `None`, after logging which values are present, when any of the
/// PR number, owner, repository name or token is missing.
pub fn summary_target(
    pr_number: Option<&str>,
    owner: Option<&str>,
    repo: Option<&str>,
    token: Option<SecretString>,
    api_url: Option<&str>,
) -> Option<PullRequestCommenter> {
    let (Some(number), Some(owner), Some(repo), Some(token)) =
        (parse_pr_number(pr_number), owner, repo, token.as_ref())
    else {
        info!(
            pr = pr_number.unwrap_or("missing"),
            owner = owner.unwrap_or("missing"),
            repo = repo.unwrap_or("missing"),
            token = if token.is_some() { "present" } else { "missing" },
            "Missing required environment variables for summary"
        );
        return None;
    };

    match GitHubClient::new(owner, repo, token, api_url) {
        Ok(client) => Some(PullRequestCommenter::new(client, number)),
        Err(e) => {
            warn!(owner, repo, error = %e, "Cannot create GitHub client");
            None
        }
    }
}
