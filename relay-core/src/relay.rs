//! Review relay: changed files in, one pull request comment out
//!
//! A relay reads up to [`MAX_FILES`] changed files, builds a prompt, asks one
//! review service for a review and posts exactly one comment with the result
//! or a failure notice. Comment posting is fire-and-forget: failures are
//! logged and never surface to the caller.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::{error, info, warn};

use crate::comments::PullRequestComments;
use crate::files::{read_sources, ChangedFiles, MAX_FILES};
use crate::review::{build_service, PromptBuilder, Provider, ReviewService, ServiceSettings};
use crate::{Error, Result};

/// Number of characters of a successful review echoed to the log
const PREVIEW_CHARS: usize = 200;

/// Why a relay finished without posting anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The review service API key is not configured
    MissingApiKey,
    /// None of the listed files could be read
    NoReadableFiles,
}

/// Result of one relay invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Nothing was sent and nothing was posted
    Skipped(SkipReason),
    /// The review finished; `comment_posted` is false when there was no
    /// target or the post failed
    Reviewed {
        file_count: usize,
        comment_posted: bool,
    },
    /// The review failed; a failure notice was posted
    Failed {
        file_count: usize,
        error: String,
        comment_posted: bool,
    },
}

impl RelayOutcome {
    /// Whether a comment post was attempted
    pub fn attempted_comment(&self) -> bool {
        !matches!(self, RelayOutcome::Skipped(_))
    }
}

/// Comment body for a successful review
pub fn success_comment(provider: Provider, review: &str, file_count: usize) -> String {
    format!(
        "## {}\n\n{}\n\n---\n*Analyzed {} Go file(s) automatically*",
        provider.banner(),
        review,
        file_count
    )
}

/// Comment body for a failed review
pub fn failure_comment(provider: Provider, file_count: usize) -> String {
    format!(
        "## {banner}\n\n\
         ⚠️ **Analysis Failed**: Unable to complete {name} Go code review due to an API error.\n\n\
         Please check the workflow logs for more details.\n\n\
         ---\n*Attempted to analyze {count} Go file(s)*",
        banner = provider.banner(),
        name = provider.name(),
        count = file_count
    )
}

/// A relay bound to one review service and one pull request
pub struct Relay<'a> {
    provider: Provider,
    service: &'a dyn ReviewService,
    comments: &'a dyn PullRequestComments,
    prompt: PromptBuilder,
    root: PathBuf,
}

impl<'a> Relay<'a> {
    /// Create a relay reading files relative to the current directory
    pub fn new(
        provider: Provider,
        service: &'a dyn ReviewService,
        comments: &'a dyn PullRequestComments,
    ) -> Self {
        Self {
            provider,
            service,
            comments,
            prompt: PromptBuilder::new(provider),
            root: PathBuf::from("."),
        }
    }

    /// Use a custom prompt builder
    pub fn with_prompt(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = prompt;
        self
    }

    /// Resolve changed-file paths against `root`
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Run the relay for a changed-file list
    pub async fn run(&self, files: &ChangedFiles) -> RelayOutcome {
        let provider = self.provider;

        info!(
            service = %provider,
            listed = files.len(),
            limit = MAX_FILES,
            "Analyzing changed Go files"
        );

        let sources = read_sources(files, &self.root).await;
        if sources.is_empty() {
            info!(service = %provider, "No readable files found for analysis");
            return RelayOutcome::Skipped(SkipReason::NoReadableFiles);
        }

        let file_count = sources.len();
        let prompt = self.prompt.build(&sources);
        if prompt.is_truncated() {
            warn!(
                service = %provider,
                chars = prompt.char_len(),
                "Prompt truncated to character budget"
            );
        }

        let review = match self.service.review(prompt.as_str()).await {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) => Err(Error::EmptyResponse(self.service.name())),
            Err(e) => Err(e),
        };

        match review {
            Ok(text) => {
                info!(service = %provider, file_count, "Analysis completed successfully");
                info!(preview = %preview(&text), "Response preview");

                let body = success_comment(provider, &text, file_count);
                let comment_posted = self.post(&body).await;
                RelayOutcome::Reviewed {
                    file_count,
                    comment_posted,
                }
            }
            Err(e) => {
                error!(service = %provider, error = %e, "Analysis failed");
                error!(service = %provider, details = ?e, "Error details");

                let body = failure_comment(provider, file_count);
                let comment_posted = self.post(&body).await;
                RelayOutcome::Failed {
                    file_count,
                    error: e.to_string(),
                    comment_posted,
                }
            }
        }
    }

    async fn post(&self, body: &str) -> bool {
        let target = self.comments.target();
        info!(target = %target, "Posting comment");

        match self.comments.post_comment(body).await {
            Ok(()) => {
                info!(target = %target, "Comment posted successfully");
                true
            }
            Err(Error::NoTarget(_)) => {
                info!(target = %target, "Comment not posted");
                false
            }
            Err(e) => {
                error!(target = %target, error = %e, "Failed to post comment");
                false
            }
        }
    }
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}

/// Run a relay from raw inputs
///
/// A missing API key short-circuits before any file is read or any request
/// is made.
pub async fn run_relay(
    provider: Provider,
    api_key: Option<SecretString>,
    settings: &ServiceSettings,
    files: &ChangedFiles,
    root: &Path,
    comments: &dyn PullRequestComments,
) -> Result<RelayOutcome> {
    let Some(api_key) = api_key else {
        info!(
            var = provider.api_key_var(),
            "{} not found, skipping {} review",
            provider.api_key_var(),
            provider.name()
        );
        return Ok(RelayOutcome::Skipped(SkipReason::MissingApiKey));
    };

    let service = build_service(provider, api_key, settings)?;

    let mut prompt = PromptBuilder::new(provider).with_char_budget(settings.char_budget);
    if let Some(preamble) = &settings.preamble {
        prompt = prompt.with_preamble(preamble.clone());
    }

    Ok(Relay::new(provider, service.as_ref(), comments)
        .with_prompt(prompt)
        .with_root(root)
        .run(files)
        .await)
}
