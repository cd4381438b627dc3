//! In-memory fakes shared by unit tests

use std::sync::Mutex;

use async_trait::async_trait;

use crate::comments::{PrComment, PullRequestComments};
use crate::review::ReviewService;
use crate::summary::{CheckRun, CheckRunSource};
use crate::{Error, Result};

/// Review service returning a canned reply and recording prompts
pub struct StubService {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl StubService {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewService for StubService {
    fn name(&self) -> &'static str {
        "Stub"
    }

    async fn review(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(|message| Error::Api {
            service: "Stub",
            message,
        })
    }
}

/// Comment store that records posts and serves a fixed listing
pub struct RecordingComments {
    existing: Vec<PrComment>,
    posted: Mutex<Vec<String>>,
    reject_posts: bool,
    fail_listing: bool,
}

impl RecordingComments {
    pub fn new() -> Self {
        Self::with_existing(Vec::new())
    }

    pub fn with_existing(existing: Vec<PrComment>) -> Self {
        Self {
            existing,
            posted: Mutex::new(Vec::new()),
            reject_posts: false,
            fail_listing: false,
        }
    }

    pub fn with_bodies(bodies: &[&str]) -> Self {
        Self::with_existing(
            bodies
                .iter()
                .enumerate()
                .map(|(i, body)| PrComment {
                    id: i as u64 + 1,
                    author: "someone".to_string(),
                    body: body.to_string(),
                    created_at: None,
                })
                .collect(),
        )
    }

    pub fn rejecting() -> Self {
        Self {
            reject_posts: true,
            ..Self::new()
        }
    }

    pub fn unlistable() -> Self {
        Self {
            fail_listing: true,
            ..Self::new()
        }
    }

    pub fn posted(&self) -> Vec<String> {
        self.posted.lock().unwrap().clone()
    }
}

#[async_trait]
impl PullRequestComments for RecordingComments {
    fn target(&self) -> String {
        "octo/repo#1".to_string()
    }

    async fn post_comment(&self, body: &str) -> Result<()> {
        if self.reject_posts {
            return Err(Error::Comments("403 Forbidden".to_string()));
        }
        self.posted.lock().unwrap().push(body.to_string());
        Ok(())
    }

    async fn list_comments(&self) -> Result<Vec<PrComment>> {
        if self.fail_listing {
            return Err(Error::Comments("500 Internal Server Error".to_string()));
        }
        Ok(self.existing.clone())
    }
}

/// Check-run source serving a fixed list
pub struct FixedCheckRuns(pub Vec<CheckRun>);

#[async_trait]
impl CheckRunSource for FixedCheckRuns {
    async fn check_runs(&self) -> Result<Vec<CheckRun>> {
        Ok(self.0.clone())
    }
}

/// Check-run source whose lookup is always refused
pub struct FailingCheckRuns;

#[async_trait]
impl CheckRunSource for FailingCheckRuns {
    async fn check_runs(&self) -> Result<Vec<CheckRun>> {
        Err(Error::CheckRuns(
            "403 Resource not accessible by integration".to_string(),
        ))
    }
}
