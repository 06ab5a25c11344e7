//! Submission of finished questionnaires to the analysis service.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::flow::{AnswerSlot, Notice};

/// JSON body of `POST /submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    pub quiz_id: String,
    pub answers: BTreeMap<String, AnswerSlot>,
}

/// What the service hands back for an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    status: String,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// The page a successful submission navigates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub user_id: String,
}

impl ResultView {
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/result/{}", base_url.trim_end_matches('/'), self.user_id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service answered with HTTP {0}")]
    Status(u16),
    #[error("service rejected the submission: {0}")]
    Rejected(String),
    #[error("response could not be decoded: {0}")]
    Decode(String),
}

impl SubmitError {
    pub fn notice(&self) -> Notice {
        match self {
            SubmitError::Transport(_) | SubmitError::Decode(_) => Notice::ConnectionFailed,
            SubmitError::Status(_) | SubmitError::Rejected(_) => Notice::SubmitRejected,
        }
    }
}

#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<Receipt, SubmitError>;
}

pub struct HttpSubmitter {
    client: Client,
    base_url: String,
}

impl HttpSubmitter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SubmitError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Submitter for HttpSubmitter {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<Receipt, SubmitError> {
        let url = format!("{}/submit", self.base_url);
        debug!("Posting {} answers to {}", payload.answers.len(), url);

        let response = self.client.post(&url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<Receipt, SubmitError> {
    let parsed: SubmitResponse =
        serde_json::from_str(body).map_err(|e| SubmitError::Decode(e.to_string()))?;
    if parsed.status != "success" {
        return Err(SubmitError::Rejected(
            parsed.message.unwrap_or(parsed.status),
        ));
    }
    match parsed.user_id {
        Some(user_id) if !user_id.is_empty() => Ok(Receipt { user_id }),
        _ => Err(SubmitError::Decode("missing user_id".to_string())),
    }
}
