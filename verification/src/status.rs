//! Remote review status: the query boundary and the bounded poller.
//!
//! The status endpoint's JSON is parsed exactly once, here, into
//! [`RemoteStatus`]; everything downstream works with the typed variants.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default timeout for a single status request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Typed state of a remote review.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteStatus {
    /// Review passed; the reward may already be attached.
    Success {
        reward_code: Option<String>,
        redirect_url: Option<String>,
    },
    /// Review still open.
    Pending,
    /// Review failed with the service's reason codes.
    Rejected { error_ids: Vec<String> },
    /// Any other step (document upload, email loop, ...) — not terminal.
    Other(String),
}

impl RemoteStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Rejected { .. })
    }
}

/// A single status query failure.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("status endpoint returned HTTP {0}")]
    Status(u16),

    #[error("invalid status payload: {0}")]
    InvalidResponse(String),
}

/// The status-query capability, one call per remote verification id.
#[async_trait]
pub trait StatusBackend: Send + Sync {
    async fn fetch(&self, external_id: &str) -> Result<RemoteStatus, QueryError>;
}

/// Raw JSON payload of `GET {base}/rest/v2/verification/{id}`.
///
/// The reward code may sit at the top level or nested under `rewardData`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusPayload {
    current_step: Option<String>,
    #[serde(default)]
    reward_code: Option<String>,
    #[serde(default)]
    reward_data: Option<RewardData>,
    #[serde(default)]
    redirect_url: Option<String>,
    #[serde(default)]
    error_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RewardData {
    #[serde(default)]
    reward_code: Option<String>,
}

impl StatusPayload {
    fn into_status(self) -> RemoteStatus {
        match self.current_step.as_deref() {
            Some("success") => RemoteStatus::Success {
                reward_code: self
                    .reward_code
                    .or_else(|| self.reward_data.and_then(|d| d.reward_code)),
                redirect_url: self.redirect_url,
            },
            Some("pending") => RemoteStatus::Pending,
            Some("error") => RemoteStatus::Rejected {
                error_ids: self.error_ids,
            },
            Some(step) => RemoteStatus::Other(step.to_string()),
            None => RemoteStatus::Other("unknown".to_string()),
        }
    }
}

/// HTTP status backend (reusable connection pool).
pub struct HttpStatusBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpStatusBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl StatusBackend for HttpStatusBackend {
    async fn fetch(&self, external_id: &str) -> Result<RemoteStatus, QueryError> {
        let url = format!(
            "{}/rest/v2/verification/{}",
            self.base_url.trim_end_matches('/'),
            external_id
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(QueryError::Status(response.status().as_u16()));
        }

        let payload: StatusPayload = response
            .json()
            .await
            .map_err(|e| QueryError::InvalidResponse(e.to_string()))?;
        Ok(payload.into_status())
    }
}

/// Result of a bounded poll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollResult {
    Success {
        reward_code: Option<String>,
        redirect_url: Option<String>,
    },
    Error { error_ids: Vec<String> },
    /// The deadline elapsed without a terminal remote state. Not a failure:
    /// the review is simply still open.
    TimedOut,
}

/// Bounded-retry status poller.
///
/// Queries at `interval` spacing until a terminal remote state or the
/// deadline. Transient query failures consume one interval and never abort
/// the poll; only the deadline does. Holds no limiter permit.
pub struct StatusPoller {
    backend: Arc<dyn StatusBackend>,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(backend: Arc<dyn StatusBackend>, interval: Duration) -> Self {
        Self { backend, interval }
    }

    pub async fn poll(&self, external_id: &str, max_wait: Duration) -> PollResult {
        let started = tokio::time::Instant::now();
        loop {
            if started.elapsed() >= max_wait {
                tracing::info!(
                    external_id,
                    elapsed_secs = started.elapsed().as_secs(),
                    "status poll timed out"
                );
                return PollResult::TimedOut;
            }

            match self.backend.fetch(external_id).await {
                Ok(RemoteStatus::Success {
                    reward_code,
                    redirect_url,
                }) => {
                    tracing::info!(external_id, "remote review approved");
                    return PollResult::Success {
                        reward_code,
                        redirect_url,
                    };
                }
                Ok(RemoteStatus::Rejected { error_ids }) => {
                    tracing::warn!(external_id, ?error_ids, "remote review rejected");
                    return PollResult::Error { error_ids };
                }
                Ok(RemoteStatus::Pending | RemoteStatus::Other(_)) => {}
                Err(e) => {
                    // Transient: treated as "not yet terminal".
                    tracing::warn!(external_id, "status query error: {e}");
                }
            }

            tokio::time::sleep(self.interval).await;
        }
    }

    /// One status query, no polling loop. Transport failures are surfaced
    /// to the caller (this is the free on-demand path).
    pub async fn fetch_once(&self, external_id: &str) -> Result<RemoteStatus, QueryError> {
        self.backend.fetch(external_id).await
    }
}
