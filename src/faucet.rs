//! Faucet funding with budgeted retry
//!
//! Faucets are shared, rate-limited infrastructure: an explicit rate-limit
//! signal (HTTP 429) aborts immediately, everything else is treated as
//! transient and retried under the wall-clock budget.

use crate::retry::{retry_with_backoff, RetryError, RetryPolicy};
use crate::wallet::LedgerAddress;
use serde_json::json;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum FundingError {
    /// The faucet signalled too many requests. Never retried.
    #[error("faucet rate limit hit while funding {recipient}")]
    RateLimited { recipient: String },
    /// Transient failures persisted past the retry budget.
    #[error("faucet funding timed out after {attempts} attempts: {last_error}")]
    Timeout { attempts: u32, last_error: String },
}

/// Per-attempt failure, classified for the retry combinator.
#[derive(Debug, Error)]
enum AttemptError {
    #[error("faucet rate limit")]
    RateLimited,
    #[error("faucet transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("faucet returned status {status}: {message}")]
    Unavailable { status: u16, message: String },
}

impl AttemptError {
    fn is_rate_limit(&self) -> bool {
        matches!(self, AttemptError::RateLimited)
    }
}

/// Client for a test-network faucet endpoint.
pub struct FaucetClient {
    http: reqwest::Client,
    host: String,
    policy: RetryPolicy,
}

impl FaucetClient {
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_policy(host, RetryPolicy::default())
    }

    pub fn with_policy(host: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            host: host.into(),
            policy,
        }
    }

    /// Request test funds for `recipient`, retrying transient failures with
    /// exponential backoff until the policy's budget runs out.
    pub async fn fund(&self, recipient: &LedgerAddress) -> Result<(), FundingError> {
        let outcome = retry_with_backoff(
            "faucet_fund",
            &self.policy,
            AttemptError::is_rate_limit,
            || self.request_funds(recipient),
        )
        .await;

        match outcome {
            Ok(()) => {
                info!(recipient = %recipient, "Faucet funding complete");
                Ok(())
            }
            Err(RetryError::Terminal(_)) => Err(FundingError::RateLimited {
                recipient: recipient.to_string(),
            }),
            Err(RetryError::DeadlineExceeded { attempts, last }) => Err(FundingError::Timeout {
                attempts,
                last_error: last.to_string(),
            }),
        }
    }

    async fn request_funds(&self, recipient: &LedgerAddress) -> Result<(), AttemptError> {
        let url = format!("{}/v1/fund", self.host.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .json(&json!({ "recipient": recipient.as_str() }))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AttemptError::Unavailable {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
