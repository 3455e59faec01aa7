use crate::domain::payment::ProcessorPaymentRequest;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub mod http;
pub mod mock;

/// Body of a processor's health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    pub failing: bool,
    pub min_response_time: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

impl From<reqwest::Error> for ProcessorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProcessorError::Timeout
        } else if e.is_decode() {
            ProcessorError::MalformedBody(e.to_string())
        } else {
            ProcessorError::Transport(e.to_string())
        }
    }
}

/// Network access to one external processor. Implementations never retry.
#[async_trait::async_trait]
pub trait ProcessorClient: Send + Sync {
    fn base_url(&self) -> &str;

    async fn submit(&self, request: &ProcessorPaymentRequest) -> Result<(), ProcessorError>;

    async fn service_health(&self) -> Result<ServiceHealth, ProcessorError>;
}

/// Statuses a processor may answer with when it takes a payment.
pub fn is_accepted(status: StatusCode) -> bool {
    matches!(status, StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED)
}
