// Chat-completion trait: the seam between the relay and the upstream API.
//
// GatewayClient implements it over HTTP. Tests substitute a scripted
// implementation so relay behavior can be checked without a network.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use super::types::ChatRequest;

/// Ways a single upstream call can fail.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Upstream answered 429.
    #[error("upstream rate limit exceeded")]
    RateLimited,
    /// Upstream answered 402.
    #[error("upstream usage limit reached")]
    QuotaExceeded,
    /// Any other non-2xx status.
    #[error("AI Gateway error: {}", .status.as_u16())]
    Status { status: StatusCode, body: String },
    #[error("AI Gateway request failed: {0}")]
    Transport(String),
    /// 2xx response whose body isn't a chat-completion envelope.
    #[error("AI Gateway returned an unreadable response: {0}")]
    InvalidEnvelope(String),
    #[error("SAFEGUARD_API_KEY is not configured")]
    MissingApiKey,
}

/// Something that can run one chat completion.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send the request and return the first choice's message content.
    ///
    /// `Ok(None)` means the call succeeded but the model produced no usable
    /// text content.
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>, GatewayError>;
}
