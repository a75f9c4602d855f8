// HTTP client for the upstream chat-completion gateway.
//
// One POST per call, bearer-token auth, no retries. 429 and 402 are
// surfaced as their own variants so the relay can pass them through.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error};

use super::traits::{ChatCompletion, GatewayError};
use super::types::{ChatRequest, ChatResponse};

/// Default OpenAI-compatible completion endpoint.
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";

/// Default model used for both text and image analysis.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

pub struct GatewayClient {
    client: Client,
    url: String,
    api_key: String,
}

impl GatewayClient {
    /// Create a client posting to `url` with the given bearer key.
    ///
    /// An empty key is accepted here; every call then fails with
    /// `GatewayError::MissingApiKey` so the relay reports it per request.
    pub fn new(url: &str, api_key: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("safeguard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl ChatCompletion for GatewayClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>, GatewayError> {
        if self.api_key.is_empty() {
            return Err(GatewayError::MissingApiKey);
        }

        debug!(model = %request.model, messages = request.messages.len(), "Calling AI gateway");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited,
                StatusCode::PAYMENT_REQUIRED => GatewayError::QuotaExceeded,
                _ => {
                    let body = response.text().await.unwrap_or_default();
                    error!(status = status.as_u16(), body = %body, "AI gateway error");
                    GatewayError::Status { status, body }
                }
            });
        }

        let envelope: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidEnvelope(e.to_string()))?;

        Ok(envelope.into_first_content())
    }
}
