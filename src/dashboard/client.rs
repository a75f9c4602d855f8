// HTTP client for a running SafeGuard relay.
//
// Any `{ "error": ... }` body is treated as a failure, even on a 200,
// and its message is surfaced unchanged.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::analyzer::{Analyzer, ImageSource, Submission};
use crate::moderation::types::{ImageRequest, ModerationVerdict, TextRequest};

pub struct RelayClient {
    client: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    /// Create a client for the relay at `base_url` (e.g. `http://127.0.0.1:8787`).
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("safeguard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn analyze_text(&self, text: &str) -> Result<ModerationVerdict> {
        let body = TextRequest {
            text: text.to_string(),
        };
        self.post("analyze-text", &body).await
    }

    pub async fn analyze_image(&self, source: &ImageSource) -> Result<ModerationVerdict> {
        let body = match source {
            ImageSource::DataUrl(url) => ImageRequest {
                image_base64: Some(url.clone()),
                image_url: None,
            },
            ImageSource::Url(url) => ImageRequest {
                image_base64: None,
                image_url: Some(url.clone()),
            },
        };
        self.post("analyze-image", &body).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ModerationVerdict> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Relay POST request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to reach SafeGuard relay at {}", self.base_url))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let value: Option<Value> = serde_json::from_str(&text).ok();

        if let Some(message) = value
            .as_ref()
            .and_then(|v| v.get("error"))
            .and_then(Value::as_str)
        {
            anyhow::bail!("{message}");
        }

        if !status.is_success() {
            anyhow::bail!("Relay returned {status}: {text}");
        }

        let value = value.context("Relay returned a non-JSON response")?;
        serde_json::from_value(value).context("Relay returned a malformed verdict")
    }
}

#[async_trait]
impl Analyzer for RelayClient {
    async fn analyze(&self, submission: &Submission) -> Result<ModerationVerdict> {
        match submission {
            Submission::Text(text) => self.analyze_text(text).await,
            Submission::Image(source) => self.analyze_image(source).await,
        }
    }
}
