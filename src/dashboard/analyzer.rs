// Analyzer trait: what the dashboard calls to get a verdict.
//
// Three implementations: RelayClient (HTTP to a running relay),
// DirectAnalyzer (runs the relay in-process against the gateway) and
// MockAnalyzer (the legacy keyword demo).

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::gateway::traits::ChatCompletion;
use crate::moderation::prompt::Content;
use crate::moderation::types::ModerationVerdict;
use crate::relay::handlers::relay;

/// Where an image to analyze comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// `data:<mime>;base64,...`, as produced from a local file
    DataUrl(String),
    /// A remote image URL
    Url(String),
}

impl ImageSource {
    /// Read a local image and encode it as a data URL.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        Ok(Self::from_bytes(&bytes, mime_for_path(path)))
    }

    pub fn from_bytes(bytes: &[u8], mime: &str) -> Self {
        ImageSource::DataUrl(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
    }

    pub fn as_url(&self) -> &str {
        match self {
            ImageSource::DataUrl(url) | ImageSource::Url(url) => url,
        }
    }
}

/// One "analyze" click: either text or an image, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Text(String),
    Image(ImageSource),
}

impl Submission {
    /// Blank text or an empty image reference has nothing to send.
    pub fn is_blank(&self) -> bool {
        match self {
            Submission::Text(text) => text.trim().is_empty(),
            Submission::Image(source) => source.as_url().is_empty(),
        }
    }
}

#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, submission: &Submission) -> Result<ModerationVerdict>;
}

/// Runs the relay pipeline in-process, skipping the HTTP hop.
pub struct DirectAnalyzer {
    gateway: Arc<dyn ChatCompletion>,
    model: String,
}

impl DirectAnalyzer {
    pub fn new(gateway: Arc<dyn ChatCompletion>, model: &str) -> Self {
        Self {
            gateway,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Analyzer for DirectAnalyzer {
    async fn analyze(&self, submission: &Submission) -> Result<ModerationVerdict> {
        let content = match submission {
            Submission::Text(text) => Content::Text(text.clone()),
            Submission::Image(source) => Content::Image(source.as_url().to_string()),
        };
        Ok(relay(self.gateway.as_ref(), &self.model, content).await?)
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
