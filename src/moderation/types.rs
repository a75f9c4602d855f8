// Moderation verdict types: the JSON contract shared by the relay endpoint,
// the upstream model reply and the dashboard.
//
// Field names are camelCase on the wire; harm types are kebab-case.

use serde::{Deserialize, Serialize};

/// The category a flagged issue falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HarmType {
    HateSpeech,
    Abuse,
    SelfHarm,
    Explicit,
}

impl HarmType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarmType::HateSpeech => "hate-speech",
            HarmType::Abuse => "abuse",
            HarmType::SelfHarm => "self-harm",
            HarmType::Explicit => "explicit",
        }
    }

    /// Human-readable badge label.
    pub fn label(&self) -> &'static str {
        match self {
            HarmType::HateSpeech => "Hate Speech",
            HarmType::Abuse => "Abuse",
            HarmType::SelfHarm => "Self-Harm",
            HarmType::Explicit => "Explicit Content",
        }
    }
}

impl std::fmt::Display for HarmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How urgent a flagged issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }

    /// Points this severity contributes to the legacy dashboard score.
    pub fn weight(&self) -> u32 {
        match self {
            Severity::Low => 5,
            Severity::Medium => 15,
            Severity::High => 30,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single flagged piece of content within a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationIssue {
    pub harm_type: HarmType,
    pub severity: Severity,
    /// Brief excerpt (text) or description (image) of the concerning element
    pub content: String,
    pub reason: String,
    /// Child-friendly explanation shown in the reason view
    pub explanation: String,
}

/// The normalized moderation result returned by the relay endpoint.
///
/// `overall_safe == issues.is_empty()` is expected of the upstream model
/// but not checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationVerdict {
    /// 0 (benign) to 100 (very toxic)
    pub toxicity_score: u8,
    pub issues: Vec<ModerationIssue>,
    pub overall_safe: bool,
    pub friendly_message: String,
}

impl ModerationVerdict {
    /// The "assume safe" verdict substituted when the model reply is unusable.
    pub fn fail_open(message: &str) -> Self {
        Self {
            toxicity_score: 0,
            issues: Vec::new(),
            overall_safe: true,
            friendly_message: message.to_string(),
        }
    }
}

/// Body of `POST /analyze-text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Body of `POST /analyze-image`. At least one field must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
