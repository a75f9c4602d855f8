// Legacy keyword analyzer: the offline demo path.
//
// Flags "hate"/"stupid" as medium hate speech and "hurt"/"harm" as high
// self-harm. Images are never flagged. Useful without an API key and as a
// deterministic analyzer in tests.

use anyhow::Result;
use async_trait::async_trait;

use super::analyzer::{Analyzer, Submission};
use super::tier::severity_weighted_score;
use crate::moderation::types::{HarmType, ModerationIssue, ModerationVerdict, Severity};

/// Characters of the submitted text kept as the issue excerpt.
const EXCERPT_CHARS: usize = 100;

#[derive(Debug, Default, Clone, Copy)]
pub struct MockAnalyzer;

impl MockAnalyzer {
    /// Keyword rules applied to a piece of text, in display order.
    pub fn issues_for(text: &str) -> Vec<ModerationIssue> {
        let lower = text.to_lowercase();
        let excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
        let mut issues = Vec::new();

        if lower.contains("hate") || lower.contains("stupid") {
            issues.push(ModerationIssue {
                harm_type: HarmType::HateSpeech,
                severity: Severity::Medium,
                content: excerpt.clone(),
                reason: "Contains potentially harmful language".to_string(),
                explanation: "This content was flagged because it uses words that can hurt or \
                              upset people. Using kind words helps everyone feel welcome and \
                              respected online."
                    .to_string(),
            });
        }

        if lower.contains("hurt") || lower.contains("harm") {
            issues.push(ModerationIssue {
                harm_type: HarmType::SelfHarm,
                severity: Severity::High,
                content: excerpt,
                reason: "Contains concerning themes".to_string(),
                explanation: "This content mentions topics that could be concerning. If you or \
                              someone you know is struggling, please talk to a trusted adult or \
                              reach out for help."
                    .to_string(),
            });
        }

        issues
    }

    fn verdict_for(issues: Vec<ModerationIssue>) -> ModerationVerdict {
        let toxicity_score = severity_weighted_score(&issues);
        let overall_safe = issues.is_empty();
        let friendly_message = if overall_safe {
            "This content looks safe and friendly! Great job staying positive online."
        } else {
            "We found a few things worth talking about. Take a look at the flagged items."
        };
        ModerationVerdict {
            toxicity_score,
            issues,
            overall_safe,
            friendly_message: friendly_message.to_string(),
        }
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(&self, submission: &Submission) -> Result<ModerationVerdict> {
        let issues = match submission {
            Submission::Text(text) => Self::issues_for(text),
            Submission::Image(_) => Vec::new(),
        };
        Ok(Self::verdict_for(issues))
    }
}
