// Dashboard session: the state one user sees between analyses.
//
// Holds the flagged-item list (newest first), the latest score and message,
// and whether an analysis is outstanding. Only one analysis may be in
// flight; a failed analysis leaves everything but the flag untouched.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::analyzer::{Analyzer, Submission};
use super::tier::SafetyTier;
use crate::moderation::types::{ModerationIssue, ModerationVerdict};

/// A verdict issue as displayed: the issue plus a synthetic id and the time
/// it was received. Neither is part of the verdict itself.
#[derive(Debug, Clone, Serialize)]
pub struct FlaggedItem {
    pub id: Uuid,
    pub captured_at: DateTime<Utc>,
    #[serde(flatten)]
    pub issue: ModerationIssue,
}

impl FlaggedItem {
    pub fn new(issue: ModerationIssue, captured_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            captured_at,
            issue,
        }
    }
}

/// What one successful analysis changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub new_items: usize,
    pub toxicity_score: u8,
    pub overall_safe: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSession {
    flagged: Vec<FlaggedItem>,
    toxicity_score: u8,
    friendly_message: Option<String>,
    analyzing: bool,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flagged items, newest analysis first.
    pub fn flagged(&self) -> &[FlaggedItem] {
        &self.flagged
    }

    /// 1-based lookup, as shown in the list.
    pub fn item(&self, position: usize) -> Option<&FlaggedItem> {
        position.checked_sub(1).and_then(|i| self.flagged.get(i))
    }

    pub fn toxicity_score(&self) -> u8 {
        self.toxicity_score
    }

    pub fn tier(&self) -> SafetyTier {
        SafetyTier::from_score(self.toxicity_score)
    }

    pub fn friendly_message(&self) -> Option<&str> {
        self.friendly_message.as_deref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    /// Mark an analysis as started. Fails if one is already outstanding or
    /// there's nothing to analyze.
    pub fn begin(&mut self, submission: &Submission) -> Result<()> {
        if self.analyzing {
            anyhow::bail!("An analysis is already in progress");
        }
        if submission.is_blank() {
            anyhow::bail!(match submission {
                Submission::Text(_) => "Nothing to analyze. Please enter some text to analyze.",
                Submission::Image(_) => "No image selected. Please upload an image to analyze.",
            });
        }
        self.analyzing = true;
        Ok(())
    }

    /// Finish the outstanding analysis. On success the verdict's issues are
    /// prepended and its score and message replace the current ones; on
    /// failure nothing but the in-progress flag changes.
    pub fn finish(&mut self, outcome: Result<ModerationVerdict>) -> Result<AnalysisSummary> {
        self.analyzing = false;
        let verdict = outcome?;
        Ok(self.apply(verdict, Utc::now()))
    }

    /// Begin, run the analyzer, finish.
    pub async fn analyze(
        &mut self,
        analyzer: &dyn Analyzer,
        submission: &Submission,
    ) -> Result<AnalysisSummary> {
        self.begin(submission)?;
        let outcome = analyzer.analyze(submission).await;
        self.finish(outcome)
    }

    fn apply(&mut self, verdict: ModerationVerdict, now: DateTime<Utc>) -> AnalysisSummary {
        let new_items: Vec<FlaggedItem> = verdict
            .issues
            .into_iter()
            .map(|issue| FlaggedItem::new(issue, now))
            .collect();
        let count = new_items.len();

        self.flagged.splice(0..0, new_items);
        self.toxicity_score = verdict.toxicity_score;
        self.friendly_message = Some(verdict.friendly_message);

        AnalysisSummary {
            new_items: count,
            toxicity_score: verdict.toxicity_score,
            overall_safe: verdict.overall_safe,
        }
    }
}
