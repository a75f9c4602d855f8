// Score-derived display state for the safety meter and badges.
//
// Tiers are a pure function of the latest score: no smoothing, no
// hysteresis. Boundaries sit at 33/34 and 66/67.

use serde::Serialize;

use crate::moderation::types::{ModerationIssue, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SafetyTier {
    Safe,
    Moderate,
    High,
}

impl SafetyTier {
    /// Tier for a 0-100 toxicity score.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=33 => SafetyTier::Safe,
            34..=66 => SafetyTier::Moderate,
            _ => SafetyTier::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SafetyTier::Safe => "Safe",
            SafetyTier::Moderate => "Moderate",
            SafetyTier::High => "High",
        }
    }

    /// Color token the frontend and terminal renderer key off.
    pub fn color_token(&self) -> &'static str {
        match self {
            SafetyTier::Safe => "safe",
            SafetyTier::Moderate => "moderate",
            SafetyTier::High => "high",
        }
    }

    /// Reassurance copy shown under the meter.
    pub fn message(&self) -> &'static str {
        match self {
            SafetyTier::Safe => "Everything looks good! The content appears safe and friendly.",
            SafetyTier::Moderate => {
                "Some content may need attention. Take a moment to review flagged items."
            }
            SafetyTier::High => {
                "Some concerning content was found. Please review with a trusted adult."
            }
        }
    }
}

impl std::fmt::Display for SafetyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Badge variant for a severity: low renders like Safe, medium like
/// Moderate, high like High.
pub fn severity_badge(severity: Severity) -> SafetyTier {
    match severity {
        Severity::Low => SafetyTier::Safe,
        Severity::Medium => SafetyTier::Moderate,
        Severity::High => SafetyTier::High,
    }
}

/// Meter fill as a fraction of `width` cells.
pub fn meter_fill(score: u8, width: usize) -> usize {
    let score = usize::from(score.min(100));
    (score * width + 50) / 100
}

/// Legacy dashboard aggregate: severity weights (high 30, medium 15, low 5)
/// summed and capped at 100.
pub fn severity_weighted_score<'a, I>(issues: I) -> u8
where
    I: IntoIterator<Item = &'a ModerationIssue>,
{
    let total: u32 = issues.into_iter().map(|i| i.severity.weight()).sum();
    total.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_fill_scales_to_width() {
        assert_eq!(meter_fill(0, 40), 0);
        assert_eq!(meter_fill(50, 40), 20);
        assert_eq!(meter_fill(100, 40), 40);
        assert_eq!(meter_fill(1, 40), 0);
        assert_eq!(meter_fill(2, 40), 1);
    }

    #[test]
    fn severity_badges_follow_tiers() {
        assert_eq!(severity_badge(Severity::Low), SafetyTier::Safe);
        assert_eq!(severity_badge(Severity::Medium), SafetyTier::Moderate);
        assert_eq!(severity_badge(Severity::High), SafetyTier::High);
    }

    #[test]
    fn tiers_carry_fixed_tokens() {
        assert_eq!(SafetyTier::Safe.color_token(), "safe");
        assert_eq!(SafetyTier::Moderate.color_token(), "moderate");
        assert_eq!(SafetyTier::High.color_token(), "high");
    }
}
