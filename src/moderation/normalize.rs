// Response normalizer: turns the model's raw reply into a verdict.
//
// Fail-open: a missing reply, a JSON syntax error and a schema mismatch all
// yield the "assume safe" verdict for the variant. Nothing here returns an
// error; misbehaving models are logged, not surfaced.

use std::sync::OnceLock;

use regex_lite::Regex;
use serde::Deserialize;
use tracing::warn;

use super::prompt::PromptVariant;
use super::types::{ModerationIssue, ModerationVerdict};

/// Matches ```json / ``` fence markers and the newline after them.
fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```(?:json)?\n?").expect("valid fence regex"))
}

/// Remove every code-fence marker and surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    fence_pattern().replace_all(raw, "").trim().to_string()
}

/// Verdict as the model sends it. The score may come back as a float or
/// outside 0-100, so it's coerced after parsing.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVerdict {
    toxicity_score: f64,
    issues: Vec<ModerationIssue>,
    overall_safe: bool,
    friendly_message: String,
}

impl From<RawVerdict> for ModerationVerdict {
    fn from(raw: RawVerdict) -> Self {
        Self {
            toxicity_score: coerce_score(raw.toxicity_score),
            issues: raw.issues,
            overall_safe: raw.overall_safe,
            friendly_message: raw.friendly_message,
        }
    }
}

/// Round to the nearest integer and clamp into 0..=100. NaN maps to 0.
pub fn coerce_score(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}

/// Parse a reply strictly, without the fallback.
pub fn parse_verdict(raw: &str) -> Result<ModerationVerdict, serde_json::Error> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str::<RawVerdict>(&cleaned).map(Into::into)
}

/// Normalize the model's reply for `variant`, substituting the fail-open
/// verdict when the reply is absent or doesn't match the verdict schema.
pub fn normalize(raw: Option<&str>, variant: PromptVariant) -> ModerationVerdict {
    let Some(raw) = raw else {
        warn!(variant = variant.as_str(), "Model returned no content, assuming safe");
        return ModerationVerdict::fail_open(variant.fallback_message());
    };

    match parse_verdict(raw) {
        Ok(verdict) => verdict,
        Err(e) => {
            warn!(
                variant = variant.as_str(),
                error = %e,
                reply = %raw,
                "Failed to parse model reply, assuming safe"
            );
            ModerationVerdict::fail_open(variant.fallback_message())
        }
    }
}
