// Moderation contract: verdict types, prompt construction and the
// fail-open response normalizer.

pub mod normalize;
pub mod prompt;
pub mod types;
