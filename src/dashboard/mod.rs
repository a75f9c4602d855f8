// Client analysis flow: analyzers, the session-scoped dashboard state and
// the score-derived display tiers.

pub mod analyzer;
pub mod client;
pub mod command;
pub mod mock;
pub mod session;
pub mod tier;
