// Upstream AI gateway: chat-completion types, the ChatCompletion trait and
// its reqwest implementation.

pub mod client;
pub mod traits;
pub mod types;
