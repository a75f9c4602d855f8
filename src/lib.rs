// SafeGuard: child-safety content moderation relay and dashboard
//
// This is the library root. Each module corresponds to one step of the
// flow: input -> relay -> AI gateway -> normalizer -> dashboard -> terminal.

pub mod config;
pub mod dashboard;
pub mod gateway;
pub mod moderation;
pub mod output;
pub mod relay;
