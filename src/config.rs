use std::env;

use anyhow::Result;

use crate::gateway::client::{DEFAULT_GATEWAY_URL, DEFAULT_MODEL};

/// Where `analyze-*` and `dashboard` look for a running relay by default.
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8787";

/// Central configuration loaded from environment variables.
///
/// The API key comes from the environment only (never hardcoded). The .env
/// file is loaded at startup via dotenvy.
#[derive(Clone)]
pub struct Config {
    /// Bearer key for the AI gateway (SAFEGUARD_API_KEY, or LOVABLE_API_KEY)
    pub api_key: String,
    /// Chat-completion endpoint the relay forwards to
    pub gateway_url: String,
    /// Model name sent with every request
    pub model: String,
    /// Base URL of the relay used by the CLI clients
    pub relay_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            relay_url: DEFAULT_RELAY_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, defaulting everything
    /// except the API key.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let api_key = env::var("SAFEGUARD_API_KEY")
            .or_else(|_| env::var("LOVABLE_API_KEY"))
            .unwrap_or_default();

        Ok(Self {
            api_key,
            gateway_url: env::var("SAFEGUARD_GATEWAY_URL").unwrap_or(defaults.gateway_url),
            model: env::var("SAFEGUARD_MODEL").unwrap_or(defaults.model),
            relay_url: env::var("SAFEGUARD_RELAY_URL").unwrap_or(defaults.relay_url),
        })
    }

    /// Check that the gateway API key is configured.
    /// Call this before any operation that talks to the AI gateway directly.
    pub fn require_api_key(&self) -> Result<()> {
        if self.api_key.is_empty() {
            anyhow::bail!(
                "SAFEGUARD_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }
}
