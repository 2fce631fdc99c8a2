use std::env;
use std::time::Duration;

use anyhow::Result;

/// Which semantic analysis backend to use.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleBackend {
    /// No semantic augmentation — lexical and probe features only
    Disabled,
    /// OpenAI-compatible chat completions endpoint — requires OPENAI_API_KEY
    Remote,
}

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Address the HTTP server binds to (defaults to 127.0.0.1).
    pub bind: String,
    /// Port the HTTP server listens on (defaults to 8090).
    pub port: u16,
    /// TTL for cached assessments, in seconds (defaults to 3600).
    pub cache_ttl: Duration,
    /// Which semantic backend to use (default: Disabled)
    pub oracle_backend: OracleBackend,
    /// Chat-completions endpoint URL.
    pub oracle_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    /// Per-request timeout for the semantic backend.
    pub oracle_timeout: Duration,
}

pub const DEFAULT_ORACLE_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the OpenAI key — semantic
    /// augmentation stays off until one is provided.
    pub fn load() -> Result<Self> {
        let port = match env::var("LITMUS_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("LITMUS_PORT is not a valid port: {raw}"))?,
            Err(_) => 8090,
        };

        let cache_ttl = match env::var("LITMUS_CACHE_TTL_SECS") {
            Ok(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| {
                    anyhow::anyhow!("LITMUS_CACHE_TTL_SECS is not a valid duration: {raw}")
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => crate::cache::DEFAULT_TTL,
        };

        let oracle_timeout = match env::var("LITMUS_ORACLE_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| {
                    anyhow::anyhow!("LITMUS_ORACLE_TIMEOUT_SECS is not a valid duration: {raw}")
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(20),
        };

        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let oracle_backend = if openai_api_key.is_empty() {
            OracleBackend::Disabled
        } else {
            OracleBackend::Remote
        };

        Ok(Self {
            bind: env::var("LITMUS_BIND").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            cache_ttl,
            oracle_backend,
            oracle_url: env::var("LITMUS_ORACLE_URL")
                .unwrap_or_else(|_| DEFAULT_ORACLE_URL.to_string()),
            openai_api_key,
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            oracle_timeout,
        })
    }

    /// Check that the semantic backend is usable.
    /// Call this before any operation that insists on semantic features.
    pub fn require_oracle(&self) -> Result<()> {
        if self.openai_api_key.is_empty() {
            anyhow::bail!(
                "OPENAI_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var mutation is process-global, so the load() tests stick to
    // variables no other test reads.

    #[test]
    fn defaults_apply_without_env() {
        let config = Config {
            bind: "127.0.0.1".to_string(),
            port: 8090,
            cache_ttl: Duration::from_secs(3600),
            oracle_backend: OracleBackend::Disabled,
            oracle_url: DEFAULT_ORACLE_URL.to_string(),
            openai_api_key: String::new(),
            openai_model: DEFAULT_MODEL.to_string(),
            oracle_timeout: Duration::from_secs(20),
        };
        assert!(config.require_oracle().is_err());
    }

    #[test]
    fn key_enables_oracle() {
        let config = Config {
            bind: "0.0.0.0".to_string(),
            port: 9000,
            cache_ttl: Duration::from_secs(60),
            oracle_backend: OracleBackend::Remote,
            oracle_url: DEFAULT_ORACLE_URL.to_string(),
            openai_api_key: "sk-test".to_string(),
            openai_model: DEFAULT_MODEL.to_string(),
            oracle_timeout: Duration::from_secs(5),
        };
        assert!(config.require_oracle().is_ok());
    }
}
