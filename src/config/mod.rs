// src/config/mod.rs
//! Process configuration. Everything comes from the environment (optionally seeded
//! from `.env` by the binary); nothing here fails when the GitHub token is absent.

pub mod site;

use std::time::Duration;

use tracing::{info, warn};

use crate::github::client::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use crate::github::{Credential, GithubClient};

pub const ENV_GITHUB_PAT: &str = "GITHUB_PAT";
pub const ENV_GITHUB_API_URL: &str = "GITHUB_API_URL";
pub const ENV_GITHUB_TIMEOUT_SECS: &str = "GITHUB_TIMEOUT_SECS";
pub const ENV_GITHUB_CACHE_TTL_SECS: &str = "GITHUB_CACHE_TTL_SECS";

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct Settings {
    /// `None` is allowed; every GitHub call then fails with a 500.
    pub credential: Option<Credential>,
    pub api_url: String,
    pub timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credential: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let credential = std::env::var(ENV_GITHUB_PAT).ok().and_then(Credential::new);
        let api_url = std::env::var(ENV_GITHUB_API_URL)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let settings = Self {
            credential,
            api_url,
            timeout: env_secs(ENV_GITHUB_TIMEOUT_SECS, DEFAULT_TIMEOUT),
            cache_ttl: env_secs(ENV_GITHUB_CACHE_TTL_SECS, DEFAULT_CACHE_TTL),
        };

        // Presence only; the token itself is never logged.
        info!(
            token_present = settings.credential.is_some(),
            api_url = %settings.api_url,
            timeout_secs = settings.timeout.as_secs(),
            cache_ttl_secs = settings.cache_ttl.as_secs(),
            "github settings loaded"
        );
        settings
    }

    pub fn github_client(&self) -> anyhow::Result<GithubClient> {
        Ok(GithubClient::new(&self.api_url)?
            .with_timeout(self.timeout)
            .with_cache_ttl(self.cache_ttl))
    }
}

fn env_secs(name: &str, default: Duration) -> Duration {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(var = name, value = %raw, "not a number of seconds; using default");
                default
            }
        },
        Err(_) => default,
    }
}
