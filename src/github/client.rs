// src/github/client.rs
//! Authenticated access to the three GitHub REST resources the site needs.
//!
//! Every call yields a [`FetchResult`]: failures are values, never panics, so callers
//! can degrade to a placeholder instead of failing a whole page. No retries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use metrics::{counter, histogram};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::cache::ResponseCache;
use super::{Contributor, Credential, FetchError, FetchResult, RepoInfo, UserInfo};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "codeclimbers-io-app";
const ACCEPT_V3: &str = "application/vnd.github.v3+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

#[derive(Clone, Debug)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    cache: Option<Arc<ResponseCache>>,
}

impl GithubClient {
    /// `base_url` is normally [`DEFAULT_API_URL`]; tests point it at a mock server.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid GitHub API URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            bail!("GitHub API URL cannot carry a path: {base_url}");
        }
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(4))
            .build()
            .context("building reqwest client")?;
        Ok(Self {
            http,
            base_url,
            timeout: DEFAULT_TIMEOUT,
            cache: None,
        })
    }

    /// Upper bound for a single call, connect + headers + body.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Serve successful responses from memory for up to `ttl`. Zero disables caching.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = if ttl.is_zero() {
            None
        } else {
            Some(Arc::new(ResponseCache::new(ttl)))
        };
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `GET /repos/{owner}/{repo}`
    pub async fn fetch_repo_info(
        &self,
        owner: &str,
        repo: &str,
        credential: Option<&Credential>,
    ) -> FetchResult<RepoInfo> {
        let body = self.get_json(&["repos", owner, repo], credential).await?;
        decode(body)
    }

    /// `GET /users/{owner}`
    pub async fn fetch_user_info(
        &self,
        owner: &str,
        credential: Option<&Credential>,
    ) -> FetchResult<UserInfo> {
        let body = self.get_json(&["users", owner], credential).await?;
        decode(body)
    }

    /// `GET /repos/{owner}/{repo}/contributors`, first page only.
    ///
    /// A body that is not a JSON array (or is empty, as for a repository without
    /// commits) yields an empty list.
    pub async fn fetch_contributors(
        &self,
        owner: &str,
        repo: &str,
        credential: Option<&Credential>,
    ) -> FetchResult<Vec<Contributor>> {
        let body = self
            .get_json(&["repos", owner, repo, "contributors"], credential)
            .await?;
        if !body.is_array() {
            if !body.is_null() {
                warn!(owner, repo, "contributors body is not a list; treating as empty");
            }
            return Ok(Vec::new());
        }
        decode(body)
    }

    fn endpoint(&self, segments: &[&str]) -> FetchResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::Transport(format!("unusable base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, segments: &[&str], credential: Option<&Credential>) -> FetchResult<Value> {
        let Some(credential) = credential else {
            warn!(path = %segments.join("/"), "GitHub token was not provided");
            return Err(FetchError::MissingCredential);
        };

        let url = self.endpoint(segments)?;

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(url.as_str()) {
                counter!("github_cache_hits_total").increment(1);
                debug!(%url, "github cache hit");
                return Ok(hit);
            }
        }

        counter!("github_requests_total").increment(1);
        debug!(%url, "fetching");
        let t0 = Instant::now();
        let result = self.send(&url, credential).await;
        histogram!("github_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        match result {
            Ok(value) => {
                if let Some(cache) = &self.cache {
                    cache.insert(url.to_string(), value.clone());
                }
                Ok(value)
            }
            Err(e) => {
                counter!("github_errors_total").increment(1);
                Err(e)
            }
        }
    }

    async fn send(&self, url: &Url, credential: &Credential) -> FetchResult<Value> {
        let resp = self
            .http
            .get(url.clone())
            .timeout(self.timeout)
            .header(ACCEPT, ACCEPT_V3)
            .header(AUTHORIZATION, format!("token {}", credential.expose()))
            .header(API_VERSION_HEADER, API_VERSION)
            .send()
            .await
            .map_err(|e| {
                warn!(%url, error = %e, "network error fetching GitHub API");
                FetchError::Transport(e.to_string())
            })?;

        let status = resp.status();
        debug!(%url, status = status.as_u16(), "github response");

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown Status").to_string();
            let body = resp.text().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), %reason, body = %body, "GitHub API error");
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                reason,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| {
            warn!(%url, error = %e, "reading GitHub response body failed");
            FetchError::Transport(e.to_string())
        })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(%url, error = %e, "GitHub response is not JSON");
            FetchError::Decode(e.to_string())
        })
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> FetchResult<T> {
    serde_json::from_value(body).map_err(|e| FetchError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_and_encodes_segments() {
        let c = GithubClient::new("https://api.github.com").unwrap();
        let url = c.endpoint(&["repos", "CodeClimbersIO", "ebb-app"]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/repos/CodeClimbersIO/ebb-app");

        let url = c.endpoint(&["repos", "o", "a b", "contributors"]).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/repos/o/a%20b/contributors");
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let c = GithubClient::new("http://localhost:9000/github/").unwrap();
        let url = c.endpoint(&["users", "octocat"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/github/users/octocat");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(GithubClient::new("not a url").is_err());
        assert!(GithubClient::new("mailto:dev@example.com").is_err());
    }

    #[test]
    fn zero_ttl_disables_cache() {
        let c = GithubClient::new(DEFAULT_API_URL)
            .unwrap()
            .with_cache_ttl(Duration::ZERO);
        assert!(c.cache.is_none());
        let c = c.with_cache_ttl(Duration::from_secs(60));
        assert_eq!(
            c.cache.as_ref().map(|cache| cache.ttl()),
            Some(Duration::from_secs(60))
        );
    }

    #[test]
    fn timeout_defaults_and_overrides() {
        let c = GithubClient::new(DEFAULT_API_URL).unwrap();
        assert_eq!(c.timeout(), DEFAULT_TIMEOUT);
        let c = c.with_timeout(Duration::from_millis(250));
        assert_eq!(c.timeout(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_io() {
        // Unroutable base: any real request would surface as a transport error instead.
        let c = GithubClient::new("http://127.0.0.1:9").unwrap();
        let err = c.fetch_user_info("octocat", None).await.unwrap_err();
        assert_eq!(err, FetchError::MissingCredential);
        assert_eq!(err.status(), 500);
    }
}
