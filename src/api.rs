use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::aggregate::fetch_leaderboard;
use crate::config::site::SiteConfig;
use crate::github::{AggregatedContributor, Contributor, Credential, FetchError, GithubClient};
use crate::site::{build_overview, SiteOverview};

#[derive(Clone)]
pub struct AppState {
    pub github: GithubClient,
    /// Read-only for the lifetime of the process; shared by all concurrent calls.
    pub credential: Option<Credential>,
    pub site: Arc<SiteConfig>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/test", get(api_test))
        .route("/api/github", get(github_proxy))
        .route("/api/leaderboard", get(leaderboard))
        .route("/api/site", get(site_overview))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Errors visible to API callers as `{ "error": "..." }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequestParameter(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequestParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::Fetch(e) => {
                StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum What {
    Stars,
    Followers,
    Contributors,
}

impl What {
    fn parse(raw: Option<&str>) -> Result<Self, ApiError> {
        match raw.unwrap_or("stars") {
            "stars" => Ok(What::Stars),
            "followers" => Ok(What::Followers),
            "contributors" => Ok(What::Contributors),
            other => {
                warn!(what = other, "invalid value for 'what'");
                Err(ApiError::InvalidRequestParameter(
                    "Invalid value for 'what' parameter".to_string(),
                ))
            }
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct GithubQuery {
    owner: Option<String>,
    repo: Option<String>,
    what: Option<String>,
}

#[derive(serde::Serialize)]
struct StarsResp {
    stars: u64,
}

#[derive(serde::Serialize)]
struct FollowersResp {
    followers: u64,
}

async fn api_test() -> Json<serde_json::Value> {
    Json(json!({ "message": "Test successful" }))
}

/// `GET /api/github?owner=..&repo=..&what=stars|followers|contributors`
async fn github_proxy(
    State(state): State<AppState>,
    Query(q): Query<GithubQuery>,
) -> Result<Response, ApiError> {
    let owner = non_empty(q.owner)
        .ok_or_else(|| ApiError::InvalidRequestParameter("Missing owner parameter".to_string()))?;
    let what = What::parse(q.what.as_deref())?;
    let repo = non_empty(q.repo);
    let credential = state.credential.as_ref();
    info!(%owner, repo = repo.as_deref().unwrap_or(""), ?what, "github proxy request");

    match what {
        What::Stars => {
            let repo = require_repo(repo, "stars")?;
            let info = state
                .github
                .fetch_repo_info(&owner, &repo, credential)
                .await?;
            Ok(Json(StarsResp { stars: info.stars() }).into_response())
        }
        What::Followers => {
            let info = state.github.fetch_user_info(&owner, credential).await?;
            Ok(Json(FollowersResp {
                followers: info.followers(),
            })
            .into_response())
        }
        What::Contributors => {
            let repo = require_repo(repo, "contributors")?;
            let list: Vec<Contributor> = state
                .github
                .fetch_contributors(&owner, &repo, credential)
                .await?;
            Ok(Json(list).into_response())
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct LeaderboardQuery {
    owner: Option<String>,
    /// Comma-separated repository names.
    repos: Option<String>,
}

/// `GET /api/leaderboard?owner=..&repos=a,b` (defaults to the configured org and apps)
async fn leaderboard(
    State(state): State<AppState>,
    Query(q): Query<LeaderboardQuery>,
) -> Json<Vec<AggregatedContributor>> {
    let owner = non_empty(q.owner).unwrap_or_else(|| state.site.org.clone());
    let repos = match non_empty(q.repos) {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => state.site.repos(),
    };
    let board = fetch_leaderboard(&state.github, &owner, &repos, state.credential.as_ref()).await;
    Json(board)
}

async fn site_overview(State(state): State<AppState>) -> Json<SiteOverview> {
    Json(build_overview(&state.github, &state.site, state.credential.as_ref()).await)
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn require_repo(repo: Option<String>, what: &str) -> Result<String, ApiError> {
    repo.ok_or_else(|| {
        warn!(what, "missing repo parameter");
        ApiError::InvalidRequestParameter(format!("Missing repo parameter for {what}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn what_defaults_to_stars() {
        assert_eq!(What::parse(None).unwrap(), What::Stars);
        assert_eq!(What::parse(Some("followers")).unwrap(), What::Followers);
        assert_eq!(What::parse(Some("contributors")).unwrap(), What::Contributors);
        assert!(What::parse(Some("forks")).is_err());
        assert!(What::parse(Some("Stars")).is_err());
    }

    #[test]
    fn error_statuses() {
        assert_eq!(
            ApiError::InvalidRequestParameter("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(FetchError::MissingCredential).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let upstream = FetchError::Upstream {
            status: 403,
            reason: "Forbidden".into(),
        };
        assert_eq!(ApiError::from(upstream).status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn blank_params_are_missing() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some(" cli ".into())), Some("cli".to_string()));
    }
}
