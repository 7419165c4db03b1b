// src/site.rs
//! Everything the landing page shows from GitHub, gathered in one pass.
//! Each metric is best-effort: a failed fetch turns into a "-" placeholder.

use futures::future::join_all;
use serde::Serialize;
use tracing::warn;

use crate::aggregate::fetch_leaderboard;
use crate::config::site::SiteConfig;
use crate::format::format_count;
use crate::github::{AggregatedContributor, Credential, FetchResult, GithubClient};

pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Serialize)]
pub struct SiteOverview {
    pub org: String,
    pub org_url: String,
    pub followers: String,
    pub apps: Vec<AppCard>,
    pub contributors: Vec<AggregatedContributor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppCard {
    pub title: String,
    pub description: String,
    pub website_url: String,
    pub repo: String,
    pub repo_url: String,
    pub stars: String,
}

pub async fn build_overview(
    client: &GithubClient,
    site: &SiteConfig,
    credential: Option<&Credential>,
) -> SiteOverview {
    let repos = site.repos();
    let org = site.org.as_str();

    let (followers, stars, contributors) = tokio::join!(
        client.fetch_user_info(org, credential),
        join_all(
            repos
                .iter()
                .map(|repo| client.fetch_repo_info(org, repo, credential))
        ),
        fetch_leaderboard(client, org, &repos, credential),
    );

    let apps = site
        .apps
        .iter()
        .zip(stars)
        .map(|(app, stars)| AppCard {
            title: app.title.clone(),
            description: app.description.clone(),
            website_url: app.website_url.clone(),
            repo: app.repo.clone(),
            repo_url: format!("https://github.com/{org}/{}", app.repo),
            stars: display(stars.map(|info| info.stars()), "stars", &app.repo),
        })
        .collect();

    SiteOverview {
        org: org.to_string(),
        org_url: format!("https://github.com/{org}"),
        followers: display(followers.map(|info| info.followers()), "followers", org),
        apps,
        contributors,
    }
}

fn display(value: FetchResult<u64>, metric: &str, subject: &str) -> String {
    match value {
        Ok(n) => format_count(n),
        Err(e) => {
            warn!(metric, subject, status = e.status(), error = %e, "showing placeholder");
            PLACEHOLDER.to_string()
        }
    }
}
