// src/aggregate.rs
//! Contributor leaderboard: merge per-repository contributor lists by login,
//! sum their contributions, drop the CI bot and keep the top entries.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::github::{AggregatedContributor, Contributor, Credential, FetchResult, GithubClient};

/// Automation identity that never appears on the leaderboard (exact, case-sensitive).
pub const EXCLUDED_LOGIN: &str = "github-actions[bot]";
pub const LEADERBOARD_SIZE: usize = 9;

/// Fold contributor lists (in input order) into a ranked leaderboard.
///
/// Failed sources are skipped. Ties keep first-seen order. Never fails; an empty
/// result simply means there is nobody to show.
pub fn aggregate(results: &[FetchResult<Vec<Contributor>>]) -> Vec<AggregatedContributor> {
    let mut ranked: Vec<AggregatedContributor> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (source, result) in results.iter().enumerate() {
        let list = match result {
            Ok(list) => list,
            Err(e) => {
                debug!(source, status = e.status(), error = %e, "skipping failed contributor source");
                continue;
            }
        };
        for c in list {
            match index.get(c.login.as_str()) {
                Some(&slot) => {
                    ranked[slot].contributions =
                        ranked[slot].contributions.saturating_add(c.contributions);
                }
                None => {
                    index.insert(c.login.as_str(), ranked.len());
                    ranked.push(c.clone());
                }
            }
        }
    }

    ranked.retain(|c| c.login != EXCLUDED_LOGIN);
    // `sort_by` is stable: equal totals stay in insertion order.
    ranked.sort_by(|a, b| b.contributions.cmp(&a.contributions));
    ranked.truncate(LEADERBOARD_SIZE);
    ranked
}

/// Fetch contributors of every repo concurrently, wait for all of them, then aggregate.
pub async fn fetch_leaderboard(
    client: &GithubClient,
    owner: &str,
    repos: &[String],
    credential: Option<&Credential>,
) -> Vec<AggregatedContributor> {
    let results = join_all(
        repos
            .iter()
            .map(|repo| client.fetch_contributors(owner, repo, credential)),
    )
    .await;

    for (repo, result) in repos.iter().zip(&results) {
        if let Err(e) = result {
            warn!(owner, repo = %repo, status = e.status(), error = %e, "contributors unavailable");
        }
    }

    let board = aggregate(&results);
    debug!(owner, repos = repos.len(), entries = board.len(), "leaderboard built");
    board
}
