// src/lib.rs
// Public library surface for the binary and the integration tests.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod format;
pub mod github;
pub mod metrics;
pub mod site;

// `crate_root::api::router` and `crate_root::router` both work.
pub use crate::api::router;

use std::sync::Arc;

use axum::Router;

use crate::api::AppState;
use crate::config::site::SiteConfig;
use crate::config::Settings;

/// Build the full API router from explicit settings. No sockets, no globals:
/// tests call this directly and drive it with `oneshot`.
pub fn build_app(settings: &Settings, site: SiteConfig) -> anyhow::Result<Router> {
    let state = AppState {
        github: settings.github_client()?,
        credential: settings.credential.clone(),
        site: Arc::new(site),
    };
    Ok(router(state))
}
