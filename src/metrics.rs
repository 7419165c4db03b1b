use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and describe the GitHub client series.
    /// Fails if another recorder is already installed.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        describe();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!("github_requests_total", "Requests sent to the GitHub API.");
    describe_counter!(
        "github_errors_total",
        "GitHub calls that ended in a transport, status or decode error."
    );
    describe_counter!(
        "github_cache_hits_total",
        "GitHub calls answered from the revalidation cache."
    );
    describe_histogram!("github_fetch_ms", "GitHub call duration in milliseconds.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn described_series_are_rendered() {
        let m = Metrics::init().expect("first recorder in this test binary");
        metrics::counter!("github_requests_total").increment(1);
        let out = m.handle.render();
        assert!(out.contains("github_requests_total"), "render: {out}");
        assert!(Metrics::init().is_err(), "a second recorder must be rejected");
    }
}
