use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const RUNS_TOTAL: &str = "analyzer_runs_total";
pub const RUN_ERRORS_TOTAL: &str = "analyzer_run_errors_total";
pub const COMMENTS_TOTAL: &str = "analyzer_comments_total";
pub const LABELS_TOTAL: &str = "analyzer_sentiment_labels_total";
pub const RUN_DURATION_MS: &str = "analyzer_run_duration_ms";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and describe the analyzer series.
    /// Only one recorder can be installed per process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!(RUNS_TOTAL, "Completed corpus analyses.");
        describe_counter!(RUN_ERRORS_TOTAL, "Corpus analyses that failed.");
        describe_counter!(COMMENTS_TOTAL, "Comments processed by corpus analyses.");
        describe_counter!(LABELS_TOTAL, "Scored comments per sentiment label.");
        describe_histogram!(RUN_DURATION_MS, "Corpus analysis time in milliseconds.");

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
