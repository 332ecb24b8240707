//! Debug helpers: anonymized text ids for logs and an in-process history of
//! finished analysis runs exposed under `/debug` (mounted only when
//! `DEBUG_ROUTES=1`).

use axum::{extract::Query, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, sync::Mutex};

use crate::mining::FrequencyTable;
use crate::sentiment::LabelDistribution;

const RUNS_CAP: usize = 500;
const DEFAULT_RUNS_LIMIT: usize = 50;
const RECURRING_TOPICS: usize = 10;

pub const ENV_DEBUG_ROUTES: &str = "DEBUG_ROUTES";
pub const ENV_DEV_LOG: &str = "ANALYZER_DEV_LOG";

/// One finished corpus analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub at: DateTime<Utc>,
    pub endpoint: String,
    pub comment_count: usize,
    pub labels: LabelDistribution,
    /// Hot-topic keywords of the run, strongest first. Empty for runs that
    /// only score sentiment.
    pub top_topics: Vec<String>,
}

/// Totals over the retained run history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub runs: usize,
    pub comments: usize,
    pub labels: LabelDistribution,
    /// Topic keywords by the number of runs they appeared in.
    pub recurring_topics: Vec<(String, usize)>,
}

impl RunStats {
    fn from_runs<'a>(runs: impl IntoIterator<Item = &'a RunRecord>) -> Self {
        let mut stats = RunStats::default();
        let mut topics = FrequencyTable::default();
        for run in runs {
            stats.runs += 1;
            stats.comments += run.comment_count;
            stats.labels.positive += run.labels.positive;
            stats.labels.neutral += run.labels.neutral;
            stats.labels.negative += run.labels.negative;
            for topic in &run.top_topics {
                topics.add(topic.clone());
            }
        }
        stats.recurring_topics = topics.top(RECURRING_TOPICS);
        stats
    }
}

static RUNS: Lazy<Mutex<VecDeque<RunRecord>>> =
    Lazy::new(|| Mutex::new(VecDeque::with_capacity(RUNS_CAP)));

#[derive(Deserialize)]
pub struct RunsQuery {
    pub limit: Option<usize>,
}

pub fn router() -> Router {
    Router::new()
        .route("/debug/runs", get(runs))
        .route("/debug/stats", get(stats))
}

pub fn routes_enabled() -> bool {
    std::env::var(ENV_DEBUG_ROUTES).ok().as_deref() == Some("1")
}

/// Verbose per-comment logging gate: `ANALYZER_DEV_LOG=1` in a debug build.
pub fn dev_logging_enabled() -> bool {
    cfg!(debug_assertions) && std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1")
}

/// Short stable id for a text; raw comment text never goes to the logs.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    digest.iter().take(6).map(|b| format!("{b:02x}")).collect()
}

pub fn record_run(
    endpoint: &str,
    comment_count: usize,
    labels: LabelDistribution,
    top_topics: Vec<String>,
) {
    let mut runs = RUNS.lock().expect("debug runs mutex poisoned");
    if runs.len() >= RUNS_CAP {
        runs.pop_front();
    }
    runs.push_back(RunRecord {
        at: Utc::now(),
        endpoint: endpoint.to_string(),
        comment_count,
        labels,
        top_topics,
    });
}

/// Most recent runs, oldest first.
pub fn recent_runs(limit: usize) -> Vec<RunRecord> {
    let runs = RUNS.lock().expect("debug runs mutex poisoned");
    let start = runs.len().saturating_sub(limit);
    runs.iter().skip(start).cloned().collect()
}

pub fn run_stats() -> RunStats {
    RunStats::from_runs(RUNS.lock().expect("debug runs mutex poisoned").iter())
}

async fn runs(Query(q): Query<RunsQuery>) -> Json<Vec<RunRecord>> {
    Json(recent_runs(q.limit.unwrap_or(DEFAULT_RUNS_LIMIT)))
}

async fn stats() -> Json<RunStats> {
    Json(run_stats())
}
