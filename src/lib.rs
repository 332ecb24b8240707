// src/lib.rs
// Public library surface for the server binary, the CLI and integration tests.

pub mod api;
pub mod comment;
pub mod config;
pub mod debug;
pub mod error;
pub mod lexicon;
pub mod metrics;
pub mod mining;
pub mod pipeline;
pub mod sentiment;
pub mod stopwords;
pub mod tokenizer;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::comment::{Comment, TextField};
pub use crate::config::AnalyzerConfig;
pub use crate::error::{AnalyzerError, Result};
pub use crate::mining::{HotTopic, MiningResult, TextMiner};
pub use crate::pipeline::{AnalysisPipeline, AnalysisReport};
pub use crate::sentiment::{SentimentLabel, SentimentResult, SentimentScorer};
pub use crate::tokenizer::TokenizerKind;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Install the global tracing subscriber. `RUST_LOG` wins over
/// `default_filter`; `LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let json = std::env::var(ENV_LOG_FORMAT)
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}
