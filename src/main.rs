//! Douyin comment analyzer: HTTP service entrypoint.
//! Loads config, builds the analysis pipeline once and serves it with Axum.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use douyin_comment_analyzer::metrics::Metrics;
use douyin_comment_analyzer::{create_router, init_tracing, AnalysisPipeline, AnalyzerConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();

    init_tracing("info,douyin_comment_analyzer=info");

    let config = AnalyzerConfig::load().context("loading analyzer config")?;
    let pipeline = AnalysisPipeline::from_config(&config);

    let mut app = create_router(AppState::new(pipeline));
    match Metrics::init() {
        Ok(m) => app = app.merge(m.router()),
        Err(e) => warn!(error = ?e, "metrics disabled"),
    }

    let listener = TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    info!(addr = %config.addr, "douyin-comment-analyzer listening");

    axum::serve(listener, app).await.context("http server")?;
    Ok(())
}
