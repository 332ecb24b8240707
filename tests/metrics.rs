// tests/metrics.rs
//
// The Prometheus recorder is process-global, so this binary installs it once
// and checks every series from a single test.
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use douyin_comment_analyzer::metrics::Metrics;
use douyin_comment_analyzer::{
    create_router, AnalysisPipeline, AnalyzerConfig, AppState, TokenizerKind,
};

#[tokio::test]
async fn metrics_endpoint_reports_analysis_series() {
    let metrics = Metrics::init().expect("install recorder");
    let cfg = AnalyzerConfig {
        tokenizer: TokenizerKind::Dictionary,
        ..AnalyzerConfig::default()
    };
    let app = create_router(AppState::new(AnalysisPipeline::from_config(&cfg)))
        .merge(metrics.router());

    let payload = r#"[{"内容":"这个视频太棒了"},{"内容":"无聊的视频"}]"#;
    let r = app
        .clone()
        .oneshot(
            Request::post("/analyze")
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(r.status(), StatusCode::OK);

    let r = app
        .clone()
        .oneshot(
            Request::post("/analyze")
                .header("content-type", "application/json")
                .body(Body::from("[]"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(r.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let m = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(m.status(), StatusCode::OK);
    let body = body::to_bytes(m.into_body(), 1_048_576).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();

    for needle in [
        "analyzer_runs_total 1",
        "analyzer_run_errors_total 1",
        "analyzer_comments_total 2",
        "analyzer_sentiment_labels_total{label=\"Positive\"} 1",
        "analyzer_run_duration_ms",
    ] {
        assert!(
            text.contains(needle),
            "metrics exposition missing '{needle}'\n{text}"
        );
    }

    // A second recorder cannot be installed.
    assert!(Metrics::init().is_err());
}
