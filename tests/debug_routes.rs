// tests/debug_routes.rs
//
// /debug/* is gated by DEBUG_ROUTES=1 at router construction time.

use axum::body::{self, Body};
use http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use douyin_comment_analyzer::debug::ENV_DEBUG_ROUTES;
use douyin_comment_analyzer::{
    create_router, AnalysisPipeline, AnalyzerConfig, AppState, TokenizerKind,
};

fn router() -> Router {
    let cfg = AnalyzerConfig {
        tokenizer: TokenizerKind::Dictionary,
        ..AnalyzerConfig::default()
    };
    create_router(AppState::new(AnalysisPipeline::from_config(&cfg)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    (status, bytes.to_vec())
}

#[serial_test::serial]
#[tokio::test]
async fn debug_routes_are_hidden_by_default() {
    std::env::remove_var(ENV_DEBUG_ROUTES);
    let (status, _) = get(router(), "/debug/stats").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[serial_test::serial]
#[tokio::test]
async fn debug_routes_report_runs_with_labels_and_topics() {
    std::env::set_var(ENV_DEBUG_ROUTES, "1");
    let app = router();
    std::env::remove_var(ENV_DEBUG_ROUTES);

    let r = app
        .clone()
        .oneshot(
            Request::post("/analyze")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"[{"内容":"主播很可爱"},{"内容":"主播唱歌很好"},{"内容":"无聊"}]"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(r.status(), StatusCode::OK);

    let (status, bytes) = get(app.clone(), "/debug/runs?limit=1").await;
    assert_eq!(status, StatusCode::OK);
    let runs: Value = serde_json::from_slice(&bytes).unwrap();
    let runs = runs.as_array().unwrap();
    assert_eq!(runs.len(), 1);
    let last = &runs[0];
    assert_eq!(last["endpoint"], "/analyze");
    assert_eq!(last["comment_count"], 3);
    assert_eq!(last["labels"]["Positive"], 2);
    assert_eq!(last["labels"]["Negative"], 1);
    assert_eq!(last["top_topics"][0], "主播");

    let (status, bytes) = get(app, "/debug/stats").await;
    assert_eq!(status, StatusCode::OK);
    let stats: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(stats["runs"].as_u64().unwrap() >= 1);
    assert!(stats["comments"].as_u64().unwrap() >= 3);
    assert!(stats["labels"]["Positive"].as_u64().unwrap() >= 2);
    let topics = stats["recurring_topics"].as_array().unwrap();
    assert!(topics.iter().any(|t| t[0] == "主播"));
    assert!(stats.get("total_requests").is_none());
}
