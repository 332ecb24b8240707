use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::comment::{comments_from_value, AnnotatedComment, TextField};
use crate::debug;
use crate::error::AnalyzerError;
use crate::mining::HotTopic;
use crate::pipeline::{AnalysisPipeline, AnalysisReport};
use crate::sentiment::{LabelDistribution, SentimentLabel, SentimentScorer, SentimentSummary};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AnalysisPipeline>,
}

impl AppState {
    pub fn new(pipeline: AnalysisPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Routes of the analyzer service. `/debug/*` is mounted only when
/// `DEBUG_ROUTES=1`.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/sentiment", post(sentiment))
        .route("/sentiment/batch", post(sentiment_batch))
        .route("/mine", post(mine))
        .route("/topics", post(topics))
        .route("/keywords", post(keywords))
        .route("/analyze", post(analyze))
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    if debug::routes_enabled() {
        router = router.merge(debug::router());
    }
    router
}

pub struct ApiError(AnalyzerError);

impl From<AnalyzerError> for ApiError {
    fn from(e: AnalyzerError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AnalyzerError::EmptyCorpus => StatusCode::UNPROCESSABLE_ENTITY,
            AnalyzerError::Json(_) => StatusCode::BAD_REQUEST,
            AnalyzerError::TokenizerUnavailable(_)
            | AnalyzerError::Config { .. }
            | AnalyzerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Deserialize)]
struct SentimentReq {
    #[serde(default)]
    text: Value,
}

#[derive(Serialize)]
struct SentimentResp {
    sentiment_score: f64,
    sentiment_label: SentimentLabel,
}

async fn sentiment(
    State(state): State<AppState>,
    Json(body): Json<SentimentReq>,
) -> ApiResult<SentimentResp> {
    // Missing or non-string text scores neutral.
    let result = state.pipeline.scorer().score(body.text.as_str())?;

    Ok(Json(SentimentResp {
        sentiment_score: result.score,
        sentiment_label: result.label,
    }))
}

#[derive(Serialize)]
struct BatchResp {
    comments: Vec<AnnotatedComment>,
    label_distribution: LabelDistribution,
    summary: SentimentSummary,
}

async fn sentiment_batch(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<BatchResp> {
    let comments = comments_from_value(body)?;
    let field = state.pipeline.config().text_field;
    let (annotated, label_distribution) =
        state.pipeline.scorer().score_corpus(&comments, field)?;
    let summary = SentimentScorer::summary(&annotated);

    debug::record_run("/sentiment/batch", comments.len(), label_distribution, Vec::new());
    Ok(Json(BatchResp {
        comments: annotated,
        label_distribution,
        summary,
    }))
}

#[derive(Deserialize)]
struct MineQuery {
    top_n: Option<usize>,
    field: Option<TextField>,
}

/// `MiningResult`, or `{}` when no comment has usable text.
async fn mine(
    State(state): State<AppState>,
    Query(q): Query<MineQuery>,
    Json(body): Json<Value>,
) -> ApiResult<Value> {
    let comments = comments_from_value(body)?;
    let cfg = state.pipeline.config();
    let result = state.pipeline.miner().mine(
        &comments,
        q.field.unwrap_or(cfg.text_field),
        q.top_n.unwrap_or(cfg.top_n),
    )?;
    let out = match result {
        Some(r) => serde_json::to_value(r).map_err(AnalyzerError::from)?,
        None => json!({}),
    };

    Ok(Json(out))
}

#[derive(Deserialize)]
struct TopicsQuery {
    min_count: Option<usize>,
    field: Option<TextField>,
}

async fn topics(
    State(state): State<AppState>,
    Query(q): Query<TopicsQuery>,
    Json(body): Json<Value>,
) -> ApiResult<Vec<HotTopic>> {
    let comments = comments_from_value(body)?;
    let cfg = state.pipeline.config();
    let topics = state.pipeline.miner().find_hot_topics(
        &comments,
        q.field.unwrap_or(cfg.text_field),
        q.min_count.unwrap_or(cfg.hot_topic_min_count),
    )?;

    Ok(Json(topics))
}

#[derive(Deserialize)]
struct KeywordsReq {
    #[serde(default)]
    text: String,
    top_k: Option<usize>,
}

async fn keywords(
    State(state): State<AppState>,
    Json(body): Json<KeywordsReq>,
) -> ApiResult<Vec<(String, f64)>> {
    let top_k = body.top_k.unwrap_or(state.pipeline.config().keyword_top_k);
    let kws = state.pipeline.miner().extract_keywords(&body.text, top_k)?;

    Ok(Json(kws))
}

async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<AnalysisReport> {
    let comments = comments_from_value(body)?;
    let report = state.pipeline.run(&comments)?;

    debug::record_run(
        "/analyze",
        report.stats.comment_count,
        report.label_distribution,
        report.hot_topics.iter().map(|t| t.keyword.clone()).collect(),
    );
    Ok(Json(report))
}
