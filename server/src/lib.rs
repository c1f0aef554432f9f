use algosearch_core::{Bm25Params, IndexError, Ranker, SearchEngine, SearchHit};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const ADMIN_HEADER: &str = "X-ADMIN-TOKEN";

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default = "default_top_k")]
    pub top_k: i64,
    pub k1: Option<f64>,
    pub b: Option<f64>,
}
fn default_method() -> String { "bm25".into() }
fn default_top_k() -> i64 { 20 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub method: &'static str,
    pub took_s: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SearchHit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tfidf: Option<Vec<SearchHit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bm25: Option<Vec<SearchHit>>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub admin_token: Option<String>,
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": msg.into() })))
}

/// Comma-separated origins from `CORS_ALLOW_ORIGIN`; any origin when unset or unparsable.
fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = allow_origin
        .map(|v| v.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Build the router around an engine constructed once by the caller.
pub fn build_app_with(engine: Arc<SearchEngine>, admin_token: Option<String>) -> Router {
    let cors = cors_layer(std::env::var("CORS_ALLOW_ORIGIN").ok().as_deref());
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/index/reload", post(reload_handler))
        .with_state(AppState { engine, admin_token })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Lowercase and whitespace-split the raw query.
fn query_terms(q: &str) -> Vec<String> {
    q.split_whitespace().map(str::to_lowercase).collect()
}

fn bm25_params(engine: &SearchEngine, params: &SearchParams) -> Result<Bm25Params, ApiError> {
    let defaults = engine.bm25_params();
    Bm25Params::new(params.k1.unwrap_or(defaults.k1), params.b.unwrap_or(defaults.b))
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing query parameter 'q'"));
    }
    let terms = query_terms(&query);
    let top_k = usize::try_from(params.top_k).unwrap_or(0);
    let engine = &state.engine;

    let mut resp =
        SearchResponse { query, method: "", took_s: 0.0, results: None, tfidf: None, bm25: None };
    match params.method.as_str() {
        "tfidf" => {
            resp.method = "tfidf";
            resp.results = Some(engine.tfidf().rank(&terms, top_k));
        }
        "bm25" => {
            let bm25 = bm25_params(engine, &params)?;
            resp.method = "bm25";
            resp.results = Some(engine.bm25_with(bm25).rank(&terms, top_k));
        }
        "compare" => {
            let bm25 = bm25_params(engine, &params)?;
            resp.method = "compare";
            resp.tfidf = Some(engine.tfidf().rank(&terms, top_k));
            resp.bm25 = Some(engine.bm25_with(bm25).rank(&terms, top_k));
        }
        other => {
            return Err(api_error(StatusCode::BAD_REQUEST, format!("Unknown method: {other}")))
        }
    }
    resp.took_s = start.elapsed().as_secs_f64();
    tracing::debug!(
        query = %resp.query,
        method = resp.method,
        took_s = resp.took_s,
        "search served"
    );
    Ok(Json(resp))
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<u32>,
) -> Result<Json<Value>, ApiError> {
    let generation = state.engine.generation();
    let doc = generation
        .document(doc_id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "not found"))?;
    Ok(Json(json!({
        "doc_id": doc_id,
        "title": doc.title,
        "url": doc.url,
        "source": doc.source,
        "tokens": doc.tokens,
        "length": doc.length,
    })))
}

async fn reload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    authorize(state.admin_token.as_deref(), &headers)?;
    let engine = state.engine.clone();
    let previous = tokio::task::spawn_blocking(move || engine.reload())
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e: IndexError| {
            tracing::error!(error = %e, "index reload failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
        })?;
    let meta = *state.engine.generation().meta();
    Ok(Json(json!({
        "previous_total_docs": previous.meta().total_docs,
        "meta": meta,
    })))
}

/// Admin routes need `ADMIN_TOKEN` configured and echoed in the admin header.
fn authorize(expected: Option<&str>, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = expected else {
        return Err(api_error(StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set"));
    };
    match headers.get(ADMIN_HEADER).map(HeaderValue::to_str) {
        Some(Ok(provided)) if provided == expected => Ok(()),
        _ => Err(api_error(StatusCode::UNAUTHORIZED, "invalid admin token")),
    }
}
