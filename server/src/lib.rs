use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use docdex_core::load::load_index;
use docdex_core::lookup::{lookup_exact, lookup_term, TermHit};
use docdex_core::SearchIndex;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Deserialize)]
pub struct LookupParams {
    pub term: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Probe the term table verbatim, skipping folding.
    #[serde(default)]
    pub raw: bool,
}
fn default_limit() -> usize {
    50
}

#[derive(Serialize)]
pub struct LookupResponse {
    pub term: String,
    pub total_hits: usize,
    pub results: Vec<TermHit>,
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

#[derive(Clone)]
pub struct AppState {
    pub index_path: PathBuf,
    /// Swapped wholesale when the documentation is rebuilt; handlers clone
    /// the inner Arc out so lookups never hold the lock.
    pub index: Arc<RwLock<Arc<SearchIndex>>>,
    pub admin_token: Option<String>,
}

impl AppState {
    fn snapshot(&self) -> Arc<SearchIndex> {
        self.index.read().clone()
    }
}

pub fn build_app(index_path: String) -> Result<Router> {
    // Load the index at startup
    let index = load_index(&index_path)?;
    tracing::info!(
        num_docs = index.num_docs(),
        num_terms = index.terms.len(),
        "search index loaded"
    );
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let state = AppState {
        index_path: PathBuf::from(&index_path),
        index: Arc::new(RwLock::new(Arc::new(index))),
        admin_token,
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/lookup", get(lookup_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/meta", get(meta_handler))
        .route("/index/reload", post(reload_handler))
        .with_state(state)
        .layer(cors);
    Ok(app)
}

pub async fn lookup_handler(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<Json<LookupResponse>, ApiError> {
    let term = params.term.trim();
    if term.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "term must not be empty"));
    }
    let index = state.snapshot();
    let mut results = if params.raw {
        lookup_exact(&index, term)
    } else {
        lookup_term(&index, term)
    };
    let total_hits = results.len();
    let limit = params.limit.clamp(1, 500);
    results.truncate(limit);
    Ok(Json(LookupResponse {
        term: term.to_string(),
        total_hits,
        results,
    }))
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<u32>,
) -> Result<Json<Value>, ApiError> {
    let index = state.snapshot();
    match index.doc(doc_id) {
        Some(doc) => Ok(Json(json!({
            "doc_id": doc.doc_id,
            "title": doc.title,
            "url": doc.url,
        }))),
        None => Err(api_error(StatusCode::NOT_FOUND, "unknown document")),
    }
}

pub async fn meta_handler(State(state): State<AppState>) -> Json<Value> {
    let index = state.snapshot();
    let num_objects: usize = index.objects.values().map(Vec::len).sum();
    Json(json!({
        "num_docs": index.num_docs(),
        "num_terms": index.terms.len(),
        "num_titleterms": index.titleterms.len(),
        "num_objects": num_objects,
        "envversion": index.envversion,
    }))
}

/// The index's only lifecycle transition: the documentation was rebuilt
/// and the file on disk superseded. The new file is parsed fully before
/// the swap, so a bad build leaves the served index untouched.
pub async fn reload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    match load_index(&state.index_path) {
        Ok(new_index) => {
            let num_docs = new_index.num_docs();
            let num_terms = new_index.terms.len();
            *state.index.write() = Arc::new(new_index);
            tracing::info!(num_docs, num_terms, "search index reloaded");
            Ok(Json(json!({ "reloaded": true, "num_docs": num_docs })))
        }
        Err(e) => {
            tracing::error!(error = %e, "reload failed, keeping current index");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "reload failed, current index kept",
            ))
        }
    }
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err(api_error(StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set")),
    };
    let provided = headers
        .get("X-ADMIN-TOKEN")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err(api_error(StatusCode::UNAUTHORIZED, "invalid admin token"))
    }
}
