pub mod health;
pub mod matching;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Room for the non-file multipart fields and large JSON candidate lists.
const BODY_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + BODY_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/documents/extract",
            post(matching::handle_extract),
        )
        .route("/api/v1/rank", post(matching::handle_rank))
        .route("/api/v1/match-jobs", post(matching::handle_match_jobs))
        .route("/api/v1/search-jobs", post(matching::handle_search_jobs))
        .route(
            "/api/v1/find-candidates",
            post(matching::handle_find_candidates),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
