use std::sync::Arc;

use crate::config::Config;
use crate::engine::MatchEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Vocabulary and weight tables, built once at startup and read-only afterwards.
    pub engine: Arc<MatchEngine>,
}
