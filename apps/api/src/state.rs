use std::sync::Arc;

use crate::config::Config;
use crate::matching::matcher::JobMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Immutable after startup; every request scores against the same weights.
    pub matcher: Arc<JobMatcher>,
}
