use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ModelGateway;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; nothing request-scoped lives here.
#[derive(Clone)]
pub struct AppState {
    /// Blocking model gateway. Only ever invoked from the blocking worker pool.
    pub gateway: Arc<dyn ModelGateway>,
    pub config: Config,
}
