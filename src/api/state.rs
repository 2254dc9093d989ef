use std::sync::Arc;

use crate::services::RecommendationService;

/// Shared application state
///
/// The service and its adapters are long-lived clients initialized once at
/// startup and injected here, so tests can assemble the state with
/// substitute adapters.
#[derive(Clone)]
pub struct AppState {
    pub recommendations: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(recommendations: Arc<RecommendationService>) -> Self {
        Self { recommendations }
    }
}
