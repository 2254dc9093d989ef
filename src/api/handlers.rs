use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::middleware::AuthenticatedUser;
use crate::models::RecommendationSet;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: RecommendationSet,
    /// Whether the set was served from cache or freshly computed.
    pub cached: bool,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Personalized recommendations for the authenticated user
pub async fn get_recommendations(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> AppResult<Json<RecommendationsResponse>> {
    let (recommendations, cached) = state.recommendations.get_recommendations(&identity).await?;

    Ok(Json(RecommendationsResponse {
        recommendations,
        cached,
    }))
}
