//! Model listing endpoint

use axum::extract::State;

use super::state::AppState;
use super::types::{ApiError, Json, ModelsResponse};

/// GET /models - candidate keys in registry order
pub async fn list_models(State(state): State<AppState>) -> Result<Json<ModelsResponse>, ApiError> {
    let descriptors = state.registry().list()?;
    Ok(Json(ModelsResponse::from_descriptors(&descriptors)))
}
