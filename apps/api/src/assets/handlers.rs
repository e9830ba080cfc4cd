use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::assets::BackgroundArt;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssetRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct AssetResponse {
    /// Absent when generation failed.
    pub data_uri: Option<String>,
}

/// POST /api/v1/assets
pub async fn handle_generate_asset(
    State(state): State<AppState>,
    Json(request): Json<AssetRequest>,
) -> Result<Json<AssetResponse>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }
    let data_uri = state.assets.generate_comic_asset(request.prompt.trim()).await;
    Ok(Json(AssetResponse { data_uri }))
}

/// GET /api/v1/assets/background
pub async fn handle_background(State(state): State<AppState>) -> Json<BackgroundArt> {
    Json(state.background.load().await)
}
