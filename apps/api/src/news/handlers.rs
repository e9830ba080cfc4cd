use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::news::NewsResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    #[serde(default)]
    pub refresh: bool,
}

/// GET /api/v1/news?refresh=true
pub async fn handle_get_news(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> Result<Json<NewsResponse>, AppError> {
    Ok(Json(state.news.get_latest_news(params.refresh).await?))
}
