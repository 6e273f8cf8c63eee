use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{identity::Caller, AppState};
use crate::{
    error::{AppError, AppResult},
    models::MediaFile,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub count: Option<u32>,
    pub artist_type: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Recommended songs for the calling user, ready to be queued
pub async fn get_recommendations(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<MediaFile>>> {
    let count = params.count.unwrap_or(state.defaults.count);
    if count == 0 {
        return Err(AppError::InvalidInput(
            "count must be a positive integer".to_string(),
        ));
    }

    let artist_type = params
        .artist_type
        .unwrap_or_else(|| state.defaults.artist_type.clone());

    let folders = state.media.visible_folders(&caller.username).await?;

    let songs = state
        .recommendations
        .get_recommended_songs(count, &artist_type, &caller.username, &folders)
        .await;

    Ok(Json(songs))
}
