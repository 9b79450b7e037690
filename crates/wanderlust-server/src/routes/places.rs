use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::LogisticsEstimate;
use crate::routes::AppState;
use crate::services::logistics;

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct LogisticsQuery {
    pub origin: String,
    pub destination: String,
}

/// Autocomplete names; empty for short input or when the geocoder is down.
pub async fn suggest(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Json<Vec<String>> {
    Json(state.places.suggest(query.q.trim()).await)
}

pub async fn logistics(
    State(state): State<AppState>,
    Query(query): Query<LogisticsQuery>,
) -> AppResult<Json<LogisticsEstimate>> {
    let origin = query.origin.trim();
    let destination = query.destination.trim();
    if origin.is_empty() || destination.is_empty() {
        return Err(AppError::BadRequest(
            "Origin and destination are required".into(),
        ));
    }

    logistics::estimate_trip(&state.places, origin, destination)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Could not locate both places".into()))
}
