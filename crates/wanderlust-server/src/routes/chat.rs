use axum::{
    extract::State,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Itinerary, User};
use crate::routes::AppState;
use crate::services::trip_store;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    /// Saved trip to ground the answer in.
    #[serde(default)]
    pub trip_id: Option<i64>,
    /// Unsaved itinerary; ignored when `trip_id` is given.
    #[serde(default)]
    pub itinerary: Option<Itinerary>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

pub async fn ask(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let question = body.question.trim();
    if question.is_empty() {
        return Err(AppError::BadRequest("Question is required".into()));
    }

    let itinerary = match body.trip_id {
        Some(id) => Some(trip_store::get_trip(&state.db, &user.username, id)?.itinerary),
        None => body.itinerary,
    };

    let answer = state.planner.ask(itinerary.as_ref(), question).await;
    Ok(Json(ChatResponse { answer }))
}
