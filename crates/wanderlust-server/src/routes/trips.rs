use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::{LogisticsEstimate, TripRecord, TripRequest, User};
use crate::routes::AppState;
use crate::services::{logistics, trip_store};

#[derive(Debug, Serialize)]
pub struct GeneratedTrip {
    pub trip: TripRecord,
    pub source: String,
    pub cached: bool,
    pub logistics: Option<LogisticsEstimate>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNotesRequest {
    pub notes: String,
}

/// Plans, estimates travel from the origin (if any) and saves to history.
pub async fn generate(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<TripRequest>,
) -> AppResult<(StatusCode, Json<GeneratedTrip>)> {
    req.validate()?;
    let destination = req.destination.trim();

    let planned = state.planner.plan(&req).await;
    let logistics = match req.origin() {
        Some(origin) => logistics::estimate_trip(&state.places, origin, destination).await,
        None => None,
    };

    let trip = trip_store::save_trip(&state.db, &user.username, destination, &planned.itinerary)?;
    tracing::info!(
        "Trip {} to {destination} saved for {} ({})",
        trip.id,
        user.username,
        planned.source
    );

    Ok((
        StatusCode::CREATED,
        Json(GeneratedTrip {
            trip,
            source: planned.source,
            cached: planned.cached,
            logistics,
        }),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<Vec<TripRecord>>> {
    Ok(Json(trip_store::list_trips(&state.db, &user.username)?))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> AppResult<Json<TripRecord>> {
    Ok(Json(trip_store::get_trip(&state.db, &user.username, id)?))
}

pub async fn update_notes(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateNotesRequest>,
) -> AppResult<Json<TripRecord>> {
    trip_store::update_note(&state.db, &user.username, id, &body.notes)?;
    Ok(Json(trip_store::get_trip(&state.db, &user.username, id)?))
}
