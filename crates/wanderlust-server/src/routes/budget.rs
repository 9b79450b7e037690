use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::Itinerary;
use crate::services::budget::{ActivityKey, BudgetSummary, BudgetTracker};

#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    pub itinerary: Itinerary,
    #[serde(default)]
    pub max_budget: Option<f64>,
    /// Activities switched off in the tracker.
    #[serde(default)]
    pub excluded: Vec<ActivityKey>,
}

pub async fn summarize(Json(body): Json<BudgetRequest>) -> AppResult<Json<BudgetSummary>> {
    if body.max_budget.is_some_and(|m| !m.is_finite() || m < 0.0) {
        return Err(AppError::BadRequest(
            "Maximum budget must be a positive amount".into(),
        ));
    }
    let tracker = BudgetTracker::from_excluded(body.excluded);
    Ok(Json(tracker.summarize(&body.itinerary, body.max_budget)))
}
