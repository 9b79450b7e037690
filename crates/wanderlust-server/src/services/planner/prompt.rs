use crate::models::{Itinerary, TripRequest};

const OUTPUT_SCHEMA: &str = r#"{
    "trip_title": "Title",
    "travel_persona": "Persona",
    "total_estimated_cost": "₹XXXX",
    "days": [
        {
            "day": 1,
            "activities": [
                {"time": "09:00", "activity": "Name", "description": "Desc", "location": "Area", "cost": "₹XXX"}
            ]
        }
    ],
    "hotel_recommendations": [
        {"name": "Name", "location": "Area", "rating": "4.5", "price_per_night": "₹XXX"}
    ],
    "dining_recommendations": [
        {"name": "Name", "type": "Cuisine", "location": "Area", "price": "₹XXX"}
    ],
    "safety_tips": "Tip"
}"#;

pub fn itinerary_prompt(req: &TripRequest) -> String {
    let duration = req.duration_days;
    let interests = if req.interests.is_empty() {
        "General sightseeing".to_string()
    } else {
        req.interests.iter().cloned().collect::<Vec<_>>().join(", ")
    };
    let origin = req
        .origin()
        .map(|o| format!(" Travelling from {o}."))
        .unwrap_or_default();

    format!(
        "ROLE: Expert Travel Planner. TASK: {duration}-Day Trip to {destination} for {travelers} traveller(s) ({trip_type}).{origin}
START DATE: {start}.
BUDGET: {tier} (Cap: ₹{cap:.0}). Interests: {interests}.

RULES:
1. PRICES: ₹Amount.
2. TOTAL GROUP COST: If {travelers} people, show the total for {travelers}.
3. FULL SCHEDULE: Day 1 to Day {duration} (NO REPEATING DAYS).
4. STRICT JSON.

OUTPUT JSON:
{OUTPUT_SCHEMA}
",
        destination = req.destination.trim(),
        travelers = req.traveler_count,
        trip_type = req.trip_type,
        start = req.start_date.format("%Y-%m-%d"),
        tier = req.budget_tier.label(),
        cap = req.max_budget,
    )
}

/// Question for the travel bot, grounded in the itinerary on screen.
pub fn question_prompt(itinerary: Option<&Itinerary>, question: &str) -> String {
    let context = itinerary
        .and_then(|i| serde_json::to_string(i).ok())
        .unwrap_or_else(|| "No itinerary yet.".to_string());
    format!(
        "You are a friendly travel assistant. Answer briefly and practically.\nContext: {context}\nQuestion: {question}"
    )
}
