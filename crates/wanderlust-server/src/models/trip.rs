use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

pub const MAX_TRIP_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    #[serde(alias = "Cheap", alias = "budget", alias = "Budget")]
    Cheap,
    #[serde(alias = "Mid", alias = "mid-range", alias = "Mid-Range")]
    Mid,
    #[serde(alias = "Lux", alias = "luxury", alias = "Luxury")]
    Lux,
}

impl BudgetTier {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetTier::Cheap => "Budget",
            BudgetTier::Mid => "Mid-Range",
            BudgetTier::Lux => "Luxury",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    #[serde(alias = "Solo")]
    Solo,
    #[serde(alias = "Couple")]
    Couple,
    #[serde(alias = "Family")]
    Family,
    #[serde(alias = "Friends")]
    Friends,
    #[serde(alias = "Business")]
    Business,
}

impl TripType {
    pub const ALL: [TripType; 5] = [
        TripType::Solo,
        TripType::Couple,
        TripType::Family,
        TripType::Friends,
        TripType::Business,
    ];
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TripType::Solo => "Solo",
            TripType::Couple => "Couple",
            TripType::Family => "Family",
            TripType::Friends => "Friends",
            TripType::Business => "Business",
        };
        f.write_str(name)
    }
}

/// Parameters collected from the plan form. Never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub destination: String,
    #[serde(default)]
    pub origin: Option<String>,
    pub start_date: NaiveDate,
    pub duration_days: u32,
    pub budget_tier: BudgetTier,
    pub max_budget: f64,
    pub traveler_count: u32,
    pub trip_type: TripType,
    #[serde(default)]
    pub interests: BTreeSet<String>,
}

impl TripRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.destination.trim().is_empty() {
            return Err(AppError::BadRequest("Destination is required".into()));
        }
        if self.duration_days < 1 || self.duration_days > MAX_TRIP_DAYS {
            return Err(AppError::BadRequest(format!(
                "Duration must be between 1 and {MAX_TRIP_DAYS} days"
            )));
        }
        if self.traveler_count < 1 {
            return Err(AppError::BadRequest("At least one traveler is required".into()));
        }
        if !self.max_budget.is_finite() || self.max_budget < 0.0 {
            return Err(AppError::BadRequest("Maximum budget must be a positive amount".into()));
        }
        Ok(())
    }

    /// Origin with blank input treated as absent.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref().map(str::trim).filter(|o| !o.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(rename = "trip_title", default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(rename = "travel_persona", default, deserialize_with = "lenient_string")]
    pub persona: String,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub total_estimated_cost: Option<String>,
    #[serde(default)]
    pub days: Vec<DayPlan>,
    #[serde(default)]
    pub hotel_recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub dining_recommendations: Vec<Recommendation>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub safety_tips: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    #[serde(rename = "day", deserialize_with = "lenient_day")]
    pub day_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub daily_total: Option<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
    #[serde(rename = "activity", default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    /// Free text such as `"₹1,500 ($18)"`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub cost: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RecommendationRepr")]
pub struct Recommendation {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_night: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Recommendation {
    /// Nightly price for hotels, plain price otherwise.
    pub fn display_price(&self) -> Option<&str> {
        self.price_per_night.as_deref().or(self.price.as_deref())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecommendationRepr {
    Name(String),
    Detailed(RecommendationFields),
}

#[derive(Deserialize)]
struct RecommendationFields {
    #[serde(default, deserialize_with = "lenient_string")]
    name: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    price: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    price_per_night: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    rating: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_opt_string")]
    kind: Option<String>,
}

impl From<RecommendationRepr> for Recommendation {
    fn from(repr: RecommendationRepr) -> Self {
        match repr {
            RecommendationRepr::Name(name) => Recommendation {
                name,
                ..Default::default()
            },
            RecommendationRepr::Detailed(f) => Recommendation {
                name: f.name,
                location: f.location,
                price: f.price,
                price_per_night: f.price_per_night,
                rating: f.rating,
                kind: f.kind,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Flight,
    Train,
    Bus,
    Car,
}

impl TransportMode {
    pub const ALL: [TransportMode; 4] = [
        TransportMode::Flight,
        TransportMode::Train,
        TransportMode::Bus,
        TransportMode::Car,
    ];
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportMode::Flight => "Flight",
            TransportMode::Train => "Train",
            TransportMode::Bus => "Bus",
            TransportMode::Car => "Car",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeCost {
    pub inr: u64,
    pub usd: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsEstimate {
    pub distance_km: u64,
    pub costs: BTreeMap<TransportMode, ModeCost>,
    pub times: BTreeMap<TransportMode, String>,
}

// Model output is loosely typed: numbers show up where strings are expected
// and the other way round.

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn lenient_day<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| D::Error::custom(format!("invalid day number {n}"))),
        Value::String(s) => s
            .trim()
            .trim_start_matches("Day")
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid day number {s:?}"))),
        other => Err(D::Error::custom(format!("invalid day number {other}"))),
    }
}
