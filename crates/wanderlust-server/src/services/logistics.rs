use std::collections::BTreeMap;

use crate::models::{Coordinates, LogisticsEstimate, ModeCost, TransportMode};
use crate::services::places::PlaceResolver;

const EARTH_RADIUS_KM: f64 = 6371.0088;
const INR_PER_USD: u64 = 84;

/// Great-circle distance in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Base fee plus per-km rate, in rupees.
fn mode_cost_inr(mode: TransportMode, distance_km: u64) -> u64 {
    match mode {
        TransportMode::Flight => 4000 + distance_km * 10,
        TransportMode::Train => 500 + distance_km * 2,
        TransportMode::Bus => 300 + distance_km * 3,
        TransportMode::Car => 2000 + distance_km * 12,
    }
}

fn mode_hours(mode: TransportMode, distance_km: u64) -> u64 {
    match mode {
        // 2h of airport overhead on top of cruise time
        TransportMode::Flight => (distance_km / 800 + 2).max(1),
        TransportMode::Train => (distance_km / 70).max(1),
        TransportMode::Bus => (distance_km / 50).max(1),
        TransportMode::Car => distance_km / 60,
    }
}

pub fn estimate_for_distance(distance_km: u64) -> LogisticsEstimate {
    let mut costs = BTreeMap::new();
    let mut times = BTreeMap::new();

    for mode in TransportMode::ALL {
        let inr = mode_cost_inr(mode, distance_km);
        costs.insert(
            mode,
            ModeCost {
                inr,
                usd: inr / INR_PER_USD,
            },
        );
        times.insert(mode, format!("{}h", mode_hours(mode, distance_km)));
    }

    LogisticsEstimate {
        distance_km,
        costs,
        times,
    }
}

pub fn estimate_between(from: Coordinates, to: Coordinates) -> LogisticsEstimate {
    estimate_for_distance(haversine_km(from, to) as u64)
}

/// Resolves both places; `None` unless both resolve.
pub async fn estimate_trip(
    places: &PlaceResolver,
    origin: &str,
    destination: &str,
) -> Option<LogisticsEstimate> {
    let from = places.coordinates(origin).await?;
    let to = places.coordinates(destination).await?;

    let estimate = estimate_between(from, to);
    tracing::debug!(
        "Logistics {origin} -> {destination}: {} km",
        estimate.distance_km
    );
    Some(estimate)
}
