use serde::Serialize;

use crate::models::{Coordinates, Itinerary};

const WORLD_CENTER: [f64; 2] = [20.0, 0.0];
const WORLD_ZOOM: u8 = 2;
const CITY_ZOOM: u8 = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

/// What the results page needs to draw the route map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

/// `"15.55, 73.75"` style locations. Plain area names do not parse.
pub fn parse_lat_lon(location: &str) -> Option<Coordinates> {
    let (lat, lon) = location.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }
    Some(Coordinates { lat, lon })
}

/// Markers for every activity with coordinates; otherwise the destination pin;
/// otherwise a world view.
pub fn build_map(itinerary: &Itinerary, destination: Option<Coordinates>) -> MapView {
    let mut markers: Vec<MapMarker> = itinerary
        .days
        .iter()
        .flat_map(|day| {
            day.activities.iter().filter_map(move |activity| {
                parse_lat_lon(&activity.location).map(|c| MapMarker {
                    lat: c.lat,
                    lon: c.lon,
                    label: format!("Day {}: {}", day.day_number, activity.title),
                })
            })
        })
        .collect();

    if markers.is_empty() {
        if let Some(c) = destination {
            markers.push(MapMarker {
                lat: c.lat,
                lon: c.lon,
                label: itinerary.title.clone(),
            });
        }
    }

    if markers.is_empty() {
        return MapView {
            center: WORLD_CENTER,
            zoom: WORLD_ZOOM,
            markers,
        };
    }

    let n = markers.len() as f64;
    let lat = markers.iter().map(|m| m.lat).sum::<f64>() / n;
    let lon = markers.iter().map(|m| m.lon).sum::<f64>() / n;
    MapView {
        center: [lat, lon],
        zoom: CITY_ZOOM,
        markers,
    }
}
