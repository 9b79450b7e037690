//! Place lookup against a Nominatim-compatible geocoder.
//!
//! Every failure (timeout, no match, bad payload) degrades to an empty
//! result. Callers treat "no suggestions" as a normal outcome.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::Coordinates;
use crate::services::cache::TtlCache;

const MIN_QUERY_CHARS: usize = 3;
const SUGGESTION_LIMIT: usize = 5;
const SUGGEST_TIMEOUT: Duration = Duration::from_secs(2);
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub display_name: String,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoder returned {0}")]
    Status(reqwest::StatusCode),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        timeout: Duration,
    ) -> Result<Vec<Place>, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    lat: Option<String>,
    #[serde(default)]
    lon: Option<String>,
}

impl From<NominatimPlace> for Place {
    fn from(p: NominatimPlace) -> Self {
        let coordinates = match (p.lat, p.lon) {
            (Some(lat), Some(lon)) => match (lat.parse(), lon.parse()) {
                (Ok(lat), Ok(lon)) => Some(Coordinates { lat, lon }),
                _ => None,
            },
            _ => None,
        };
        Place {
            display_name: p.display_name,
            coordinates,
        }
    }
}

pub struct NominatimGeocoder {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl NominatimGeocoder {
    pub fn new(http: reqwest::Client, base_url: &str, user_agent: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        timeout: Duration,
    ) -> Result<Vec<Place>, GeocodeError> {
        let limit = limit.to_string();
        let resp = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
            ])
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .timeout(timeout)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(GeocodeError::Status(resp.status()));
        }

        let places: Vec<NominatimPlace> = resp.json().await?;
        Ok(places.into_iter().map(Place::from).collect())
    }
}

/// Cached front of a [`Geocoder`]: autocomplete suggestions and coordinates.
pub struct PlaceResolver {
    geocoder: Arc<dyn Geocoder>,
    suggestions: TtlCache<String, Vec<String>>,
    coordinates: TtlCache<String, Option<Coordinates>>,
}

impl PlaceResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, ttl: Duration) -> Self {
        Self {
            geocoder,
            suggestions: TtlCache::new(ttl),
            coordinates: TtlCache::new(ttl),
        }
    }

    /// Up to five display names for autocomplete.
    pub async fn suggest(&self, input: &str) -> Vec<String> {
        if input.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }
        let key = input.to_string();
        if let Some(cached) = self.suggestions.get(&key) {
            return cached;
        }

        let names: Vec<String> = match self
            .geocoder
            .search(input, SUGGESTION_LIMIT, SUGGEST_TIMEOUT)
            .await
        {
            Ok(places) => places
                .into_iter()
                .map(|p| p.display_name)
                .filter(|n| !n.is_empty())
                .take(SUGGESTION_LIMIT)
                .collect(),
            Err(e) => {
                // Not cached, so the next keystroke retries.
                tracing::debug!("Place suggestions for {input:?} failed: {e}");
                return Vec::new();
            }
        };

        self.suggestions.insert(key, names.clone());
        names
    }

    pub async fn coordinates(&self, place_name: &str) -> Option<Coordinates> {
        if place_name.trim().is_empty() {
            return None;
        }
        let key = place_name.to_string();
        if let Some(cached) = self.coordinates.get(&key) {
            return cached;
        }

        let found = match self.geocoder.search(place_name, 1, LOOKUP_TIMEOUT).await {
            Ok(places) => places.into_iter().find_map(|p| p.coordinates),
            Err(e) => {
                tracing::debug!("Geocoding {place_name:?} failed: {e}");
                return None;
            }
        };

        if found.is_none() {
            tracing::debug!("No coordinates for {place_name:?}");
        }
        self.coordinates.insert(key, found);
        found
    }
}
