//! Itinerary generation: an ordered chain of hosted models, then a
//! deterministic fallback.
//!
//! Providers are tried once each in priority order. The first reply that
//! yields an itinerary with at least one usable day wins; everything else
//! (network errors, auth failures, prose, JSON without `days`) moves on to the
//! next provider. The chain never fails.

pub mod extract;
pub mod fallback;
pub mod prompt;
pub mod providers;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::config::Config;
use crate::models::{Itinerary, TripRequest};
use crate::services::cache::TtlCache;
use providers::{GeminiProvider, GroqProvider, ModelProvider};

pub const FALLBACK_SOURCE: &str = "fallback";
const OFFLINE_ANSWER: &str =
    "I'm offline right now, but you can check the itinerary tabs for details!";

#[derive(Debug, Clone, Serialize)]
pub struct PlannedTrip {
    pub itinerary: Itinerary,
    /// Provider label, or `"fallback"`.
    pub source: String,
    pub cached: bool,
}

pub struct Planner {
    providers: Vec<Arc<dyn ModelProvider>>,
    cache: TtlCache<String, (Itinerary, String)>,
}

impl Planner {
    pub fn new(providers: Vec<Arc<dyn ModelProvider>>, cache_ttl: Duration) -> Self {
        Self {
            providers,
            cache: TtlCache::new(cache_ttl),
        }
    }

    /// Gemini models first (when a Google key is set), then Groq.
    pub fn from_config(config: &Config, http: reqwest::Client) -> Self {
        let mut providers: Vec<Arc<dyn ModelProvider>> = Vec::new();

        if let Some(key) = &config.google_api_key {
            for model in &config.gemini_models {
                providers.push(Arc::new(GeminiProvider::new(
                    http.clone(),
                    &config.gemini_api_url,
                    key,
                    model,
                )));
            }
        }
        if let Some(key) = &config.groq_api_key {
            providers.push(Arc::new(GroqProvider::new(
                http.clone(),
                &config.groq_api_url,
                key,
                &config.groq_model,
            )));
        }

        Self::new(providers, Duration::from_secs(config.cache_ttl_secs))
    }

    pub fn provider_labels(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.label()).collect()
    }

    pub async fn plan(&self, req: &TripRequest) -> PlannedTrip {
        let key = cache_key(req);
        if let Some((itinerary, source)) = key.as_ref().and_then(|k| self.cache.get(k)) {
            tracing::debug!("Itinerary for {} served from cache ({source})", req.destination);
            return PlannedTrip {
                itinerary,
                source,
                cached: true,
            };
        }

        let prompt = prompt::itinerary_prompt(req);
        for provider in &self.providers {
            let label = provider.label();
            let reply = match provider.complete(&prompt).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::warn!("{label} failed: {e}");
                    continue;
                }
            };

            let Some(itinerary) = extract::parse_itinerary(&reply)
                .and_then(|it| conform_days(it, &req.destination, req.duration_days))
            else {
                tracing::warn!("{label} reply had no usable itinerary");
                continue;
            };

            tracing::info!("Itinerary for {} generated by {label}", req.destination);
            if let Some(key) = key {
                self.cache.insert(key, (itinerary.clone(), label.clone()));
            }
            return PlannedTrip {
                itinerary,
                source: label,
                cached: false,
            };
        }

        tracing::info!("Using offline itinerary for {}", req.destination);
        PlannedTrip {
            itinerary: fallback::fallback_itinerary(
                &req.destination,
                req.duration_days,
                req.trip_type,
            ),
            source: FALLBACK_SOURCE.to_string(),
            cached: false,
        }
    }

    /// Free-text travel question answered by the first provider that replies.
    pub async fn ask(&self, itinerary: Option<&Itinerary>, question: &str) -> String {
        let prompt = prompt::question_prompt(itinerary, question);
        for provider in &self.providers {
            match provider.complete(&prompt).await {
                Ok(answer) => return answer.trim().to_string(),
                Err(e) => tracing::warn!("{} could not answer: {e}", provider.label()),
            }
        }
        OFFLINE_ANSWER.to_string()
    }
}

fn cache_key(req: &TripRequest) -> Option<String> {
    serde_json::to_string(req).ok()
}

/// Forces days to exactly `1..=duration`.
///
/// Out-of-range days are dropped, the first occurrence of a repeated day wins
/// and gaps are filled from the offline template. `None` if no model day
/// survives.
pub fn conform_days(mut itinerary: Itinerary, destination: &str, duration: u32) -> Option<Itinerary> {
    itinerary
        .days
        .retain(|d| (1..=duration).contains(&d.day_number));
    itinerary.days.sort_by_key(|d| d.day_number);
    itinerary.days.dedup_by_key(|d| d.day_number);

    if itinerary.days.is_empty() {
        return None;
    }

    if itinerary.days.len() < duration as usize {
        let mut days = std::mem::take(&mut itinerary.days).into_iter().peekable();
        let mut filled = Vec::with_capacity(duration as usize);
        for number in 1..=duration {
            match days.next_if(|d| d.day_number == number) {
                Some(day) => filled.push(day),
                None => filled.push(fallback::day_plan(destination.trim(), number, duration)),
            }
        }
        itinerary.days = filled;
    }

    Some(itinerary)
}
