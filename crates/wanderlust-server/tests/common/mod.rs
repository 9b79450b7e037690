#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use wanderlust_server::config::Config;
use wanderlust_server::db;
use wanderlust_server::models::Coordinates;
use wanderlust_server::routes::{create_router, AppState};
use wanderlust_server::services::places::{GeocodeError, Geocoder, Place, PlaceResolver};
use wanderlust_server::services::planner::providers::{ModelProvider, ProviderError};
use wanderlust_server::services::planner::Planner;
use wanderlust_server::ui::state::UiSessions;

/// Places the stub geocoder knows, matched case-insensitively by substring.
pub const KNOWN_PLACES: [(&str, f64, f64); 4] = [
    ("Goa, India", 15.2993, 74.1240),
    ("Mumbai, Maharashtra, India", 19.0760, 72.8777),
    ("Jaipur, Rajasthan, India", 26.9124, 75.7873),
    ("Paris, Île-de-France, France", 48.8566, 2.3522),
];

pub struct StubGeocoder;

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        _timeout: Duration,
    ) -> Result<Vec<Place>, GeocodeError> {
        let query = query.to_lowercase();
        Ok(KNOWN_PLACES
            .iter()
            .filter(|(name, _, _)| name.to_lowercase().contains(&query))
            .take(limit)
            .map(|(name, lat, lon)| Place {
                display_name: name.to_string(),
                coordinates: Some(Coordinates { lat: *lat, lon: *lon }),
            })
            .collect())
    }
}

/// Replies with a fixed text, or fails when `reply` is `None`.
pub struct CannedProvider {
    pub label: String,
    pub reply: Option<String>,
}

impl CannedProvider {
    pub fn replying(label: &str, reply: &str) -> Arc<dyn ModelProvider> {
        Arc::new(Self {
            label: label.to_string(),
            reply: Some(reply.to_string()),
        })
    }

    pub fn failing(label: &str) -> Arc<dyn ModelProvider> {
        Arc::new(Self {
            label: label.to_string(),
            reply: None,
        })
    }
}

#[async_trait]
impl ModelProvider for CannedProvider {
    fn label(&self) -> String {
        self.label.clone()
    }

    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.reply.clone().ok_or(ProviderError::Empty)
    }
}

pub fn test_config(sqlite_path: &str) -> Config {
    Config {
        server_port: 0,
        sqlite_path: sqlite_path.to_string(),
        google_api_key: None,
        gemini_api_url: "http://127.0.0.1:9".to_string(),
        gemini_models: Vec::new(),
        groq_api_key: None,
        groq_api_url: "http://127.0.0.1:9".to_string(),
        groq_model: "test".to_string(),
        nominatim_url: "http://127.0.0.1:9".to_string(),
        geocoder_user_agent: "wanderlust-tests".to_string(),
        cache_ttl_secs: 60,
        cors_origin: "http://localhost:8080".to_string(),
        secure_cookies: false,
        rate_limit: false,
    }
}

pub struct TestApp {
    pub router: Router,
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }

    /// `name=value` from a `Set-Cookie` header, ready for a `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with(&format!("{name}=")))
            .map(str::to_string)
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    /// No model providers: every itinerary is the offline one.
    pub fn new() -> Self {
        Self::with_providers(Vec::new())
    }

    pub fn with_providers(providers: Vec<Arc<dyn ModelProvider>>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wanderlust.db");
        let config = test_config(path.to_str().unwrap());

        let state = AppState {
            db: db::create_pool(&config.sqlite_path).unwrap(),
            planner: Arc::new(Planner::new(providers, Duration::from_secs(60))),
            places: Arc::new(PlaceResolver::new(
                Arc::new(StubGeocoder),
                Duration::from_secs(60),
            )),
            ui: UiSessions::default(),
            config,
        };

        Self {
            router: create_router(state),
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let resp = self.router.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8(body.to_vec()).unwrap(),
        }
    }

    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        payload: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match payload {
            Some(payload) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(payload.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.json("GET", uri, None, cookie).await
    }

    pub async fn form(&self, uri: &str, form: &str, cookie: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Registers `username` and returns the API session cookie.
    pub async fn register(&self, username: &str, password: &str) -> String {
        let resp = self
            .json(
                "POST",
                "/api/v1/auth/register",
                Some(serde_json::json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{}", resp.body);
        resp.cookie("wanderlust_session").unwrap()
    }
}
