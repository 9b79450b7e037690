use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use wanderlust_server::config::Config;
use wanderlust_server::db;
use wanderlust_server::routes::{create_router, AppState};
use wanderlust_server::services::places::{NominatimGeocoder, PlaceResolver};
use wanderlust_server::services::planner::Planner;
use wanderlust_server::ui::state::UiSessions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (from repo root)
    dotenvy::from_filename("../../.env").ok();
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wanderlust_server=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env();
    let port = config.server_port;

    let pool = db::create_pool(&config.sqlite_path)
        .with_context(|| format!("opening trip store {}", config.sqlite_path))?;
    tracing::info!("Database initialized at {}", config.sqlite_path);

    let http = reqwest::Client::builder()
        .user_agent(config.geocoder_user_agent.clone())
        .build()
        .context("building HTTP client")?;

    let planner = Planner::from_config(&config, http.clone());
    let labels = planner.provider_labels();
    if labels.is_empty() {
        tracing::warn!("No model API keys configured; every itinerary will be the offline one");
    } else {
        tracing::info!("Itinerary providers: {}", labels.join(" -> "));
    }

    let ttl = Duration::from_secs(config.cache_ttl_secs);
    let geocoder = NominatimGeocoder::new(http, &config.nominatim_url, &config.geocoder_user_agent);
    let places = PlaceResolver::new(Arc::new(geocoder), ttl);

    let state = AppState {
        db: pool,
        config: config.clone(),
        planner: Arc::new(planner),
        places: Arc::new(places),
        ui: UiSessions::default(),
    };

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .context("CORS_ORIGIN is not a valid header value")?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::COOKIE])
        .allow_credentials(true);

    let app = create_router(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("wanderlust-server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    // Rate limiting keys on the peer address.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server failed")?;

    Ok(())
}
