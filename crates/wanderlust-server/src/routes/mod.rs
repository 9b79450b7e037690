mod auth;
mod budget;
mod chat;
mod pages;
mod places;
mod trips;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use crate::auth::middleware::require_auth;
use crate::config::Config;
use crate::db::DbPool;
use crate::services::places::PlaceResolver;
use crate::services::planner::Planner;
use crate::ui::state::UiSessions;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub planner: Arc<Planner>,
    pub places: Arc<PlaceResolver>,
    pub ui: UiSessions,
}

async fn health() -> &'static str {
    "ok"
}

pub fn create_router(state: AppState) -> Router {
    // Health checks, never rate limited
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/api/v1/health", get(health));

    let mut auth_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout));

    // Geocoding lookups, open to the autocomplete script
    let mut public_routes = Router::new()
        .route("/api/v1/places/suggest", get(places::suggest))
        .route("/api/v1/logistics", get(places::logistics));

    let mut protected = Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        // Itineraries and history
        .route("/api/v1/itineraries", post(trips::generate))
        .route("/api/v1/trips", get(trips::list))
        .route("/api/v1/trips/{id}", get(trips::get))
        .route("/api/v1/trips/{id}/notes", put(trips::update_notes))
        // Budget + travel bot
        .route("/api/v1/budget", post(budget::summarize))
        .route("/api/v1/chat", post(chat::ask))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let mut page_routes = Router::new()
        .route("/", get(pages::index))
        .route("/enter", post(pages::enter))
        .route("/login", get(pages::login_page).post(pages::login))
        .route("/signup", post(pages::signup))
        .route("/logout", post(pages::logout))
        .route("/plan", post(pages::plan))
        .route("/activities/toggle", post(pages::toggle_activity))
        .route("/ask", post(pages::ask))
        .route("/history/{id}/load", post(pages::load_trip))
        .route("/history/{id}/notes", post(pages::save_note));

    if state.config.rate_limit {
        // Auth: 10 requests per 60 seconds per IP
        if let Some(governor) = GovernorConfigBuilder::default()
            .per_second(6)
            .burst_size(10)
            .finish()
        {
            auth_routes = auth_routes.layer(GovernorLayer::new(Arc::new(governor)));
        }
        // Pages and autocomplete: every click or keystroke is a request
        if let Some(governor) = GovernorConfigBuilder::default()
            .per_second(1)
            .burst_size(60)
            .finish()
        {
            let governor = Arc::new(governor);
            public_routes = public_routes.layer(GovernorLayer::new(governor.clone()));
            page_routes = page_routes.layer(GovernorLayer::new(governor));
        }
        // Protected API: 120 requests per 60 seconds per IP
        if let Some(governor) = GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(120)
            .finish()
        {
            protected = protected.layer(GovernorLayer::new(Arc::new(governor)));
        }
    }

    Router::new()
        .merge(health_routes)
        .merge(auth_routes)
        .merge(public_routes)
        .merge(protected)
        .merge(page_routes)
        .with_state(state)
}
