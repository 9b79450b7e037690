//! Browser UI. Every POST mutates the caller's `UiState` and redirects back to
//! `/`, which renders whichever page that state is on.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::{CookieJar, Form as MultiForm, FormRejection};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::TripRequest;
use crate::routes::AppState;
use crate::services::budget::ActivityKey;
use crate::services::map::build_map;
use crate::services::planner::FALLBACK_SOURCE;
use crate::services::{logistics, trip_store};
use crate::ui::pages;
use crate::ui::state::{Flash, Page, TripView};

pub const UI_COOKIE: &str = "wanderlust_ui";
const HISTORY_SOURCE: &str = "history";

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub day: u32,
    pub index: usize,
    /// Present only when the checkbox is ticked.
    #[serde(default)]
    pub included: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AskForm {
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub note: String,
}

/// Browser id from the UI cookie. Ids this server did not mint, or that have
/// gone idle, are replaced with a fresh one.
async fn ui_session(state: &AppState, jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(UI_COOKIE) {
        let id = cookie.value().to_string();
        if state.ui.contains(&id).await {
            return (jar, id);
        }
    }
    let id = state.ui.mint().await;
    let secure = state.config.secure_cookies;
    let cookie = Cookie::build((UI_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), id)
}

fn back_home(jar: CookieJar) -> Response {
    (jar, Redirect::to("/")).into_response()
}

/// The page's wording for a failed login or sign-up.
fn auth_failure(err: &AppError) -> String {
    match err {
        AppError::Unauthorized => "Invalid username or password".to_string(),
        other => other.public_message(),
    }
}

pub async fn index(State(state): State<AppState>, jar: CookieJar) -> AppResult<Response> {
    let (jar, id) = ui_session(&state, jar).await;
    let ui = state.ui.load(&id).await;

    let html = match (ui.page, ui.active_user.as_deref()) {
        (Page::Splash, _) => pages::splash(&ui),
        (Page::Home, Some(username)) => {
            let records = trip_store::list_trips(&state.db, username)?;
            pages::home(&ui, &records, chrono::Utc::now().date_naive())
        }
        (Page::Login, _) | (Page::Home, None) => pages::login(&ui),
    };

    // Flash messages show once.
    if ui.flash.is_some() {
        state.ui.update(&id, |ui| ui.take_flash()).await;
    }
    Ok((jar, Html(html)).into_response())
}

pub async fn login_page(State(state): State<AppState>, jar: CookieJar) -> AppResult<Response> {
    let (jar, id) = ui_session(&state, jar).await;
    state.ui.update(&id, |ui| ui.open_login()).await;
    index(State(state), jar).await
}

pub async fn enter(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, id) = ui_session(&state, jar).await;
    state.ui.update(&id, |ui| ui.open_login()).await;
    back_home(jar)
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let (jar, id) = ui_session(&state, jar).await;
    let result = trip_store::verify_credentials(&state.db, &form.username, &form.password);

    state
        .ui
        .update(&id, |ui| match &result {
            Ok(user) => ui.log_in(&user.username),
            Err(e) => {
                ui.page = Page::Login;
                ui.flash = Some(Flash::Error(auth_failure(e)));
            }
        })
        .await;
    if let Err(e) = result {
        tracing::debug!("Login failed for {:?}: {e}", form.username);
    }
    back_home(jar)
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let (jar, id) = ui_session(&state, jar).await;
    let result = trip_store::create_account(&state.db, &form.username, &form.password);

    state
        .ui
        .update(&id, |ui| match &result {
            Ok(user) => ui.log_in(&user.username),
            Err(e) => {
                ui.page = Page::Login;
                ui.flash = Some(Flash::Error(auth_failure(e)));
            }
        })
        .await;
    back_home(jar)
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, id) = ui_session(&state, jar).await;
    state.ui.update(&id, |ui| ui.log_out()).await;
    back_home(jar)
}

pub async fn plan(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<MultiForm<TripRequest>, FormRejection>,
) -> Response {
    let (jar, id) = ui_session(&state, jar).await;
    let Some(username) = state.ui.load(&id).await.active_user else {
        return back_home(jar);
    };

    let req = match form {
        Ok(MultiForm(req)) => req,
        Err(e) => {
            tracing::debug!("Rejected plan form: {e}");
            let msg = "Please fill in every field of the plan form".to_string();
            state.ui.update(&id, |ui| ui.flash = Some(Flash::Error(msg))).await;
            return back_home(jar);
        }
    };
    if let Err(e) = req.validate() {
        state
            .ui
            .update(&id, |ui| ui.flash = Some(Flash::Error(e.public_message())))
            .await;
        return back_home(jar);
    }

    let destination = req.destination.trim().to_string();
    let planned = state.planner.plan(&req).await;
    let logistics = match req.origin() {
        Some(origin) => logistics::estimate_trip(&state.places, origin, &destination).await,
        None => None,
    };
    let map = build_map(&planned.itinerary, state.places.coordinates(&destination).await);

    let (record_id, flash) =
        match trip_store::save_trip(&state.db, &username, &destination, &planned.itinerary) {
            Ok(record) => (Some(record.id), None),
            Err(e) => {
                tracing::error!("Saving trip for {username} failed: {e}");
                (None, Some(Flash::Error(e.public_message())))
            }
        };
    let flash = flash.or_else(|| {
        (planned.source == FALLBACK_SOURCE).then(|| {
            Flash::Info("AI planners are unavailable, so this is an offline itinerary.".into())
        })
    });

    let view = TripView {
        record_id,
        destination,
        origin: req.origin().map(str::to_string),
        itinerary: planned.itinerary,
        source: planned.source,
        logistics,
        max_budget: Some(req.max_budget),
        map,
    };
    state
        .ui
        .update(&id, |ui| {
            ui.show_trip(view);
            ui.flash = flash;
        })
        .await;
    back_home(jar)
}

pub async fn toggle_activity(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ToggleForm>,
) -> Response {
    let (jar, id) = ui_session(&state, jar).await;
    let key = ActivityKey {
        day: form.day,
        index: form.index,
    };
    state
        .ui
        .update(&id, |ui| ui.toggle_activity(key, form.included.is_some()))
        .await;
    back_home(jar)
}

pub async fn ask(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AskForm>,
) -> Response {
    let (jar, id) = ui_session(&state, jar).await;
    let question = form.question.trim().to_string();
    if question.is_empty() {
        return back_home(jar);
    }

    let itinerary = state.ui.load(&id).await.trip.map(|t| t.itinerary);
    let answer = state.planner.ask(itinerary.as_ref(), &question).await;
    state
        .ui
        .update(&id, |ui| ui.answer = Some((question, answer)))
        .await;
    back_home(jar)
}

pub async fn load_trip(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(trip_id): Path<i64>,
) -> Response {
    let (jar, id) = ui_session(&state, jar).await;
    let Some(username) = state.ui.load(&id).await.active_user else {
        return back_home(jar);
    };

    match trip_store::get_trip(&state.db, &username, trip_id) {
        Ok(record) => {
            let coordinates = state.places.coordinates(&record.destination).await;
            let view = TripView {
                record_id: Some(record.id),
                map: build_map(&record.itinerary, coordinates),
                destination: record.destination,
                origin: None,
                itinerary: record.itinerary,
                source: HISTORY_SOURCE.to_string(),
                logistics: None,
                max_budget: None,
            };
            state.ui.update(&id, |ui| ui.show_trip(view)).await;
        }
        Err(e) => {
            state
                .ui
                .update(&id, |ui| ui.flash = Some(Flash::Error(e.public_message())))
                .await;
        }
    }
    back_home(jar)
}

pub async fn save_note(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(trip_id): Path<i64>,
    Form(form): Form<NoteForm>,
) -> Response {
    let (jar, id) = ui_session(&state, jar).await;
    let Some(username) = state.ui.load(&id).await.active_user else {
        return back_home(jar);
    };

    let flash = match trip_store::update_note(&state.db, &username, trip_id, &form.note) {
        Ok(()) => Flash::Info("Note saved".into()),
        Err(e) => Flash::Error(e.public_message()),
    };
    state.ui.update(&id, |ui| ui.flash = Some(flash)).await;
    back_home(jar)
}
