use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use serde::Deserialize;

use crate::auth::{middleware::SESSION_COOKIE, session};
use crate::error::AppResult;
use crate::models::{User, UserPublic};
use crate::routes::AppState;
use crate::services::trip_store;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<Credentials>,
) -> AppResult<impl IntoResponse> {
    let user = trip_store::create_account(&state.db, &body.username, &body.password)?;

    let sess = session::create_session(&state.db, &user.username)?;
    let cookie = build_session_cookie(sess.token, state.config.secure_cookies);
    let user_public: UserPublic = user.into();

    Ok((StatusCode::CREATED, jar.add(cookie), Json(user_public)))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<Credentials>,
) -> AppResult<impl IntoResponse> {
    let user = trip_store::verify_credentials(&state.db, &body.username, &body.password)?;

    let sess = session::create_session(&state.db, &user.username)?;
    let cookie = build_session_cookie(sess.token, state.config.secure_cookies);
    let user_public: UserPublic = user.into();

    Ok((jar.add(cookie), Json(user_public)))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        session::delete_session(&state.db, cookie.value())?;
    }

    let removal = Cookie::build(SESSION_COOKIE)
        .path("/")
        .max_age(time::Duration::ZERO)
        .http_only(true)
        .build();

    Ok((jar.add(removal), Json(serde_json::json!({"ok": true}))))
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserPublic> {
    Json(user.into())
}

fn build_session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .max_age(time::Duration::days(30))
        .http_only(true)
        .secure(secure)
        .same_site(axum_extra::extract::cookie::SameSite::Lax)
        .build()
}
