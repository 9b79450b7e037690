use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::auth::session;
use crate::error::AppError;
use crate::routes::AppState;

/// API session cookie. The HTML pages track browsers with `wanderlust_ui`.
pub const SESSION_COOKIE: &str = "wanderlust_session";

fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value())
        .filter(|token| !token.is_empty())
}

/// Gate for the trip, budget and chat API. Handlers read the traveler from the
/// `User` extension.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = session_token(&jar) else {
        tracing::debug!("{} {} without a session", request.method(), request.uri().path());
        return Err(AppError::Unauthorized);
    };

    let (session, user) = session::validate_session(&state.db, token).inspect_err(|_| {
        tracing::debug!("Rejected stale session on {}", request.uri().path());
    })?;
    tracing::trace!(username = %session.username, "API session accepted");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
