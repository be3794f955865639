use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;
use grouppost_core::app::verify_state;
use grouppost_core::domain::Profile;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extract::{AuthSession, STATE_COOKIE, TOKEN_COOKIE, cookie_value};
use crate::state::SharedState;

/// Provider callback parameters. Both are optional on the wire because a
/// denied login comes back with `error=...` instead of a code.
#[derive(Deserialize)]
pub struct CodeQuery {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub token: String,
    #[serde(flatten)]
    pub profile: Profile,
}

/// The login `state` cookie lives ten minutes and is only sent under `/auth`.
const STATE_COOKIE_MAX_AGE_SECS: u32 = 600;

fn state_cookie(value: &str, max_age: u32) -> String {
    format!("{STATE_COOKIE}={value}; Path=/auth; Max-Age={max_age}; HttpOnly; SameSite=Lax")
}

/// GET /auth/login
pub async fn login(State(state): State<SharedState>) -> Result<Response, AppError> {
    let login = state.app.oauth.begin_login()?;
    tracing::debug!(state = %login.state, "redirecting to provider login");

    let cookie = state_cookie(&login.state.to_string(), STATE_COOKIE_MAX_AGE_SECS);
    Ok((
        StatusCode::FOUND,
        [(LOCATION, login.url), (SET_COOKIE, cookie)],
    )
        .into_response())
}

/// GET /auth/code
///
/// The `state` must match the cookie set by `/auth/login` in this browser.
/// Otherwise the provider is never called and no session is stored.
pub async fn code(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<CodeQuery>,
) -> Result<Response, AppError> {
    let issued = cookie_value(&headers, STATE_COOKIE);
    if let Err(err) = verify_state(issued.as_deref(), &query.state) {
        tracing::warn!(error = %err, "oauth callback rejected");
        return Err(err.into());
    }

    let session = state.app.oauth.complete(&query.code, &query.state).await?;
    let token = session.id.to_string();
    let cookie = format!("{TOKEN_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");

    Ok((
        StatusCode::FOUND,
        [(LOCATION, format!("/?token={token}"))],
        AppendHeaders([(SET_COOKIE, cookie), (SET_COOKIE, state_cookie("", 0))]),
    )
        .into_response())
}

/// GET /auth/me
pub async fn me(AuthSession(session): AuthSession) -> Json<MeResponse> {
    Json(MeResponse {
        token: session.id.to_string(),
        profile: session.profile,
    })
}
