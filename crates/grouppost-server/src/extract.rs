use axum::extract::{FromRequestParts, Query};
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Uri};
use grouppost_core::domain::Session;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::SharedState;

/// Name of both the session cookie and the query parameter.
pub const TOKEN_COOKIE: &str = "token";

/// Holds the OAuth `state` between `/auth/login` and `/auth/code`.
pub const STATE_COOKIE: &str = "oauth_state";

/// Session resolved from the `token` cookie, falling back to `?token=`.
/// Missing or unknown tokens are rejected with 401 before any provider call.
pub struct AuthSession(pub Session);

impl FromRequestParts<SharedState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = request_token(parts);
        let session = state.app.authenticate(token.as_deref()).await?;
        Ok(AuthSession(session))
    }
}

pub fn request_token(parts: &Parts) -> Option<String> {
    cookie_value(&parts.headers, TOKEN_COOKIE).or_else(|| query_token(&parts.uri))
}

/// First non-empty value of the named cookie.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn query_token(uri: &Uri) -> Option<String> {
    Query::<TokenQuery>::try_from_uri(uri)
        .ok()
        .and_then(|Query(q)| q.token)
        .filter(|token| !token.is_empty())
}
