use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use grouppost_core::domain::{Group, PostRequest, PostedRef, PublishId, PublishSnapshot};
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::AuthSession;
use crate::state::SharedState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostBody {
    pub group_id: String,
    pub message: String,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishBody {
    pub group_ids: Vec<String>,
    pub message: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// GET /api/groups
pub async fn list_groups(
    State(state): State<SharedState>,
    AuthSession(session): AuthSession,
) -> Result<Json<Vec<Group>>, AppError> {
    let groups = state.app.groups.list_groups(&session).await?;
    Ok(Json(groups))
}

/// POST /api/create
pub async fn create_post(
    State(state): State<SharedState>,
    AuthSession(session): AuthSession,
    payload: Result<Json<CreatePostBody>, JsonRejection>,
) -> Result<Json<PostedRef>, AppError> {
    let Json(body) = payload?;
    let post = PostRequest::new(body.message, body.link);
    let posted = state
        .app
        .publisher
        .create_post_once(&session, &body.group_id, &post)
        .await?;
    Ok(Json(posted))
}

/// POST /api/publish
///
/// A body that is not JSON or misses a field is a 400 `{message}`.
/// Returns as soon as every target is registered; poll
/// `/api/publish/{publish_id}` for outcomes.
pub async fn start_publish(
    State(state): State<SharedState>,
    AuthSession(session): AuthSession,
    payload: Result<Json<PublishBody>, JsonRejection>,
) -> Result<(StatusCode, Json<PublishSnapshot>), AppError> {
    let Json(body) = payload?;
    let post = PostRequest::new(body.message, body.link);
    let handle = state
        .app
        .publisher
        .publish(&session, post, body.group_ids)
        .await;
    Ok((StatusCode::ACCEPTED, Json(handle.snapshot())))
}

/// GET /api/publish/{publish_id}
pub async fn publish_status(
    State(state): State<SharedState>,
    AuthSession(session): AuthSession,
    Path(publish_id): Path<String>,
) -> Result<Json<PublishSnapshot>, AppError> {
    let id: PublishId = publish_id
        .parse()
        .map_err(|_| AppError::NotFound(format!("publish not found: {publish_id}")))?;
    let snapshot = state
        .app
        .publisher
        .tracker()
        .snapshot(&session.id, id)
        .await?;
    Ok(Json(snapshot))
}
