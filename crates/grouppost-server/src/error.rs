use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use grouppost_core::domain::GroupPostError;

/// Response bodies keep the shapes the browser client reads:
/// `{error}` for auth and lookup failures, `{message}` for rejected calls.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": "No token" }),
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "message": msg }),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg })),
            AppError::Internal(e) => {
                tracing::error!("internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "internal server error" }),
                )
            }
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<GroupPostError> for AppError {
    fn from(err: GroupPostError) -> Self {
        match err {
            GroupPostError::AuthMissing | GroupPostError::SessionNotFound(_) => {
                AppError::Unauthorized
            }
            GroupPostError::Remote { .. }
            | GroupPostError::NoResults
            | GroupPostError::InvalidRequest(_) => AppError::BadRequest(err.to_string()),
            GroupPostError::PublishNotFound(_) => AppError::NotFound(err.to_string()),
            GroupPostError::AlreadySettled(_) => AppError::Internal(err.into()),
        }
    }
}

/// Malformed or incomplete request bodies.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use rstest::rstest;

    async fn body_json(resp: Response) -> serde_json::Value {
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_returns_no_token_body() {
        let resp = AppError::Unauthorized.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["error"], "No token");
    }

    #[tokio::test]
    async fn bad_request_carries_message() {
        let resp = AppError::BadRequest("(#200) Permissions error".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["message"], "(#200) Permissions error");
    }

    #[tokio::test]
    async fn internal_hides_details() {
        let err = AppError::Internal(anyhow::anyhow!("tracker poisoned"));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], "internal server error");
    }

    #[rstest]
    #[case(GroupPostError::AuthMissing, StatusCode::UNAUTHORIZED)]
    #[case(GroupPostError::SessionNotFound("sess-x".into()), StatusCode::UNAUTHORIZED)]
    #[case(GroupPostError::remote("boom"), StatusCode::BAD_REQUEST)]
    #[case(GroupPostError::NoResults, StatusCode::BAD_REQUEST)]
    #[case(GroupPostError::InvalidRequest("state".into()), StatusCode::BAD_REQUEST)]
    #[case(GroupPostError::PublishNotFound("publish-x".into()), StatusCode::NOT_FOUND)]
    #[case(GroupPostError::AlreadySettled("g".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn domain_errors_map_to_status(#[case] err: GroupPostError, #[case] status: StatusCode) {
        assert_eq!(AppError::from(err).into_response().status(), status);
    }

    #[tokio::test]
    async fn remote_message_is_passed_through() {
        let resp = AppError::from(GroupPostError::remote("(#200) nope")).into_response();
        assert_eq!(body_json(resp).await["message"], "(#200) nope");
    }
}
