//! Errors - ドメインエラー
//!
//! HTTP 層はこの分類だけを見てステータスコードを決めます。
//! - AuthMissing / SessionNotFound → 401
//! - Remote / NoResults / InvalidRequest → 400
//! - PublishNotFound → 404

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupPostError {
    /// リクエストに session token が無い
    #[error("no token")]
    AuthMissing,

    /// token はあるが対応する Session が無い（再起動で消えた場合も含む）
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// プロバイダ呼び出しの失敗。message はプロバイダの `error.message` を優先する
    #[error("{message}")]
    Remote { message: String },

    /// 最初のページに paging メタデータが無い
    #[error("no results")]
    NoResults,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// PublishTarget は一度しか settle できない
    #[error("target {0} already settled")]
    AlreadySettled(String),

    #[error("publish not found: {0}")]
    PublishNotFound(String),
}

impl GroupPostError {
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }
}
