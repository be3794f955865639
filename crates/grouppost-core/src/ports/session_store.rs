//! SessionStore port - Session の保存先
//!
//! 開発用・デフォルトは `impls::InMemorySessionStore`（再起動で消える）。
//! 永続ストアに差し替えても呼び出し側は変わりません。

use async_trait::async_trait;

use crate::domain::{GroupPostError, Session, SessionId};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 同じ id があれば上書き
    async fn put(&self, session: Session) -> Result<(), GroupPostError>;

    /// 見つからなければ `GroupPostError::SessionNotFound`
    async fn get(&self, id: &SessionId) -> Result<Session, GroupPostError>;
}
