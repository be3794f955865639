//! InMemorySessionStore - プロセス内の Session 保存先
//!
//! - `RwLock<HashMap<SessionId, Session>>`
//! - 読み取り（毎リクエスト）が圧倒的に多いので RwLock
//! - eviction なし、永続化なし

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{GroupPostError, Session, SessionId};
use crate::ports::SessionStore;

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(&self, session: Session) -> Result<(), GroupPostError> {
        self.sessions.write().await.insert(session.id, session);
        Ok(())
    }

    async fn get(&self, id: &SessionId) -> Result<Session, GroupPostError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| GroupPostError::SessionNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccessToken, Profile};
    use std::sync::Arc;
    use ulid::Ulid;

    fn session(name: &str) -> Session {
        Session::new(
            SessionId::from_ulid(Ulid::new()),
            AccessToken::new(format!("token-{name}")),
            Profile::new("1", name),
        )
    }

    #[tokio::test]
    async fn put_then_get_roundtrip() {
        let store = InMemorySessionStore::new();
        let s = session("ada");
        store.put(s.clone()).await.unwrap();

        let got = store.get(&s.id).await.unwrap();
        assert_eq!(got.profile.name, "ada");
        assert_eq!(got.credential.expose(), "token-ada");
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let store = InMemorySessionStore::new();
        let id = SessionId::from_ulid(Ulid::new());
        let err = store.get(&id).await.unwrap_err();
        assert_eq!(err, GroupPostError::SessionNotFound(id.to_string()));
    }

    #[tokio::test]
    async fn concurrent_puts_are_all_visible() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut joins = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            joins.push(tokio::spawn(async move {
                store.put(session(&format!("u{i}"))).await.unwrap();
            }));
        }
        for j in joins {
            j.await.unwrap();
        }
        assert_eq!(store.len().await, 16);
    }
}
