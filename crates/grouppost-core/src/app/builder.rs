//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - GraphApi と OAuthSettings は必須。無ければ build() が BuildError を返す
//! - OAuthSettings は build() 時に validate する
//! - それ以外（SessionStore, PublishTracker, Clock）はインメモリ実装がデフォルト

use std::sync::Arc;
use std::time::Duration;

use crate::app::group_lister::{DEFAULT_MAX_PAGES, GroupLister};
use crate::app::oauth::{OAuthFlow, OAuthSettings};
use crate::app::publisher::PublishFanout;
use crate::domain::{GroupPostError, Session, SessionId};
use crate::impls::{InMemoryPublishTracker, InMemorySessionStore};
use crate::ports::{Clock, GraphApi, PublishTracker, SessionStore, SystemClock, UlidGenerator};

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .graph_api(Arc::new(HttpGraphApi::new(GraphEndpoints::default())))
///     .oauth(OAuthSettings::new(client_id, client_secret, app_root))
///     .publish_timeout(Some(Duration::from_secs(30)))
///     .build()?;
/// ```
pub struct AppBuilder {
    graph: Option<Arc<dyn GraphApi>>,
    sessions: Option<Arc<dyn SessionStore>>,
    tracker: Option<Arc<dyn PublishTracker>>,
    clock: Option<Arc<dyn Clock>>,
    oauth: Option<OAuthSettings>,
    max_group_pages: usize,
    publish_timeout: Option<Duration>,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("GraphApi is not configured")]
    MissingGraphApi,

    #[error("OAuth settings are not configured")]
    MissingOAuthSettings,

    #[error("invalid OAuth settings: {0}")]
    InvalidOAuthSettings(String),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            graph: None,
            sessions: None,
            tracker: None,
            clock: None,
            oauth: None,
            max_group_pages: DEFAULT_MAX_PAGES,
            publish_timeout: None,
        }
    }

    pub fn graph_api(mut self, graph: Arc<dyn GraphApi>) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn session_store(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn publish_tracker(mut self, tracker: Arc<dyn PublishTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn oauth(mut self, settings: OAuthSettings) -> Self {
        self.oauth = Some(settings);
        self
    }

    pub fn max_group_pages(mut self, max_pages: usize) -> Self {
        self.max_group_pages = max_pages;
        self
    }

    pub fn publish_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.publish_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        let graph = self.graph.ok_or(BuildError::MissingGraphApi)?;
        let settings = self.oauth.ok_or(BuildError::MissingOAuthSettings)?;
        settings.validate().map_err(BuildError::InvalidOAuthSettings)?;

        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let sessions: Arc<dyn SessionStore> = match self.sessions {
            Some(sessions) => sessions,
            None => Arc::new(InMemorySessionStore::new()),
        };
        let tracker: Arc<dyn PublishTracker> = match self.tracker {
            Some(tracker) => tracker,
            None => Arc::new(InMemoryPublishTracker::new(Arc::clone(&clock))),
        };
        let ids = Arc::new(UlidGenerator::new(Arc::clone(&clock)));

        Ok(App {
            oauth: OAuthFlow::new(settings, Arc::clone(&graph), Arc::clone(&sessions), ids.clone()),
            groups: GroupLister::new(Arc::clone(&graph), self.max_group_pages),
            publisher: PublishFanout::new(graph, tracker, ids, self.publish_timeout),
            sessions,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App はワイヤリング済みのユースケース一式
pub struct App {
    pub oauth: OAuthFlow,
    pub groups: GroupLister,
    pub publisher: PublishFanout,
    sessions: Arc<dyn SessionStore>,
}

impl App {
    /// リクエストの token から Session を引く。
    /// token が無ければ `AuthMissing`、読めない/未知なら `SessionNotFound`
    pub async fn authenticate(&self, token: Option<&str>) -> Result<Session, GroupPostError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(GroupPostError::AuthMissing)?;
        let id: SessionId = token
            .parse()
            .map_err(|_| GroupPostError::SessionNotFound(token.to_string()))?;
        self.sessions.get(&id).await
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::FakeGraph;
    use crate::domain::{AccessToken, Profile};
    use ulid::Ulid;

    fn settings() -> OAuthSettings {
        OAuthSettings::new("cid", "secret", "https://app.example/")
    }

    fn app() -> App {
        AppBuilder::new()
            .graph_api(Arc::new(FakeGraph::new()))
            .oauth(settings())
            .build()
            .unwrap()
    }

    #[test]
    fn build_requires_graph_api() {
        let result = AppBuilder::new().oauth(settings()).build();
        assert!(matches!(result, Err(BuildError::MissingGraphApi)));
    }

    #[test]
    fn build_requires_oauth_settings() {
        let result = AppBuilder::new()
            .graph_api(Arc::new(FakeGraph::new()))
            .build();
        assert!(matches!(result, Err(BuildError::MissingOAuthSettings)));
    }

    #[test]
    fn build_validates_oauth_settings() {
        let result = AppBuilder::new()
            .graph_api(Arc::new(FakeGraph::new()))
            .oauth(OAuthSettings::new("", "secret", "https://app.example/"))
            .build();
        assert!(matches!(result, Err(BuildError::InvalidOAuthSettings(_))));
    }

    #[tokio::test]
    async fn authenticate_without_token_is_auth_missing() {
        let app = app();
        assert_eq!(app.authenticate(None).await.unwrap_err(), GroupPostError::AuthMissing);
        assert_eq!(app.authenticate(Some("")).await.unwrap_err(), GroupPostError::AuthMissing);
    }

    #[tokio::test]
    async fn authenticate_unknown_or_garbage_token_is_not_found() {
        let app = app();
        let unknown = SessionId::from_ulid(Ulid::new()).to_string();
        assert!(matches!(
            app.authenticate(Some(&unknown)).await,
            Err(GroupPostError::SessionNotFound(_))
        ));
        assert!(matches!(
            app.authenticate(Some("nope")).await,
            Err(GroupPostError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn authenticate_finds_stored_session() {
        let app = app();
        let id = SessionId::from_ulid(Ulid::new());
        app.sessions()
            .put(Session::new(id, AccessToken::new("t"), Profile::new("1", "A")))
            .await
            .unwrap();

        let session = app.authenticate(Some(&id.to_string())).await.unwrap();
        assert_eq!(session.id, id);
    }
}
