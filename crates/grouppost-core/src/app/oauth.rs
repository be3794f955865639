//! OAuthFlow - ログイン URL の生成と authorization code の交換
//!
//! # フロー
//! 1. `begin_login`: 新しい SessionId を発行し、それを `state` にした dialog URL を返す
//! 2. プロバイダが `{app_root}auth/code?code=..&state=..` にリダイレクト
//! 3. `complete`: code → access token → `/me` → Session を保存
//!
//! `state` はログインを始めたブラウザに紐付ける。HTTP 層が `begin_login` の state を
//! 短命 cookie に入れ、callback では `verify_state` でその cookie と一致しない限り
//! `complete` を呼ばない。`complete` 自体は形式（SessionId として読めるか）だけ見ます。

use std::sync::Arc;

use reqwest::Url;

use crate::domain::{GroupPostError, Session, SessionId};
use crate::ports::{CodeExchange, GraphApi, IdGenerator, SessionStore};

pub const DEFAULT_DIALOG_BASE: &str = "https://www.facebook.com/v5.0";

#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: String,

    /// 公開 URL。末尾は `/`
    pub app_root: String,

    pub dialog_base: String,
}

impl OAuthSettings {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        app_root: impl Into<String>,
    ) -> Self {
        let mut app_root = app_root.into();
        if !app_root.ends_with('/') {
            app_root.push('/');
        }
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            app_root,
            dialog_base: DEFAULT_DIALOG_BASE.to_string(),
        }
    }

    pub fn with_dialog_base(mut self, dialog_base: impl Into<String>) -> Self {
        self.dialog_base = dialog_base.into();
        self
    }

    pub fn redirect_uri(&self) -> String {
        format!("{}auth/code", self.app_root)
    }

    /// 起動時チェック。問題があれば理由を返す
    pub fn validate(&self) -> Result<(), String> {
        if self.client_id.trim().is_empty() {
            return Err("client id is empty".to_string());
        }
        if self.client_secret.trim().is_empty() {
            return Err("client secret is empty".to_string());
        }
        Url::parse(&self.app_root).map_err(|e| format!("app root is not a URL: {e}"))?;
        Url::parse(&self.dialog_base).map_err(|e| format!("dialog base is not a URL: {e}"))?;
        Ok(())
    }
}

/// `/auth/login` の応答に使う
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    pub state: SessionId,
    pub url: String,
}

/// callback の `state` がログイン開始時に渡したもの（`expected`）と一致するか
pub fn verify_state(expected: Option<&str>, returned: &str) -> Result<(), GroupPostError> {
    match expected {
        Some(expected) if !expected.is_empty() && expected == returned => Ok(()),
        Some(_) => Err(GroupPostError::InvalidRequest("state mismatch".to_string())),
        None => Err(GroupPostError::InvalidRequest(
            "state was not issued to this browser".to_string(),
        )),
    }
}

pub struct OAuthFlow {
    settings: OAuthSettings,
    api: Arc<dyn GraphApi>,
    sessions: Arc<dyn SessionStore>,
    ids: Arc<dyn IdGenerator>,
}

impl OAuthFlow {
    pub fn new(
        settings: OAuthSettings,
        api: Arc<dyn GraphApi>,
        sessions: Arc<dyn SessionStore>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            settings,
            api,
            sessions,
            ids,
        }
    }

    pub fn settings(&self) -> &OAuthSettings {
        &self.settings
    }

    pub fn begin_login(&self) -> Result<LoginRedirect, GroupPostError> {
        let state = self.ids.generate_session_id();
        let url = self.login_url(&state)?;
        Ok(LoginRedirect { state, url })
    }

    pub fn login_url(&self, state: &SessionId) -> Result<String, GroupPostError> {
        let mut url = Url::parse(&self.settings.dialog_base)
            .map_err(|e| GroupPostError::InvalidRequest(format!("dialog base: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| GroupPostError::InvalidRequest("dialog base cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["dialog", "oauth"]);
        url.query_pairs_mut()
            .append_pair("client_id", &self.settings.client_id)
            .append_pair("redirect_uri", &self.settings.redirect_uri())
            .append_pair("state", &state.to_string());
        Ok(url.into())
    }

    /// code を交換してプロフィールを取り、`state` をキーに Session を保存する
    pub async fn complete(&self, code: &str, state: &str) -> Result<Session, GroupPostError> {
        if code.is_empty() {
            return Err(GroupPostError::InvalidRequest("missing code".to_string()));
        }
        let id: SessionId = state
            .parse()
            .map_err(|e| GroupPostError::InvalidRequest(format!("state: {e}")))?;

        let redirect_uri = self.settings.redirect_uri();
        let credential = self
            .api
            .exchange_code(CodeExchange {
                code,
                client_id: &self.settings.client_id,
                client_secret: &self.settings.client_secret,
                redirect_uri: &redirect_uri,
            })
            .await?;
        let profile = self.api.fetch_profile(&credential).await?;

        let session = Session::new(id, credential, profile);
        self.sessions.put(session.clone()).await?;
        tracing::info!(session = %session.id, user = %session.profile.id, "session created");
        Ok(session)
    }
}
