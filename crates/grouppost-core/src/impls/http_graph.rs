//! HttpGraphApi - reqwest による Graph API クライアント
//!
//! # エラーメッセージの抽出
//! プロバイダのエラーは `{"error": {"message": "...", "type": ..., "code": ...}}` 形式。
//! 1. `error.message` があればそれを使う
//! 2. トップレベルの `message` があればそれを使う
//! 3. それ以外は JSON をそのまま文字列化
//! 4. JSON でなければ `request failed with status code N`
//!
//! reqwest のエラーは URL（= access_token を含む query）を落としてから文字列化する。

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{AccessToken, GroupPage, GroupPostError, PostRequest, PostedRef, Profile};
use crate::ports::{CodeExchange, GraphApi};

pub const DEFAULT_GRAPH_BASE: &str = "https://graph.facebook.com/v5.0";
pub const DEFAULT_POST_URL_BASE: &str = "https://www.facebook.com";

/// 呼び出し先のベース URL 群（テストでは wiremock に向ける）
#[derive(Debug, Clone)]
pub struct GraphEndpoints {
    pub graph_base: String,
    pub post_url_base: String,
}

impl Default for GraphEndpoints {
    fn default() -> Self {
        Self {
            graph_base: DEFAULT_GRAPH_BASE.to_string(),
            post_url_base: DEFAULT_POST_URL_BASE.to_string(),
        }
    }
}

impl GraphEndpoints {
    /// `graph_base` にパスセグメントを足した URL。セグメントはエスケープされる
    fn graph_url(&self, segments: &[&str]) -> Result<Url, GroupPostError> {
        let mut url = Url::parse(&self.graph_base)
            .map_err(|e| GroupPostError::remote(format!("invalid graph base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| GroupPostError::remote("graph base url cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn post_url(&self, post_id: &str) -> String {
        format!("{}/{}", self.post_url_base.trim_end_matches('/'), post_id)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: AccessToken,
}

#[derive(Deserialize)]
struct CreatedPost {
    id: String,
}

pub struct HttpGraphApi {
    client: Client,
    endpoints: GraphEndpoints,
}

impl HttpGraphApi {
    pub fn new(endpoints: GraphEndpoints) -> Self {
        Self::with_client(Client::new(), endpoints)
    }

    pub fn with_client(client: Client, endpoints: GraphEndpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &GraphEndpoints {
        &self.endpoints
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, GroupPostError> {
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        decode(response).await
    }
}

fn transport_error(err: reqwest::Error) -> GroupPostError {
    GroupPostError::remote(err.without_url().to_string())
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GroupPostError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;
    if !status.is_success() {
        return Err(GroupPostError::remote(remote_error_message(status, &body)));
    }
    serde_json::from_str(&body)
        .map_err(|e| GroupPostError::remote(format!("unexpected response body: {e}")))
}

/// 失敗レスポンスから人間向けのメッセージを取り出す
pub fn remote_error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .pointer("/error/message")
            .or_else(|| value.get("message"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        Err(_) => format!("request failed with status code {}", status.as_u16()),
    }
}

#[async_trait]
impl GraphApi for HttpGraphApi {
    async fn exchange_code(&self, exchange: CodeExchange<'_>) -> Result<AccessToken, GroupPostError> {
        let mut url = self.endpoints.graph_url(&["oauth", "access_token"])?;
        url.query_pairs_mut()
            .append_pair("code", exchange.code)
            .append_pair("client_id", exchange.client_id)
            .append_pair("client_secret", exchange.client_secret)
            .append_pair("redirect_uri", exchange.redirect_uri);

        let token: TokenResponse = self.get_json(url).await?;
        Ok(token.access_token)
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<Profile, GroupPostError> {
        let mut url = self.endpoints.graph_url(&["me"])?;
        url.query_pairs_mut()
            .append_pair("access_token", token.expose());
        self.get_json(url).await
    }

    async fn first_group_page(
        &self,
        token: &AccessToken,
        user_id: &str,
    ) -> Result<GroupPage, GroupPostError> {
        let mut url = self.endpoints.graph_url(&[user_id, "groups"])?;
        url.query_pairs_mut()
            .append_pair("access_token", token.expose());
        // `null` body is treated like a page without paging metadata
        let page: Option<GroupPage> = self.get_json(url).await?;
        Ok(page.unwrap_or_default())
    }

    async fn next_group_page(&self, next_url: &str) -> Result<GroupPage, GroupPostError> {
        let url = Url::parse(next_url)
            .map_err(|e| GroupPostError::remote(format!("invalid next page url: {e}")))?;
        let page: Option<GroupPage> = self.get_json(url).await?;
        Ok(page.unwrap_or_default())
    }

    async fn create_post(
        &self,
        token: &AccessToken,
        group_id: &str,
        post: &PostRequest,
    ) -> Result<PostedRef, GroupPostError> {
        let mut url = self.endpoints.graph_url(&[group_id, "feed"])?;
        url.query_pairs_mut()
            .append_pair("access_token", token.expose());

        let response = self
            .client
            .post(url)
            .json(post)
            .send()
            .await
            .map_err(transport_error)?;
        let created: CreatedPost = decode(response).await?;

        Ok(PostedRef {
            url: self.endpoints.post_url(&created.id),
            id: created.id,
        })
    }
}
