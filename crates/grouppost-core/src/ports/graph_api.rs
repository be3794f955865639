//! GraphApi port - OAuth/Graph プロバイダへの呼び出し
//!
//! 本番実装は `impls::HttpGraphApi`（reqwest）。
//! エラーはすべて `GroupPostError::Remote { message }` に正規化して返すこと。

use async_trait::async_trait;

use crate::domain::{AccessToken, GroupPage, GroupPostError, PostRequest, PostedRef, Profile};

/// OAuth の authorization code をトークンに交換するための入力
#[derive(Debug, Clone)]
pub struct CodeExchange<'a> {
    pub code: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub redirect_uri: &'a str,
}

#[async_trait]
pub trait GraphApi: Send + Sync {
    async fn exchange_code(&self, exchange: CodeExchange<'_>) -> Result<AccessToken, GroupPostError>;

    async fn fetch_profile(&self, token: &AccessToken) -> Result<Profile, GroupPostError>;

    /// `/{user_id}/groups` の最初のページ
    async fn first_group_page(
        &self,
        token: &AccessToken,
        user_id: &str,
    ) -> Result<GroupPage, GroupPostError>;

    /// `paging.next` の URL をそのまま辿る
    async fn next_group_page(&self, next_url: &str) -> Result<GroupPage, GroupPostError>;

    /// `/{group_id}/feed` に投稿し、投稿 id と URL を返す
    async fn create_post(
        &self,
        token: &AccessToken,
        group_id: &str,
        post: &PostRequest,
    ) -> Result<PostedRef, GroupPostError>;
}
