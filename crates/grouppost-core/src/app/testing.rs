//! テスト用の scripted GraphApi

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{AccessToken, GroupPage, GroupPostError, PostRequest, PostedRef, Profile};
use crate::ports::{CodeExchange, GraphApi};

pub(crate) const FIRST_PAGE: &str = "first";

#[derive(Default)]
pub(crate) struct FakeGraph {
    token: Option<Result<AccessToken, GroupPostError>>,
    profile: Option<Result<Profile, GroupPostError>>,

    /// key は `FIRST_PAGE` か next URL
    pages: HashMap<String, Result<GroupPage, GroupPostError>>,

    /// group_id -> (遅延, 結果)。未登録の group は成功扱い
    posts: HashMap<String, (Duration, Result<PostedRef, GroupPostError>)>,

    calls: AtomicUsize,
    posted: Mutex<Vec<(String, PostRequest)>>,
    exchanges: Mutex<Vec<(String, String)>>,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, result: Result<AccessToken, GroupPostError>) -> Self {
        self.token = Some(result);
        self
    }

    pub fn with_profile(mut self, result: Result<Profile, GroupPostError>) -> Self {
        self.profile = Some(result);
        self
    }

    pub fn with_page(mut self, key: &str, result: Result<GroupPage, GroupPostError>) -> Self {
        self.pages.insert(key.to_string(), result);
        self
    }

    pub fn with_post(
        mut self,
        group_id: &str,
        delay: Duration,
        result: Result<PostedRef, GroupPostError>,
    ) -> Self {
        self.posts.insert(group_id.to_string(), (delay, result));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn posted(&self) -> Vec<(String, PostRequest)> {
        self.posted.lock().unwrap().clone()
    }

    /// (code, redirect_uri)
    pub fn exchanges(&self) -> Vec<(String, String)> {
        self.exchanges.lock().unwrap().clone()
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn page(&self, key: &str) -> Result<GroupPage, GroupPostError> {
        self.pages
            .get(key)
            .cloned()
            .unwrap_or_else(|| Err(GroupPostError::remote(format!("unscripted page {key}"))))
    }
}

pub(crate) fn posted_ref(id: &str) -> PostedRef {
    PostedRef {
        id: id.to_string(),
        url: format!("https://www.facebook.com/{id}"),
    }
}

#[async_trait]
impl GraphApi for FakeGraph {
    async fn exchange_code(&self, exchange: CodeExchange<'_>) -> Result<AccessToken, GroupPostError> {
        self.hit();
        self.exchanges
            .lock()
            .unwrap()
            .push((exchange.code.to_string(), exchange.redirect_uri.to_string()));
        self.token
            .clone()
            .unwrap_or_else(|| Ok(AccessToken::new("fake-token")))
    }

    async fn fetch_profile(&self, _token: &AccessToken) -> Result<Profile, GroupPostError> {
        self.hit();
        self.profile
            .clone()
            .unwrap_or_else(|| Ok(Profile::new("42", "Ada")))
    }

    async fn first_group_page(
        &self,
        _token: &AccessToken,
        _user_id: &str,
    ) -> Result<GroupPage, GroupPostError> {
        self.hit();
        self.page(FIRST_PAGE)
    }

    async fn next_group_page(&self, next_url: &str) -> Result<GroupPage, GroupPostError> {
        self.hit();
        self.page(next_url)
    }

    async fn create_post(
        &self,
        _token: &AccessToken,
        group_id: &str,
        post: &PostRequest,
    ) -> Result<PostedRef, GroupPostError> {
        self.hit();
        self.posted
            .lock()
            .unwrap()
            .push((group_id.to_string(), post.clone()));
        match self.posts.get(group_id) {
            Some((delay, result)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                result.clone()
            }
            None => Ok(posted_ref(&format!("{group_id}_1"))),
        }
    }
}
