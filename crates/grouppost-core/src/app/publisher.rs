//! PublishFanout - 複数グループへの同時投稿
//!
//! # フロー
//! 1. group id の重複を除去（最初に現れた順を保つ）
//! 2. 全 target を Pending で tracker に登録
//! 3. target ごとに `tokio::spawn` し、`create_post` の結果で自分の target だけを settle
//! 4. 投稿の完了を待たずに `PublishHandle` を返す
//!
//! target 同士は独立で、リトライも兄弟のキャンセルもしません。
//! settle の順序は保証されないので、観測側は snapshot か watch で見ること。

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::domain::{
    AccessToken, GroupPostError, PostRequest, PostedRef, PublishId, PublishResult,
    PublishSnapshot, Session,
};
use crate::ports::{GraphApi, IdGenerator, PublishTracker};

/// 実行中の fan-out への参照
#[derive(Debug, Clone)]
pub struct PublishHandle {
    publish_id: PublishId,
    updates: watch::Receiver<PublishSnapshot>,
}

impl PublishHandle {
    pub fn publish_id(&self) -> PublishId {
        self.publish_id
    }

    /// 現時点の状態
    pub fn snapshot(&self) -> PublishSnapshot {
        self.updates.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PublishSnapshot> {
        self.updates.clone()
    }

    /// 全 target が settle するまで待つ。
    /// batch が破棄された（同じ owner が次の fan-out を始めた）場合は最後の状態を返す
    pub async fn wait_settled(mut self) -> PublishSnapshot {
        if let Ok(snapshot) = self.updates.wait_for(|s| s.settled).await {
            return snapshot.clone();
        }
        self.updates.borrow().clone()
    }
}

pub struct PublishFanout {
    api: Arc<dyn GraphApi>,
    tracker: Arc<dyn PublishTracker>,
    ids: Arc<dyn IdGenerator>,
    timeout: Option<Duration>,
}

impl PublishFanout {
    pub fn new(
        api: Arc<dyn GraphApi>,
        tracker: Arc<dyn PublishTracker>,
        ids: Arc<dyn IdGenerator>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            api,
            tracker,
            ids,
            timeout,
        }
    }

    pub fn tracker(&self) -> &Arc<dyn PublishTracker> {
        &self.tracker
    }

    pub async fn publish(
        &self,
        session: &Session,
        post: PostRequest,
        group_ids: Vec<String>,
    ) -> PublishHandle {
        let targets = distinct_in_order(group_ids);
        let publish_id = self.ids.generate_publish_id();
        let updates = self.tracker.begin(&session.id, publish_id, &targets).await;

        tracing::info!(
            session = %session.id,
            %publish_id,
            targets = targets.len(),
            "dispatching publish fan-out"
        );

        let post = Arc::new(post);
        for group_id in targets {
            let api = Arc::clone(&self.api);
            let tracker = Arc::clone(&self.tracker);
            let token = session.credential.clone();
            let post = Arc::clone(&post);
            let timeout = self.timeout;

            tokio::spawn(async move {
                let result = post_to_group(api.as_ref(), &token, &group_id, &post, timeout).await;
                if let PublishResult::Failed { message } = &result {
                    tracing::warn!(%publish_id, group_id = %group_id, error = %message, "publish target failed");
                }
                if let Err(err) = tracker.settle(publish_id, &group_id, result).await {
                    // 破棄された batch への遅れた報告
                    tracing::debug!(%publish_id, group_id = %group_id, error = %err, "publish report dropped");
                }
            });
        }

        PublishHandle {
            publish_id,
            updates,
        }
    }

    /// 1 グループへの同期投稿（`/api/create` 用）
    pub async fn create_post_once(
        &self,
        session: &Session,
        group_id: &str,
        post: &PostRequest,
    ) -> Result<PostedRef, GroupPostError> {
        if group_id.trim().is_empty() {
            return Err(GroupPostError::InvalidRequest("groupId is required".to_string()));
        }
        let posted = self
            .api
            .create_post(&session.credential, group_id, post)
            .await?;
        tracing::info!(session = %session.id, group_id, post_id = %posted.id, "post created");
        Ok(posted)
    }
}

async fn post_to_group(
    api: &dyn GraphApi,
    token: &AccessToken,
    group_id: &str,
    post: &PostRequest,
    timeout: Option<Duration>,
) -> PublishResult {
    let call = api.create_post(token, group_id, post);
    let outcome = match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or_else(|_| Err(GroupPostError::remote(format!("timed out after {limit:?}")))),
        None => call.await,
    };

    match outcome {
        Ok(posted) => PublishResult::Posted(posted),
        Err(err) => PublishResult::failed(err.to_string()),
    }
}

fn distinct_in_order(group_ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    group_ids
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
