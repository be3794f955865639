//! InMemoryPublishTracker - fan-out 状態のプロセス内集約
//!
//! # 実装詳細
//! - `Mutex<TrackerState>` で batch（fan-out 1 回分）を管理
//! - batch ごとに `watch::Sender<PublishSnapshot>` を持ち、settle のたびに最新の
//!   snapshot を流す
//! - ロックを持ったまま await しない（ネットワーク呼び出しは tracker の外）
//!
//! owner が新しい fan-out を begin すると前回の batch は削除され、その Sender も
//! drop されるので、古い Receiver の `changed()` は Err を返して終わります。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};

use crate::domain::{
    GroupPostError, PublishId, PublishResult, PublishSnapshot, PublishTarget, SessionId,
};
use crate::ports::{Clock, PublishTracker, SystemClock};

struct Batch {
    owner: SessionId,
    started_at: DateTime<Utc>,
    targets: Vec<PublishTarget>,
    updates: watch::Sender<PublishSnapshot>,
}

impl Batch {
    fn snapshot(&self, publish_id: PublishId) -> PublishSnapshot {
        PublishSnapshot::new(publish_id, self.started_at, self.targets.clone())
    }
}

#[derive(Default)]
struct TrackerState {
    batches: HashMap<PublishId, Batch>,

    /// owner ごとの最新 batch
    latest_by_owner: HashMap<SessionId, PublishId>,
}

pub struct InMemoryPublishTracker {
    state: Mutex<TrackerState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryPublishTracker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(TrackerState::default()),
            clock,
        }
    }

    /// 保持している batch 数
    pub async fn batch_count(&self) -> usize {
        self.state.lock().await.batches.len()
    }
}

impl Default for InMemoryPublishTracker {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl PublishTracker for InMemoryPublishTracker {
    async fn begin(
        &self,
        owner: &SessionId,
        publish_id: PublishId,
        group_ids: &[String],
    ) -> watch::Receiver<PublishSnapshot> {
        let started_at = self.clock.now();
        let targets: Vec<PublishTarget> = group_ids.iter().map(PublishTarget::pending).collect();
        let initial = PublishSnapshot::new(publish_id, started_at, targets.clone());
        let (updates, receiver) = watch::channel(initial);

        let mut state = self.state.lock().await;
        if let Some(previous) = state.latest_by_owner.insert(*owner, publish_id) {
            state.batches.remove(&previous);
            tracing::debug!(%owner, %previous, "discarded previous publish batch");
        }
        state.batches.insert(
            publish_id,
            Batch {
                owner: *owner,
                started_at,
                targets,
                updates,
            },
        );
        receiver
    }

    async fn settle(
        &self,
        publish_id: PublishId,
        group_id: &str,
        result: PublishResult,
    ) -> Result<(), GroupPostError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let batch = state
            .batches
            .get_mut(&publish_id)
            .ok_or_else(|| GroupPostError::PublishNotFound(publish_id.to_string()))?;

        let target = batch
            .targets
            .iter_mut()
            .find(|t| t.group_id == group_id)
            .ok_or_else(|| GroupPostError::PublishNotFound(format!("{publish_id}/{group_id}")))?;
        target.settle(result, now)?;

        let snapshot = batch.snapshot(publish_id);
        batch.updates.send_replace(snapshot);
        Ok(())
    }

    async fn snapshot(
        &self,
        owner: &SessionId,
        publish_id: PublishId,
    ) -> Result<PublishSnapshot, GroupPostError> {
        let state = self.state.lock().await;
        match state.batches.get(&publish_id) {
            Some(batch) if batch.owner == *owner => Ok(batch.snapshot(publish_id)),
            _ => Err(GroupPostError::PublishNotFound(publish_id.to_string())),
        }
    }

    async fn subscribe(
        &self,
        owner: &SessionId,
        publish_id: PublishId,
    ) -> Result<watch::Receiver<PublishSnapshot>, GroupPostError> {
        let state = self.state.lock().await;
        match state.batches.get(&publish_id) {
            Some(batch) if batch.owner == *owner => Ok(batch.updates.subscribe()),
            _ => Err(GroupPostError::PublishNotFound(publish_id.to_string())),
        }
    }
}
