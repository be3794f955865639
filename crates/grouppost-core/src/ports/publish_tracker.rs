//! PublishTracker port - fan-out の per-target 状態の集約先
//!
//! 各 target のタスクは `settle` で自分のエントリだけを更新します。
//! 呼び出し側は `snapshot` で poll するか、`begin` / `subscribe` が返す
//! `watch::Receiver` で変化を待ちます。
//!
//! # 所有
//! fan-out は owner（SessionId）に紐づき、同じ owner が新しい fan-out を
//! 始めると前回分は破棄されます。

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{GroupPostError, PublishId, PublishResult, PublishSnapshot, SessionId};

#[async_trait]
pub trait PublishTracker: Send + Sync {
    /// 全 target を Pending で登録し、更新を受け取る Receiver を返す
    async fn begin(
        &self,
        owner: &SessionId,
        publish_id: PublishId,
        group_ids: &[String],
    ) -> watch::Receiver<PublishSnapshot>;

    /// 1 target を Pending から Success/Failure へ。二度目は `AlreadySettled`
    async fn settle(
        &self,
        publish_id: PublishId,
        group_id: &str,
        result: PublishResult,
    ) -> Result<(), GroupPostError>;

    /// owner が一致しない場合も `PublishNotFound`
    async fn snapshot(
        &self,
        owner: &SessionId,
        publish_id: PublishId,
    ) -> Result<PublishSnapshot, GroupPostError>;

    async fn subscribe(
        &self,
        owner: &SessionId,
        publish_id: PublishId,
    ) -> Result<watch::Receiver<PublishSnapshot>, GroupPostError>;
}
