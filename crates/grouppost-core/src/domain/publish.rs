//! Publish model: post payload, per-target state machine, snapshots.
//!
//! State transitions (one per target):
//! - Pending -> Success
//! - Pending -> Failure
//!
//! A settled target is never revisited. `PublishTarget::settle` enforces this,
//! so the tracker cannot overwrite an outcome even if a late report arrives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::GroupPostError;
use super::ids::PublishId;

/// Body of a "create post" call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRequest {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl PostRequest {
    /// Blank links are dropped; the UI sends `""` when the field is left empty.
    pub fn new(message: impl Into<String>, link: Option<String>) -> Self {
        let link = link
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        Self {
            message: message.into(),
            link,
        }
    }
}

/// A created post: provider id plus canonical URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedRef {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublishStatus {
    Pending,
    Success,
    Failure,
}

impl PublishStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PublishStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PublishResult {
    Posted(PostedRef),
    Failed { message: String },
}

impl PublishResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    pub fn status(&self) -> PublishStatus {
        match self {
            PublishResult::Posted(_) => PublishStatus::Success,
            PublishResult::Failed { .. } => PublishStatus::Failure,
        }
    }
}

/// One selected group within one fan-out.
///
/// `result` is `None` exactly while `status` is `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishTarget {
    pub group_id: String,
    pub status: PublishStatus,
    pub result: Option<PublishResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<DateTime<Utc>>,
}

impl PublishTarget {
    pub fn pending(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            status: PublishStatus::Pending,
            result: None,
            settled_at: None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.status.is_terminal()
    }

    /// Pending -> Success|Failure, exactly once.
    pub fn settle(
        &mut self,
        result: PublishResult,
        at: DateTime<Utc>,
    ) -> Result<(), GroupPostError> {
        if self.is_settled() {
            return Err(GroupPostError::AlreadySettled(self.group_id.clone()));
        }
        self.status = result.status();
        self.result = Some(result);
        self.settled_at = Some(at);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishCounts {
    pub pending: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl PublishCounts {
    pub fn from_targets(targets: &[PublishTarget]) -> Self {
        let mut counts = Self::default();
        for target in targets {
            match target.status {
                PublishStatus::Pending => counts.pending += 1,
                PublishStatus::Success => counts.succeeded += 1,
                PublishStatus::Failure => counts.failed += 1,
            }
        }
        counts
    }
}

/// Point-in-time view of one fan-out, handed to pollers and subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishSnapshot {
    pub publish_id: PublishId,
    pub started_at: DateTime<Utc>,
    pub targets: Vec<PublishTarget>,
    pub counts: PublishCounts,
    pub settled: bool,
}

impl PublishSnapshot {
    pub fn new(
        publish_id: PublishId,
        started_at: DateTime<Utc>,
        targets: Vec<PublishTarget>,
    ) -> Self {
        let counts = PublishCounts::from_targets(&targets);
        Self {
            publish_id,
            started_at,
            settled: counts.pending == 0,
            targets,
            counts,
        }
    }

    pub fn target(&self, group_id: &str) -> Option<&PublishTarget> {
        self.targets.iter().find(|t| t.group_id == group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use ulid::Ulid;

    fn posted(id: &str) -> PublishResult {
        PublishResult::Posted(PostedRef {
            id: id.to_string(),
            url: format!("https://www.facebook.com/{id}"),
        })
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("   "), None)]
    #[case(Some(" https://example.com "), Some("https://example.com"))]
    fn post_request_normalizes_link(#[case] link: Option<&str>, #[case] expected: Option<&str>) {
        let post = PostRequest::new("hi", link.map(str::to_string));
        assert_eq!(post.link.as_deref(), expected);
    }

    #[test]
    fn post_request_omits_missing_link_on_the_wire() {
        let v = serde_json::to_value(PostRequest::new("hi", None)).unwrap();
        assert_eq!(v, serde_json::json!({"message": "hi"}));
    }

    #[test]
    fn status_serializes_as_screaming_names() {
        assert_eq!(
            serde_json::to_string(&PublishStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&PublishStatus::Failure).unwrap(),
            "\"FAILURE\""
        );
    }

    #[test]
    fn settle_transitions_exactly_once() {
        let mut target = PublishTarget::pending("g1");
        assert!(!target.is_settled());
        assert!(target.result.is_none());

        target.settle(posted("g1_100"), Utc::now()).unwrap();
        assert_eq!(target.status, PublishStatus::Success);

        let err = target
            .settle(PublishResult::failed("late"), Utc::now())
            .unwrap_err();
        assert_eq!(err, GroupPostError::AlreadySettled("g1".to_string()));
        assert_eq!(target.status, PublishStatus::Success);
        assert_eq!(target.result, Some(posted("g1_100")));
    }

    #[test]
    fn snapshot_counts_and_settled_flag() {
        let mut a = PublishTarget::pending("a");
        let mut b = PublishTarget::pending("b");
        let c = PublishTarget::pending("c");
        a.settle(posted("a_1"), Utc::now()).unwrap();
        b.settle(PublishResult::failed("nope"), Utc::now()).unwrap();

        let id = PublishId::from_ulid(Ulid::new());
        let snap = PublishSnapshot::new(id, Utc::now(), vec![a, b, c]);
        assert_eq!(
            snap.counts,
            PublishCounts {
                pending: 1,
                succeeded: 1,
                failed: 1
            }
        );
        assert!(!snap.settled);

        let empty = PublishSnapshot::new(id, Utc::now(), vec![]);
        assert!(empty.settled);
    }

    #[test]
    fn target_json_shape() {
        let mut target = PublishTarget::pending("g9");
        let pending = serde_json::to_value(&target).unwrap();
        assert_eq!(pending["groupId"], "g9");
        assert_eq!(pending["status"], "PENDING");
        assert!(pending["result"].is_null());

        target
            .settle(PublishResult::failed("boom"), Utc::now())
            .unwrap();
        let failed = serde_json::to_value(&target).unwrap();
        assert_eq!(failed["result"]["kind"], "failed");
        assert_eq!(failed["result"]["message"], "boom");
    }
}
