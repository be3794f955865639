//! Domain identifiers (strongly-typed IDs).
//!
//! ULID ベースの ID を Phantom type で型付けしています。
//! `SessionId` と `PublishId` はどちらも ULID ですが、コンパイル時に混同できません。
//!
//! ## 文字列表現
//! - `SessionId`: `sess-01HV...`（OAuth の state 値、cookie の token 値としても使う）
//! - `PublishId`: `publish-01HV...`（fan-out 1 回分の識別子）
//!
//! serde ではプレフィックス付きの文字列として読み書きします。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display / FromStr で使うプレフィックスを提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// `T` は PhantomData なので実行時のサイズは `Ulid` と同じです。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// プレフィックス付き文字列のパースエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("expected prefix '{expected}' in '{value}'")]
    MissingPrefix { expected: &'static str, value: String },

    #[error("invalid ulid in '{0}'")]
    InvalidUlid(String),
}

impl<T: IdMarker> FromStr for Id<T> {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(T::prefix())
            .ok_or_else(|| IdParseError::MissingPrefix {
                expected: T::prefix(),
                value: s.to_string(),
            })?;
        let ulid = Ulid::from_string(rest).map_err(|_| IdParseError::InvalidUlid(s.to_string()))?;
        Ok(Self::from_ulid(ulid))
    }
}

impl<T: IdMarker> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: IdMarker> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Session のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionTag {}

impl IdMarker for SessionTag {
    fn prefix() -> &'static str {
        "sess-"
    }
}

/// Publish（fan-out 1 回分）のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PublishTag {}

impl IdMarker for PublishTag {
    fn prefix() -> &'static str {
        "publish-"
    }
}

/// Identifier of a Session (also the OAuth `state` value and the cookie token).
pub type SessionId = Id<SessionTag>;

/// Identifier of one publish fan-out invocation.
pub type PublishId = Id<PublishTag>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_prefix() {
        let ulid = Ulid::new();
        let session = SessionId::from_ulid(ulid);
        let publish = PublishId::from_ulid(ulid);

        assert_eq!(session.to_string(), format!("sess-{ulid}"));
        assert_eq!(publish.to_string(), format!("publish-{ulid}"));
    }

    #[test]
    fn parse_accepts_own_prefix_only() {
        let id = SessionId::from_ulid(Ulid::new());
        let text = id.to_string();

        assert_eq!(text.parse::<SessionId>().unwrap(), id);
        assert!(matches!(
            text.parse::<PublishId>(),
            Err(IdParseError::MissingPrefix { .. })
        ));
    }

    #[test]
    fn parse_rejects_garbage_ulid() {
        let err = "sess-not-a-ulid".parse::<SessionId>().unwrap_err();
        assert_eq!(err, IdParseError::InvalidUlid("sess-not-a-ulid".to_string()));
    }

    #[test]
    fn serializes_as_prefixed_string() {
        let id = PublishId::from_ulid(Ulid::new());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));

        let back: PublishId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;
        assert_eq!(size_of::<SessionId>(), size_of::<Ulid>());
        assert_eq!(size_of::<PublishId>(), size_of::<Ulid>());
    }
}
