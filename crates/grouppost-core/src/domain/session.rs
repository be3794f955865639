//! Session - 認証済みユーザーの記録

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::SessionId;

/// プロバイダが発行したアクセストークン
///
/// Debug ではマスクするので、`tracing` のフィールドに載せても漏れません。
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// `/me` の結果。`id` と `name` 以外のフィールドもそのまま保持する
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Profile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Session は OAuth 完了時に一度だけ作られ、以後は変更されない
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub credential: AccessToken,
    pub profile: Profile,
}

impl Session {
    pub fn new(id: SessionId, credential: AccessToken, profile: Profile) -> Self {
        Self {
            id,
            credential,
            profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("EAAB-secret");
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
        assert_eq!(token.expose(), "EAAB-secret");
    }

    #[test]
    fn profile_keeps_unknown_fields() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": "42",
            "name": "Ada",
            "email": "ada@example.com"
        }))
        .unwrap();

        assert_eq!(profile.id, "42");
        assert_eq!(profile.extra["email"], "ada@example.com");

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["email"], "ada@example.com");
    }

    #[test]
    fn profile_name_is_optional_on_the_wire() {
        let profile: Profile = serde_json::from_str(r#"{"id":"7"}"#).unwrap();
        assert_eq!(profile.name, "");
    }
}
