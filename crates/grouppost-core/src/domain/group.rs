//! Group listing wire model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Cursor metadata. `next` is an absolute URL; its absence ends the walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// One page of the provider's group listing.
///
/// `paging` is optional on purpose: a first page without it is a
/// "no results" error, which must stay distinguishable from an empty cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPage {
    #[serde(default)]
    pub data: Vec<Group>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

impl GroupPage {
    pub fn next_cursor(&self) -> Option<&str> {
        self.paging.as_ref().and_then(|p| p.next.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_paging_object_has_no_cursor() {
        let page: GroupPage = serde_json::from_value(serde_json::json!({
            "data": [{"id": "2", "name": "G2"}],
            "paging": {}
        }))
        .unwrap();

        assert!(page.paging.is_some());
        assert_eq!(page.next_cursor(), None);
        assert_eq!(page.data, vec![Group::new("2", "G2")]);
    }

    #[test]
    fn missing_paging_is_none() {
        let page: GroupPage = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(page.paging.is_none());
    }

    #[test]
    fn provider_extra_fields_are_ignored() {
        let page: GroupPage = serde_json::from_value(serde_json::json!({
            "data": [{"id": "1", "name": "G1", "privacy": "CLOSED"}],
            "paging": {"cursors": {"after": "abc"}, "next": "https://graph/p2"}
        }))
        .unwrap();

        assert_eq!(page.next_cursor(), Some("https://graph/p2"));
    }
}
