use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt};

/// Stable identifier of a card on the remote board.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The list (column) an item belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListRef {
    pub name: String,
    #[serde(default)]
    pub closed: bool,
}

impl ListRef {
    pub fn open(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            closed: false,
        }
    }

    pub fn closed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            closed: true,
        }
    }
}

/// One card on the board.
///
/// `position` orders items within their list. The remote side may renumber
/// positions at any time, so a position is only meaningful relative to the
/// live positions of its neighbours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    pub list: ListRef,
    #[serde(default)]
    pub position: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<NaiveDate>,
}

impl WorkItem {
    pub fn new(id: impl Into<String>, list: ListRef, position: f64) -> Self {
        Self {
            id: ItemId::new(id),
            name: String::new(),
            list,
            position,
            description: String::new(),
            labels: Vec::new(),
            comments: Vec::new(),
            due: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_comments<I, S>(mut self, comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comments = comments.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_due(mut self, due: NaiveDate) -> Self {
        self.due = Some(due);
        self
    }

    /// True when the item carries at least one of `labels`.
    #[must_use]
    pub fn has_any_label(&self, labels: &[String]) -> bool {
        self.labels.iter().any(|l| labels.contains(l))
    }

    /// True when any comment contains one of `needles` as a substring.
    #[must_use]
    pub fn has_comment_containing(&self, needles: &[String]) -> bool {
        self.comments
            .iter()
            .any(|c| needles.iter().any(|n| c.contains(n.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_deserializes_with_defaults() {
        let json = r#"{"id":"c1","list":{"name":"In Progress"},"position":16384.0}"#;
        let item: WorkItem = serde_json::from_str(json).expect("valid item");
        assert_eq!(item.id.as_str(), "c1");
        assert!(!item.list.closed);
        assert!(item.labels.is_empty());
        assert!(item.due.is_none());
        assert!(item.description.is_empty());
    }

    #[test]
    fn tracker_request_needs_no_position() {
        let json = r#"{"id":"1201","name":"Support SSO","list":{"name":"NEW"}}"#;
        let item: WorkItem = serde_json::from_str(json).expect("valid request");
        assert_eq!(item.list.name, "NEW");
        assert!(item.position.abs() < f64::EPSILON);
    }

    #[test]
    fn has_any_label_matches_one_of_many() {
        let item = WorkItem::new("c1", ListRef::open("Done"), 1.0).with_labels(["no-qe", "devcut"]);
        assert!(item.has_any_label(&["tc-approved".into(), "no-qe".into()]));
        assert!(!item.has_any_label(&["tc-approved".into()]));
        assert!(!item.has_any_label(&[]));
    }

    #[test]
    fn comment_search_is_substring_based() {
        let item = WorkItem::new("c1", ListRef::open("Done"), 1.0)
            .with_comments(["see https://goo.gl/abc for the plan"]);
        assert!(item.has_comment_containing(&["tcms".into(), "goo.gl".into()]));
        assert!(!item.has_comment_containing(&["tcms".into()]));
    }
}
