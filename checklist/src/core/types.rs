//! Checklist item types.
//!
//! These types are the persisted contract as well as the in-memory model. They
//! carry no I/O and no clock; id generation is the only source of randomness.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque item identifier, stable for the lifetime of the item.
///
/// Freshly created items get a random UUID. Ids read from storage are kept
/// verbatim, whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, used for display.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Free-text label; `None` means uncategorized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Missing in stored data means not done.
    #[serde(default)]
    pub done: bool,
}

/// Validated input for creating an item.
///
/// Construction trims both fields. A blank title yields `None`; a blank
/// category becomes uncategorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    title: String,
    category: Option<String>,
}

impl NewItem {
    pub fn parse(title: &str, category: Option<&str>) -> Option<Self> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let category = category
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Some(Self {
            title: title.to_string(),
            category,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Build the item with a fresh id and `done = false`.
    pub fn into_item(self) -> Item {
        Item {
            id: ItemId::generate(),
            title: self.title,
            category: self.category,
            done: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_title_and_category() {
        let input = NewItem::parse(" Towel ", Some(" Textile ")).expect("valid");
        assert_eq!(input.title(), "Towel");
        assert_eq!(input.category(), Some("Textile"));
    }

    #[test]
    fn parse_rejects_blank_title() {
        assert_eq!(NewItem::parse("   ", Some("x")), None);
        assert_eq!(NewItem::parse("", None), None);
    }

    #[test]
    fn blank_category_is_uncategorized() {
        let input = NewItem::parse("Plates", Some("  ")).expect("valid");
        assert_eq!(input.category(), None);
    }

    #[test]
    fn new_items_start_not_done() {
        let item = NewItem::parse("Cups", None).expect("valid").into_item();
        assert!(!item.done);
        assert!(!item.id.as_str().is_empty());
    }

    #[test]
    fn missing_done_defaults_to_false() {
        let item: Item = serde_json::from_str(r#"{"id":"1","title":"Towel"}"#).expect("parse");
        assert!(!item.done);
        assert_eq!(item.category, None);
    }

    #[test]
    fn absent_category_is_omitted_on_write() {
        let item = Item {
            id: ItemId::from("1"),
            title: "Towel".to_string(),
            category: None,
            done: true,
        };
        let json = serde_json::to_string(&item).expect("serialize");
        assert_eq!(json, r#"{"id":"1","title":"Towel","done":true}"#);
    }

    #[test]
    fn short_id_is_a_prefix() {
        let id = ItemId::from("0123456789abcdef");
        assert_eq!(id.short(), "01234567");
        assert_eq!(ItemId::from("abc").short(), "abc");
    }
}
