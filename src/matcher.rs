// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Target matching over a parsed microformats2 document.
//!
//! Every item is visited: top-level items, items nested as property values,
//! and `children`. For each property value:
//!
//! - a plain string matches when it equals the target
//! - an embedded fragment, an image, or a nested item carrying a `value`
//!   matches when that value equals the target
//! - a nested item without a `value` matches when any string inside it
//!   contains the target
//!
//! The substring fallback is deliberately loose: any incidental occurrence
//! of the target counts, whatever the property means.

use crate::mf2::{Item, Mf2Document, PropertyValue};
use serde::{Deserialize, Serialize};

/// Property names that referenced the target, in discovery order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchSet(Vec<String>);

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`; returns false if it was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.0.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Find every property in `document` whose values reference `target`.
///
/// Returns an empty set when nothing matches.
pub fn find_matches(document: &Mf2Document, target: &str) -> MatchSet {
    let mut matches = MatchSet::new();
    for item in &document.items {
        walk_item(item, target, &mut matches);
    }
    matches
}

fn walk_item(item: &Item, target: &str, matches: &mut MatchSet) {
    for (name, values) in &item.properties {
        for value in values {
            if value_matches(value, target) {
                matches.insert(name);
            }
            if let PropertyValue::Item(nested) = value {
                walk_item(nested, target, matches);
            }
        }
    }

    for child in &item.children {
        walk_item(child, target, matches);
    }
}

fn value_matches(value: &PropertyValue, target: &str) -> bool {
    match value {
        PropertyValue::Text(s) => s == target,
        PropertyValue::Fragment { value, .. } | PropertyValue::Image { value, .. } => {
            value == target
        }
        PropertyValue::Item(item) => match &item.value {
            Some(v) => v == target,
            None => item_contains(item, target),
        },
    }
}

/// Substring search over every string reachable from `item`.
fn item_contains(item: &Item, target: &str) -> bool {
    item.types.iter().any(|t| t.contains(target))
        || item.properties.iter().any(|(name, values)| {
            name.contains(target) || values.iter().any(|v| value_contains(v, target))
        })
        || item.children.iter().any(|c| item_contains(c, target))
}

fn value_contains(value: &PropertyValue, target: &str) -> bool {
    match value {
        PropertyValue::Text(s) => s.contains(target),
        PropertyValue::Fragment { html, value } => html.contains(target) || value.contains(target),
        PropertyValue::Image { value, alt } => {
            value.contains(target) || alt.as_deref().is_some_and(|a| a.contains(target))
        }
        PropertyValue::Item(item) => {
            item.value.as_deref().is_some_and(|v| v.contains(target)) || item_contains(item, target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: &str = "https://example-target.com/notes/target";

    fn doc(items: Vec<Item>) -> Mf2Document {
        Mf2Document {
            items,
            ..Default::default()
        }
    }

    fn names(set: &MatchSet) -> Vec<&str> {
        set.iter().collect()
    }

    #[test]
    fn test_plain_reply_matches() {
        let d = doc(vec![
            Item::new(["h-entry"]).with("in-reply-to", PropertyValue::text(TARGET))
        ]);
        assert_eq!(names(&find_matches(&d, TARGET)), vec!["in-reply-to"]);
    }

    #[test]
    fn test_plain_string_requires_equality() {
        let d = doc(vec![Item::new(["h-entry"])
            .with("in-reply-to", PropertyValue::text(format!("{TARGET}/comments")))]);
        assert!(find_matches(&d, TARGET).is_empty());
    }

    #[test]
    fn test_nested_item_with_value_uses_equality() {
        let mut cite = Item::new(["h-cite"]).with("url", PropertyValue::text(TARGET));
        cite.value = Some("Some other title".to_string());
        let d = doc(vec![
            Item::new(["h-entry"]).with("repost-of", PropertyValue::Item(cite))
        ]);

        // The value does not equal the target, but the nested url property does
        assert_eq!(names(&find_matches(&d, TARGET)), vec!["url"]);
    }

    #[test]
    fn test_nested_item_value_equal_to_target() {
        let mut cite = Item::new(["h-cite"]).with("name", PropertyValue::text("Target"));
        cite.value = Some(TARGET.to_string());
        let d = doc(vec![
            Item::new(["h-entry"]).with("like-of", PropertyValue::Item(cite))
        ]);
        assert_eq!(names(&find_matches(&d, TARGET)), vec!["like-of"]);
    }

    #[test]
    fn test_nested_item_without_value_uses_substring() {
        let card = Item::new(["h-cite"]).with(
            "content",
            PropertyValue::text(format!("see {TARGET} for details")),
        );
        let d = doc(vec![
            Item::new(["h-entry"]).with("mention-of", PropertyValue::Item(card))
        ]);
        assert_eq!(names(&find_matches(&d, TARGET)), vec!["mention-of"]);
    }

    #[test]
    fn test_fragment_matches_on_value_only() {
        let d = doc(vec![Item::new(["h-entry"]).with(
            "content",
            PropertyValue::Fragment {
                html: format!("<a href=\"{TARGET}\">link</a>"),
                value: "link".to_string(),
            },
        )]);
        assert!(find_matches(&d, TARGET).is_empty());

        let d = doc(vec![Item::new(["h-entry"]).with(
            "content",
            PropertyValue::Fragment {
                html: format!("<a href=\"{TARGET}\">{TARGET}</a>"),
                value: TARGET.to_string(),
            },
        )]);
        assert_eq!(names(&find_matches(&d, TARGET)), vec!["content"]);
    }

    #[test]
    fn test_duplicates_collapsed() {
        let d = doc(vec![
            Item::new(["h-entry"])
                .with("in-reply-to", PropertyValue::text(TARGET))
                .with("in-reply-to", PropertyValue::text(TARGET)),
            Item::new(["h-entry"]).with("in-reply-to", PropertyValue::text(TARGET)),
        ]);
        let matches = find_matches(&d, TARGET);
        assert_eq!(matches.len(), 1);
        assert!(matches.contains("in-reply-to"));
    }

    #[test]
    fn test_discovery_order() {
        let d = doc(vec![
            Item::new(["h-entry"]).with("like-of", PropertyValue::text(TARGET)),
            Item::new(["h-entry"])
                .with("bookmark-of", PropertyValue::text(TARGET))
                .with("like-of", PropertyValue::text(TARGET)),
        ]);
        assert_eq!(
            names(&find_matches(&d, TARGET)),
            vec!["like-of", "bookmark-of"]
        );
    }

    #[test]
    fn test_document_order_within_item() {
        let d = doc(vec![Item::new(["h-entry"])
            .with("like-of", PropertyValue::text(TARGET))
            .with("bookmark-of", PropertyValue::text(TARGET))]);
        assert_eq!(
            names(&find_matches(&d, TARGET)),
            vec!["like-of", "bookmark-of"]
        );
    }

    #[test]
    fn test_image_matches_on_value() {
        let d = doc(vec![Item::new(["h-entry"]).with(
            "photo",
            PropertyValue::Image {
                value: TARGET.to_string(),
                alt: Some("A photo".to_string()),
            },
        )]);
        assert_eq!(names(&find_matches(&d, TARGET)), vec!["photo"]);
    }

    #[test]
    fn test_children_are_walked() {
        let mut feed = Item::new(["h-feed"]);
        feed.children
            .push(Item::new(["h-entry"]).with("in-reply-to", PropertyValue::text(TARGET)));
        let d = doc(vec![feed]);
        assert_eq!(names(&find_matches(&d, TARGET)), vec!["in-reply-to"]);
    }

    #[test]
    fn test_no_items_no_matches() {
        assert!(find_matches(&Mf2Document::default(), TARGET).is_empty());
    }

    #[test]
    fn test_match_set_serializes_as_list() {
        let mut set = MatchSet::new();
        assert!(set.insert("in-reply-to"));
        assert!(!set.insert("in-reply-to"));
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["in-reply-to"]"#);
    }
}
