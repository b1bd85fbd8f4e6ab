// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Microformats2 document model.
//!
//! Mirrors the canonical mf2 JSON shape (`items`, `type`, `properties`,
//! `value`, `children`, `rels`) so parsed documents serialize directly into
//! Webmention reports.
//!
//! Properties keep document order; the matcher reports property names in
//! the order it meets them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parsed microformats2 document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mf2Document {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub rels: BTreeMap<String, Vec<String>>,
}

/// A microformat item such as `h-entry` or `h-cite`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type")]
    pub types: Vec<String>,
    #[serde(default)]
    pub properties: IndexMap<String, Vec<PropertyValue>>,
    /// Identifying value of an item nested as a property value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Item>,
}

/// One entry in a property's value sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    /// A nested microformat.
    Item(Item),
    /// Embedded markup from an `e-*` property.
    Fragment { html: String, value: String },
    /// Image URL with alternative text, from `u-photo` and friends.
    Image {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
}

impl Mf2Document {
    /// Load a document from canonical mf2 JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Number of items, nested ones included.
    pub fn item_count(&self) -> usize {
        self.items.iter().map(Item::item_count).sum()
    }
}

impl Item {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Builder-style property append, mostly for tests and fixtures.
    pub fn with(mut self, name: &str, value: PropertyValue) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: &str, value: PropertyValue) {
        self.properties
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    pub fn has_type(&self, ty: &str) -> bool {
        self.types.iter().any(|t| t == ty)
    }

    /// First plain-text value of a property.
    pub fn first_text(&self, name: &str) -> Option<&str> {
        self.properties.get(name)?.iter().find_map(|v| match v {
            PropertyValue::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    fn item_count(&self) -> usize {
        let nested: usize = self
            .properties
            .values()
            .flatten()
            .map(|v| match v {
                PropertyValue::Item(item) => item.item_count(),
                _ => 0,
            })
            .sum();
        let children: usize = self.children.iter().map(Item::item_count).sum();
        1 + nested + children
    }
}

impl PropertyValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Self::Item(item) => Some(item),
            _ => None,
        }
    }
}
