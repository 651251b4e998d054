//! Sidebar output types.
//!
//! These serialize to the shape the site generator's theme consumes:
//! `{ "<base>": { "base": "<base>", "items": [...] } }`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Navigation node: a link leaf or a labeled group with children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarItem {
    /// Display label.
    pub text: String,
    /// Route path. Absent for pure grouping nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Display flag propagated from configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    /// Child items. Empty for file leaves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<SidebarItem>,
}

impl SidebarItem {
    /// Create a leaf item pointing at a page route.
    #[must_use]
    pub fn leaf(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: Some(link.into()),
            collapsed: None,
            items: Vec::new(),
        }
    }

    /// Returns true if this item has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.items.is_empty()
    }
}

/// One top-level sidebar group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarGroup {
    /// Base path of the group (e.g., "/guide/", "/zh/guide/").
    pub base: String,
    /// Items of the group.
    pub items: Vec<SidebarItem>,
}

/// Sidebar map keyed by group base path.
pub type SidebarMulti = BTreeMap<String, SidebarGroup>;

/// Final build result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SidebarOutput {
    /// No locales configured: one map for the whole docs root.
    Single(SidebarMulti),
    /// One independent map per locale key.
    Localized(BTreeMap<String, SidebarMulti>),
}

impl SidebarOutput {
    /// Total number of top-level groups across all maps.
    #[must_use]
    pub fn group_count(&self) -> usize {
        match self {
            Self::Single(multi) => multi.len(),
            Self::Localized(locales) => locales.values().map(BTreeMap::len).sum(),
        }
    }
}
