//! Build options threaded through every traversal call.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use regex::Regex;
use sidebar_config::{Config, DEFAULT_META_FILENAME, LocaleConfig};

use crate::error::BuildError;
use crate::ignore::IgnoreRules;
use crate::item::{SidebarItem, SidebarMulti};
use crate::title::{TitleExtractor, TitleStrategy};

/// Transform of a directory's raw, index-first entry list.
pub type BeforeCreateItemsFn = Arc<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>;
/// Transform of a directory's finished item list.
pub type ItemsResolvedFn = Arc<dyn Fn(Vec<SidebarItem>) -> Vec<SidebarItem> + Send + Sync>;
/// Transform of a finished sidebar map.
pub type SidebarResolvedFn = Arc<dyn Fn(SidebarMulti) -> SidebarMulti + Send + Sync>;

/// Optional override hooks. Each defaults to identity.
#[derive(Clone)]
pub struct Hooks {
    /// Runs on each directory listing before entries are processed.
    pub before_create_items: BeforeCreateItemsFn,
    /// Runs on each directory's items after meta ordering.
    pub items_resolved: ItemsResolvedFn,
    /// Runs on each top-level sidebar map.
    pub sidebar_resolved: SidebarResolvedFn,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            before_create_items: Arc::new(|names| names),
            items_resolved: Arc::new(|items| items),
            sidebar_resolved: Arc::new(|multi| multi),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}

/// Prefix removed from derived labels.
#[derive(Clone, Debug)]
pub enum PrefixRule {
    /// Strip this exact leading string.
    Literal(String),
    /// Remove the first match of this regex.
    Pattern(Regex),
}

impl PrefixRule {
    /// Apply the rule to a derived label.
    #[must_use]
    pub fn strip(&self, label: &str) -> String {
        match self {
            Self::Literal(prefix) => label
                .strip_prefix(prefix.as_str())
                .unwrap_or(label)
                .to_owned(),
            Self::Pattern(pattern) => pattern.replacen(label, 1, "").into_owned(),
        }
    }
}

/// Everything a build needs, read-only for the duration of one build.
#[derive(Clone)]
pub struct BuildOptions {
    /// Docs root containing the top-level groups (or locale directories).
    pub root: PathBuf,
    /// Exclusion rules, including the built-in folder names.
    pub ignore: IgnoreRules,
    /// Title extractor; `None` disables extraction.
    pub title_extractor: Option<Arc<dyn TitleExtractor>>,
    /// Prefix removed from derived labels.
    pub delete_prefix: Option<PrefixRule>,
    /// Collapsed flag attached to every directory node.
    pub collapsed: Option<bool>,
    /// Sidecar metadata filename.
    pub meta_filename: String,
    /// Drop `index.md` as a standalone leaf.
    pub ignore_index_item: bool,
    /// Locale definitions keyed by locale key.
    pub locales: BTreeMap<String, LocaleConfig>,
    /// Override hooks.
    pub hooks: Hooks,
}

impl fmt::Debug for BuildOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildOptions")
            .field("root", &self.root)
            .field("ignore", &self.ignore)
            .field("title_extractor", &self.title_extractor.is_some())
            .field("delete_prefix", &self.delete_prefix)
            .field("collapsed", &self.collapsed)
            .field("meta_filename", &self.meta_filename)
            .field("ignore_index_item", &self.ignore_index_item)
            .field("locales", &self.locales)
            .finish_non_exhaustive()
    }
}

impl BuildOptions {
    /// Create options with defaults for the given docs root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore: IgnoreRules::default(),
            title_extractor: None,
            delete_prefix: None,
            collapsed: None,
            meta_filename: DEFAULT_META_FILENAME.to_owned(),
            ignore_index_item: false,
            locales: BTreeMap::new(),
            hooks: Hooks::default(),
        }
    }

    /// Compile options from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::InvalidPattern` if an ignore or prefix regex is invalid.
    pub fn from_config(config: &Config) -> Result<Self, BuildError> {
        let sidebar = &config.sidebar;

        let ignore = IgnoreRules::from_config(&sidebar.ignore_list, &sidebar.ignore_patterns)?;

        let delete_prefix = match (&sidebar.delete_prefix, &sidebar.delete_prefix_pattern) {
            (_, Some(pattern)) => Some(PrefixRule::Pattern(Regex::new(pattern).map_err(
                |source| BuildError::InvalidPattern {
                    field: "sidebar.delete_prefix_pattern",
                    source,
                },
            )?)),
            (Some(prefix), None) => Some(PrefixRule::Literal(prefix.clone())),
            (None, None) => None,
        };

        let strategy =
            TitleStrategy::from_flags(sidebar.title_from_file, sidebar.title_from_file_by_yaml);

        Ok(Self {
            root: config.docs_resolved.source_dir.clone(),
            ignore,
            title_extractor: strategy.extractor(),
            delete_prefix,
            collapsed: sidebar.collapsed,
            meta_filename: sidebar.meta_filename.clone(),
            ignore_index_item: sidebar.ignore_index_item,
            locales: config.locales.clone(),
            hooks: Hooks::default(),
        })
    }

    /// Replace the override hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Replace the title extractor.
    #[must_use]
    pub fn with_title_extractor(mut self, extractor: Arc<dyn TitleExtractor>) -> Self {
        self.title_extractor = Some(extractor);
        self
    }

    /// Apply the configured prefix rule to a derived label.
    pub(crate) fn derived_label(&self, name: &str) -> String {
        match &self.delete_prefix {
            Some(rule) => rule.strip(name),
            None => name.to_owned(),
        }
    }
}
