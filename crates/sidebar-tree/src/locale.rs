//! Top-level grouping into sidebar maps.
//!
//! Each immediate subdirectory of the docs root becomes one group keyed by
//! `/<dir>/`. With locales configured, grouping runs once per locale under
//! `<root>/<lang>` and keys become `/<lang>/<dir>/`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use sidebar_config::LocaleConfig;

use crate::builder::SidebarTreeBuilder;
use crate::error::BuildError;
use crate::item::{SidebarGroup, SidebarMulti, SidebarOutput};
use crate::options::BuildOptions;
use crate::walker::sorted_names;

/// Composes per-directory builds into the final sidebar output.
pub struct LocaleGrouper<'a> {
    options: &'a BuildOptions,
}

impl<'a> LocaleGrouper<'a> {
    /// Create a grouper over the given options.
    #[must_use]
    pub fn new(options: &'a BuildOptions) -> Self {
        Self { options }
    }

    /// Build the sidebar using the locales from the options.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::MissingLocaleLang` before any traversal if a
    /// locale has no language tag, or any error from the tree build.
    pub fn build(&self) -> Result<SidebarOutput, BuildError> {
        if self.options.locales.is_empty() {
            return self.build_root().map(SidebarOutput::Single);
        }
        self.build_with_locales(&self.options.locales)
            .map(SidebarOutput::Localized)
    }

    /// Build one sidebar map per locale key.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::MissingLocaleLang` before any traversal if a
    /// locale has no language tag, or any error from the tree build.
    pub fn build_with_locales(
        &self,
        locales: &BTreeMap<String, LocaleConfig>,
    ) -> Result<BTreeMap<String, SidebarMulti>, BuildError> {
        let langs = resolve_langs(locales)?;

        let mut result = BTreeMap::new();
        for (key, lang) in langs {
            result.insert(key.to_owned(), self.build_locale(lang)?);
        }
        Ok(result)
    }

    /// Build the single map for the docs root, ignoring locales.
    ///
    /// # Errors
    ///
    /// Returns an error if the docs root cannot be read or the tree build fails.
    pub fn build_root(&self) -> Result<SidebarMulti, BuildError> {
        self.build_multi(&self.options.root, None)
    }

    /// Build the sidebar map for one language directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `<root>/<lang>` cannot be read or the tree build fails.
    pub fn build_locale(&self, lang: &str) -> Result<SidebarMulti, BuildError> {
        self.build_multi(&self.options.root.join(lang), Some(lang))
    }

    /// Build the map for the top-level directories of `dir`.
    fn build_multi(&self, dir: &Path, lang: Option<&str>) -> Result<SidebarMulti, BuildError> {
        let prefix = lang.map(|lang| format!("/{lang}")).unwrap_or_default();
        let builder = SidebarTreeBuilder::new(self.options);

        let mut multi = SidebarMulti::new();
        for name in sorted_names(dir)? {
            if self.options.ignore.is_ignored(&name) {
                continue;
            }
            let path = dir.join(&name);
            if !fs::metadata(&path).is_ok_and(|m| m.is_dir()) {
                continue;
            }

            let base = format!("{prefix}/{name}/");
            let items = builder.build_items(&path, &[])?;
            multi.insert(base.clone(), SidebarGroup { base, items });
        }

        if self.options.ignore_index_item {
            multi.retain(|_, group| !group.items.is_empty());
        }

        Ok((self.options.hooks.sidebar_resolved)(multi))
    }
}

/// Check every locale for a non-empty language tag.
fn resolve_langs(
    locales: &BTreeMap<String, LocaleConfig>,
) -> Result<Vec<(&str, &str)>, BuildError> {
    locales
        .iter()
        .map(|(key, locale)| match locale.lang.as_deref() {
            Some(lang) if !lang.is_empty() => Ok((key.as_str(), lang)),
            _ => Err(BuildError::MissingLocaleLang(key.clone())),
        })
        .collect()
}
