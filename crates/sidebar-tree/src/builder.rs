//! Recursive sidebar item builder.
//!
//! Turns one directory into an ordered list of [`SidebarItem`]s:
//!
//! - Directories become group nodes labeled by meta title, extracted title,
//!   or prefix-stripped name. Groups with no children are pruned.
//! - If a directory's label came from its index file, the index leaf is
//!   folded into the group node as a direct link.
//! - Markdown files become leaves. Dash-prefixed files are hidden.
//! - A sidecar `order` list filters and reorders the result.
//!
//! Links are relative to the group base: `/<segments>/<stem>.html` for
//! files and `/<segments>/<dir>/` for folded directories.

use std::fs;
use std::io::ErrorKind;
use std::iter;
use std::path::Path;

use crate::error::BuildError;
use crate::item::SidebarItem;
use crate::meta::{MetaDescriptor, apply_order, load_meta};
use crate::options::BuildOptions;
use crate::walker::{INDEX_FILES, is_index_file, list_entries};

/// Items of one directory plus its already-parsed sidecar.
struct DirectoryItems {
    items: Vec<SidebarItem>,
    meta: Option<MetaDescriptor>,
}

/// Builds sidebar items for a directory subtree.
pub struct SidebarTreeBuilder<'a> {
    options: &'a BuildOptions,
}

impl<'a> SidebarTreeBuilder<'a> {
    /// Create a builder over the given options.
    #[must_use]
    pub fn new(options: &'a BuildOptions) -> Self {
        Self { options }
    }

    /// Build the ordered items for `dir`.
    ///
    /// `segments` is the path from the group root to `dir`, used for links.
    /// Pass an empty slice for the group root itself.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be listed or a sidecar is malformed.
    pub fn build_items(
        &self,
        dir: &Path,
        segments: &[String],
    ) -> Result<Vec<SidebarItem>, BuildError> {
        Ok(self.build_directory(dir, segments)?.items)
    }

    fn build_directory(
        &self,
        dir: &Path,
        segments: &[String],
    ) -> Result<DirectoryItems, BuildError> {
        let entries = list_entries(dir, &self.options.hooks)?;

        if self.options.ignore_index_item && entries.len() == 1 && entries[0] == "index.md" {
            return Ok(DirectoryItems {
                items: Vec::new(),
                meta: None,
            });
        }

        let meta = load_meta(dir, &self.options.meta_filename)?;

        let mut named = Vec::with_capacity(entries.len());
        for name in entries {
            let path = dir.join(&name);
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Entry vanished, skipping");
                    continue;
                }
                Err(e) => return Err(BuildError::io(path, e)),
            };

            let item = if metadata.is_dir() {
                self.directory_item(&path, &name, segments)?
            } else {
                self.file_item(&path, &name, segments)
            };
            if let Some(item) = item {
                named.push((name, item));
            }
        }

        let items = match meta.as_ref().and_then(|m| m.order.as_deref()) {
            Some(order) => apply_order(named, order, &dir.join(&self.options.meta_filename)),
            None => named.into_iter().map(|(_, item)| item).collect(),
        };

        Ok(DirectoryItems {
            items: (self.options.hooks.items_resolved)(items),
            meta,
        })
    }

    fn directory_item(
        &self,
        path: &Path,
        name: &str,
        segments: &[String],
    ) -> Result<Option<SidebarItem>, BuildError> {
        if self.options.ignore.is_ignored(name) {
            return Ok(None);
        }

        let child_segments: Vec<String> = segments
            .iter()
            .cloned()
            .chain(iter::once(name.to_owned()))
            .collect();
        let DirectoryItems { mut items, meta } = self.build_directory(path, &child_segments)?;

        let mut link = None;
        let text = if let Some(title) = meta.and_then(|m| m.title) {
            title
        } else if let Some((title, from_index)) = self.probe_directory_title(path, name) {
            if from_index {
                let index_link = leaf_link(&child_segments, "index");
                let (index, others): (Vec<_>, Vec<_>) = items
                    .into_iter()
                    .partition(|item| {
                        item.is_leaf() && item.link.as_deref() == Some(index_link.as_str())
                    });
                if !index.is_empty() {
                    link = Some(directory_link(&child_segments));
                }
                items = others;
            }
            title
        } else {
            self.options.derived_label(name)
        };

        if items.is_empty() {
            return Ok(None);
        }

        Ok(Some(SidebarItem {
            text,
            link,
            collapsed: self.options.collapsed,
            items,
        }))
    }

    /// Probe the index files, then `<dir>/<dir>.md`, for an extracted title.
    ///
    /// Returns the title and whether it came from an index file.
    fn probe_directory_title(&self, dir: &Path, name: &str) -> Option<(String, bool)> {
        let extractor = self.options.title_extractor.as_ref()?;
        let own_file = format!("{name}.md");

        INDEX_FILES
            .iter()
            .copied()
            .chain(iter::once(own_file.as_str()))
            .find_map(|candidate| {
                extractor
                    .extract(&dir.join(candidate))
                    .map(|title| (title, is_index_file(candidate)))
            })
    }

    fn file_item(&self, path: &Path, name: &str, segments: &[String]) -> Option<SidebarItem> {
        if (self.options.ignore_index_item && name == "index.md")
            || is_hidden(name)
            || self.options.ignore.is_ignored(name)
        {
            return None;
        }
        let stem = name.strip_suffix(".md")?;

        let text = self
            .options
            .title_extractor
            .as_ref()
            .and_then(|extractor| extractor.extract(path))
            .unwrap_or_else(|| self.options.derived_label(stem));

        Some(SidebarItem::leaf(text, leaf_link(segments, stem)))
    }
}

/// Dash-prefixed markdown files are never listed.
fn is_hidden(name: &str) -> bool {
    name.starts_with('-') && (name.ends_with(".md") || name.ends_with(".MD"))
}

fn leaf_link(segments: &[String], stem: &str) -> String {
    let mut link = String::from("/");
    for segment in segments {
        link.push_str(segment);
        link.push('/');
    }
    link.push_str(stem);
    link.push_str(".html");
    link
}

fn directory_link(segments: &[String]) -> String {
    format!("/{}/", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::options::PrefixRule;
    use crate::title::HeadingTitle;
    use std::sync::Arc;

    fn create_test_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let full = temp_dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        temp_dir
    }

    fn texts(items: &[SidebarItem]) -> Vec<&str> {
        items.iter().map(|item| item.text.as_str()).collect()
    }

    #[test]
    fn test_links() {
        assert_eq!(leaf_link(&[], "intro"), "/intro.html");
        assert_eq!(
            leaf_link(&["a".to_owned(), "b".to_owned()], "c"),
            "/a/b/c.html"
        );
        assert_eq!(directory_link(&["a".to_owned()]), "/a/");
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden("-draft.md"));
        assert!(is_hidden("-draft.MD"));
        assert!(!is_hidden("draft-.md"));
        assert!(!is_hidden("-notes.txt"));
    }

    #[test]
    fn test_files_become_leaves() {
        let temp_dir = create_test_dir(&[
            ("index.md", "# Home"),
            ("b.md", ""),
            ("a.md", ""),
            ("notes.txt", ""),
            ("-hidden.md", ""),
        ]);
        let options = BuildOptions::new(temp_dir.path());

        let items = SidebarTreeBuilder::new(&options)
            .build_items(temp_dir.path(), &[])
            .unwrap();

        assert_eq!(
            items,
            vec![
                SidebarItem::leaf("index", "/index.html"),
                SidebarItem::leaf("a", "/a.html"),
                SidebarItem::leaf("b", "/b.html"),
            ]
        );
    }

    #[test]
    fn test_nested_directory_links() {
        let temp_dir = create_test_dir(&[("setup/linux.md", "")]);
        let options = BuildOptions::new(temp_dir.path());

        let items = SidebarTreeBuilder::new(&options)
            .build_items(temp_dir.path(), &[])
            .unwrap();

        assert_eq!(
            items,
            vec![SidebarItem {
                text: "setup".to_owned(),
                link: None,
                collapsed: None,
                items: vec![SidebarItem::leaf("linux", "/setup/linux.html")],
            }]
        );
    }

    #[test]
    fn test_empty_directory_pruned() {
        let temp_dir = create_test_dir(&[("a.md", ""), ("empty/notes.txt", "")]);
        fs::create_dir(temp_dir.path().join("really-empty")).unwrap();
        let options = BuildOptions::new(temp_dir.path());

        let items = SidebarTreeBuilder::new(&options)
            .build_items(temp_dir.path(), &[])
            .unwrap();

        assert_eq!(texts(&items), vec!["a"]);
    }

    #[test]
    fn test_titled_empty_directory_pruned() {
        let temp_dir = create_test_dir(&[
            ("a.md", ""),
            ("empty/.sidebar.meta.json", r#"{"title": "Empty"}"#),
        ]);
        let options = BuildOptions::new(temp_dir.path());

        let items = SidebarTreeBuilder::new(&options)
            .build_items(temp_dir.path(), &[])
            .unwrap();

        assert_eq!(texts(&items), vec!["a"]);
    }

    #[test]
    fn test_ignore_index_item_drops_index() {
        let temp_dir = create_test_dir(&[
            ("index.md", ""),
            ("a.md", ""),
            ("only-index/index.md", ""),
        ]);
        let mut options = BuildOptions::new(temp_dir.path());
        options.ignore_index_item = true;

        let items = SidebarTreeBuilder::new(&options)
            .build_items(temp_dir.path(), &[])
            .unwrap();

        assert_eq!(texts(&items), vec!["a"]);
    }

    #[test]
    fn test_index_folded_into_directory() {
        let temp_dir = create_test_dir(&[
            ("guide/index.md", "# The Guide"),
            ("guide/install.md", "# Installing"),
        ]);
        let options =
            BuildOptions::new(temp_dir.path()).with_title_extractor(Arc::new(HeadingTitle));

        let items = SidebarTreeBuilder::new(&options)
            .build_items(temp_dir.path(), &[])
            .unwrap();

        assert_eq!(
            items,
            vec![SidebarItem {
                text: "The Guide".to_owned(),
                link: Some("/guide/".to_owned()),
                collapsed: None,
                items: vec![SidebarItem::leaf("Installing", "/guide/install.html")],
            }]
        );
    }

    #[test]
    fn test_own_named_file_title_not_folded() {
        let temp_dir = create_test_dir(&[
            ("api/api.md", "# API Reference"),
            ("api/client.md", ""),
        ]);
        let options =
            BuildOptions::new(temp_dir.path()).with_title_extractor(Arc::new(HeadingTitle));

        let items = SidebarTreeBuilder::new(&options)
            .build_items(temp_dir.path(), &[])
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "API Reference");
        assert!(items[0].link.is_none());
        assert_eq!(texts(&items[0].items), vec!["API Reference", "client"]);
    }

    #[test]
    fn test_meta_title_beats_extracted() {
        let temp_dir = create_test_dir(&[
            ("guide/index.md", "# From Index"),
            ("guide/a.md", ""),
            ("guide/.sidebar.meta.json", r#"{"title": "From Meta"}"#),
        ]);
        let options =
            BuildOptions::new(temp_dir.path()).with_title_extractor(Arc::new(HeadingTitle));

        let items = SidebarTreeBuilder::new(&options)
            .build_items(temp_dir.path(), &[])
            .unwrap();

        assert_eq!(items[0].text, "From Meta");
        assert!(items[0].link.is_none());
        // Index leaf stays because the meta title won
        assert_eq!(items[0].items.len(), 2);
    }

    #[test]
    fn test_meta_order_applied() {
        let temp_dir = create_test_dir(&[
            ("a.md", ""),
            ("b.md", ""),
            ("c.md", ""),
            (".sidebar.meta.json", r#"{"order": ["c.md", "a.md"]}"#),
        ]);
        let options = BuildOptions::new(temp_dir.path());

        let items = SidebarTreeBuilder::new(&options)
            .build_items(temp_dir.path(), &[])
            .unwrap();

        assert_eq!(texts(&items), vec!["c", "a"]);
    }

    #[test]
    fn test_malformed_meta_is_fatal() {
        let temp_dir = create_test_dir(&[("guide/a.md", ""), ("guide/.sidebar.meta.json", "[")]);
        let options = BuildOptions::new(temp_dir.path());

        let result = SidebarTreeBuilder::new(&options).build_items(temp_dir.path(), &[]);
        assert!(matches!(result, Err(BuildError::InvalidMeta { .. })));
    }

    #[test]
    fn test_prefix_stripped_from_derived_labels() {
        let temp_dir = create_test_dir(&[("01-setup/02-linux.md", "")]);
        let mut options = BuildOptions::new(temp_dir.path());
        options.delete_prefix = Some(PrefixRule::Pattern(regex::Regex::new(r"^\d+-").unwrap()));

        let items = SidebarTreeBuilder::new(&options)
            .build_items(temp_dir.path(), &[])
            .unwrap();

        assert_eq!(items[0].text, "setup");
        assert_eq!(items[0].items[0].text, "linux");
        // Links keep the real names
        assert_eq!(
            items[0].items[0].link.as_deref(),
            Some("/01-setup/02-linux.html")
        );
    }

    #[test]
    fn test_collapsed_propagated_to_groups() {
        let temp_dir = create_test_dir(&[("a.md", ""), ("sub/b.md", "")]);
        let mut options = BuildOptions::new(temp_dir.path());
        options.collapsed = Some(false);

        let items = SidebarTreeBuilder::new(&options)
            .build_items(temp_dir.path(), &[])
            .unwrap();

        assert_eq!(items[0].collapsed, None);
        assert_eq!(items[1].collapsed, Some(false));
    }

    #[test]
    fn test_ignored_directory_skipped() {
        let temp_dir = create_test_dir(&[("a.md", ""), ("assets/img.md", ""), ("drafts/x.md", "")]);
        let mut options = BuildOptions::new(temp_dir.path());
        options.ignore = crate::ignore::IgnoreRules::from_config(&["drafts".to_owned()], &[])
            .unwrap();

        let items = SidebarTreeBuilder::new(&options)
            .build_items(temp_dir.path(), &[])
            .unwrap();

        assert_eq!(texts(&items), vec!["a"]);
    }
}
