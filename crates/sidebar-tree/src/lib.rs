//! Directory-tree to sidebar navigation builder.
//!
//! This crate compiles a documentation directory into the sidebar structure
//! consumed by the site generator's theme. It handles:
//!
//! - Index-first, byte-sorted directory traversal
//! - Exclusion by exact name, regex, and built-in non-content folders
//! - Titles from sidecar metadata, first heading, or YAML front matter
//! - Sidecar `order` lists, empty-directory pruning, and index folding
//! - Locale-scoped sidebar maps and injection into a site config document
//!
//! # Example
//!
//! ```ignore
//! use sidebar_config::Config;
//! use sidebar_tree::{BuildOptions, build_sidebar};
//!
//! let config = Config::load(None, None)?;
//! let options = BuildOptions::from_config(&config)?;
//! let sidebar = build_sidebar(&options)?;
//! let json = serde_json::to_string_pretty(&sidebar)?;
//! ```

mod builder;
mod error;
mod ignore;
mod item;
mod locale;
mod meta;
mod options;
mod site;
mod title;
mod walker;

pub use builder::SidebarTreeBuilder;
pub use error::BuildError;
pub use ignore::{DEFAULT_IGNORE_FOLDERS, IgnoreRule, IgnoreRules};
pub use item::{SidebarGroup, SidebarItem, SidebarMulti, SidebarOutput};
pub use locale::LocaleGrouper;
pub use meta::{MetaDescriptor, load_meta};
pub use options::{
    BeforeCreateItemsFn, BuildOptions, Hooks, ItemsResolvedFn, PrefixRule, SidebarResolvedFn,
};
pub use site::inject_sidebar;
pub use title::{FrontMatterTitle, HeadingTitle, TitleExtractor, TitleStrategy};
pub use walker::{INDEX_FILES, is_index_file, list_entries};

/// Build the complete sidebar for the options' docs root and locales.
///
/// # Errors
///
/// Returns an error if a locale lacks a language tag, a directory cannot be
/// read, or a sidecar metadata file is malformed.
pub fn build_sidebar(options: &BuildOptions) -> Result<SidebarOutput, BuildError> {
    LocaleGrouper::new(options).build()
}
