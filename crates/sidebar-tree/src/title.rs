//! Title extraction from markdown files.
//!
//! Extractors never fail: a missing or unreadable file, or a file without
//! the expected marker, yields `None` and the caller falls back to a
//! derived label.

use std::fs;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Deserialize;

/// First `# ` heading in a document.
static H1_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());

/// Reads a display title out of a candidate file.
pub trait TitleExtractor: Send + Sync {
    /// Return the file's title, or `None` if the file is missing or has none.
    fn extract(&self, path: &Path) -> Option<String>;
}

/// Title from the first level-one heading.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadingTitle;

impl TitleExtractor for HeadingTitle {
    fn extract(&self, path: &Path) -> Option<String> {
        let content = fs::read_to_string(path).ok()?;
        heading_title(&content)
    }
}

/// Title from the `title` field of a leading YAML front matter block.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrontMatterTitle;

impl TitleExtractor for FrontMatterTitle {
    fn extract(&self, path: &Path) -> Option<String> {
        let content = fs::read_to_string(path).ok()?;
        front_matter_title(&content)
    }
}

/// Which extractor a build uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TitleStrategy {
    /// Labels come from file and directory names only.
    #[default]
    None,
    /// First `# ` heading.
    Heading,
    /// Front matter `title`.
    FrontMatter,
}

impl TitleStrategy {
    /// Select a strategy from the two config flags. Heading wins if both are set.
    #[must_use]
    pub fn from_flags(from_heading: bool, from_front_matter: bool) -> Self {
        if from_heading {
            Self::Heading
        } else if from_front_matter {
            Self::FrontMatter
        } else {
            Self::None
        }
    }

    /// Instantiate the extractor, if any.
    #[must_use]
    pub fn extractor(self) -> Option<Arc<dyn TitleExtractor>> {
        match self {
            Self::None => None,
            Self::Heading => Some(Arc::new(HeadingTitle)),
            Self::FrontMatter => Some(Arc::new(FrontMatterTitle)),
        }
    }
}

fn heading_title(content: &str) -> Option<String> {
    H1_REGEX
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|title| !title.is_empty())
}

#[derive(Deserialize)]
struct FrontMatter {
    title: Option<String>,
}

/// Split a `---`-delimited front matter block off the start of `content`.
fn split_front_matter(content: &str) -> Option<&str> {
    let rest = content
        .strip_prefix("---\r\n")
        .or_else(|| content.strip_prefix("---\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some(&rest[..offset]);
        }
        offset += line.len();
    }
    None
}

fn front_matter_title(content: &str) -> Option<String> {
    let yaml = split_front_matter(content)?;
    let front: FrontMatter = serde_yaml::from_str(yaml).ok()?;
    front
        .title
        .map(|title| title.trim().to_owned())
        .filter(|title| !title.is_empty())
}
