//! Ignore rule evaluation.

use regex::Regex;

use crate::error::BuildError;

/// Folder names never treated as content, regardless of configuration.
pub const DEFAULT_IGNORE_FOLDERS: &[&str] =
    &["scripts", "components", "assets", ".vitepress", "public"];

/// A single exclusion rule.
#[derive(Clone, Debug)]
pub enum IgnoreRule {
    /// Matches a name exactly.
    Exact(String),
    /// Matches any name the regex finds a match in.
    Pattern(Regex),
}

impl IgnoreRule {
    /// Returns true if this rule excludes `name`.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => exact == name,
            Self::Pattern(pattern) => pattern.is_match(name),
        }
    }
}

/// Set of exclusion rules. A name is excluded if any rule matches it.
#[derive(Clone, Debug)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl IgnoreRules {
    /// Create a rule set from user rules plus the built-in folder names.
    #[must_use]
    pub fn new(user_rules: Vec<IgnoreRule>) -> Self {
        let mut rules: Vec<IgnoreRule> = DEFAULT_IGNORE_FOLDERS
            .iter()
            .map(|name| IgnoreRule::Exact((*name).to_owned()))
            .collect();
        rules.extend(user_rules);
        Self { rules }
    }

    /// Compile rules from configuration strings.
    ///
    /// `exact` names are matched verbatim; `patterns` are regexes.
    pub fn from_config(exact: &[String], patterns: &[String]) -> Result<Self, BuildError> {
        let mut user_rules: Vec<IgnoreRule> =
            exact.iter().cloned().map(IgnoreRule::Exact).collect();
        for pattern in patterns {
            let regex = Regex::new(pattern).map_err(|source| BuildError::InvalidPattern {
                field: "sidebar.ignore_patterns",
                source,
            })?;
            user_rules.push(IgnoreRule::Pattern(regex));
        }
        Ok(Self::new(user_rules))
    }

    /// Returns true if `name` is excluded by any rule.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(name))
    }
}
