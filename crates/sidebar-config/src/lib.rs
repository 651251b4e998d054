//! Configuration management for the sidebar generator.
//!
//! Parses `sidebar.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Option Names
//!
//! Keys are snake_case. The camelCase names used by the VitePress plugin
//! (`ignoreList`, `ignoreIndexItem`, `deletePrefix`, `metaFilename`,
//! `titleFromFile`, `titleFromFileByYaml`) are accepted as aliases so an
//! existing plugin config can be pasted in unchanged.
//!
//! ```toml
//! [docs]
//! path = "docs"
//!
//! [sidebar]
//! ignore_list = ["drafts"]
//! ignore_patterns = ["^_"]
//! delete_prefix_pattern = "^\\d+-"
//! collapsed = true
//! title_from_file = true
//!
//! [locales.root]
//! lang = "en"
//!
//! [locales.zh]
//! lang = "zh"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `docs.path` supports `${VAR}` and `${VAR:-default}`.

mod expand;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override the collapsed flag on group nodes.
    pub collapsed: Option<bool>,
    /// Override the ignore-index-item flag.
    pub ignore_index_item: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sidebar.toml";

/// Default sidecar metadata filename.
pub const DEFAULT_META_FILENAME: &str = ".sidebar.meta.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Sidebar generation options.
    pub sidebar: SidebarConfig,
    /// Locale definitions keyed by locale key (e.g., "root", "zh").
    pub locales: BTreeMap<String, LocaleConfig>,
    /// File watching configuration.
    pub watch: WatchConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    path: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Docs root containing the top-level sidebar groups.
    pub source_dir: PathBuf,
}

/// Sidebar generation options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    /// Exact entry names excluded from traversal.
    #[serde(alias = "ignoreList")]
    pub ignore_list: Vec<String>,
    /// Regex patterns; entry names matching any are excluded.
    pub ignore_patterns: Vec<String>,
    /// Drop index files as standalone leaves.
    #[serde(alias = "ignoreIndexItem")]
    pub ignore_index_item: bool,
    /// Literal prefix stripped from derived labels.
    #[serde(alias = "deletePrefix")]
    pub delete_prefix: Option<String>,
    /// Regex whose first match is removed from derived labels.
    pub delete_prefix_pattern: Option<String>,
    /// Collapsed flag for generated group nodes. Omitted from output when unset.
    pub collapsed: Option<bool>,
    /// Sidecar metadata filename.
    #[serde(alias = "metaFilename")]
    pub meta_filename: String,
    /// Extract titles from the first `# ` heading.
    #[serde(alias = "titleFromFile")]
    pub title_from_file: bool,
    /// Extract titles from the `title` field of YAML front matter.
    #[serde(alias = "titleFromFileByYaml")]
    pub title_from_file_by_yaml: bool,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            ignore_list: Vec::new(),
            ignore_patterns: Vec::new(),
            ignore_index_item: false,
            delete_prefix: None,
            delete_prefix_pattern: None,
            collapsed: None,
            meta_filename: DEFAULT_META_FILENAME.to_owned(),
            title_from_file: false,
            title_from_file_by_yaml: false,
        }
    }
}

/// A single locale definition.
///
/// `lang` is optional at parse time so that a missing tag can be reported
/// as a build error naming the locale, rather than a TOML error.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LocaleConfig {
    /// Language tag; also the locale's subdirectory under the docs root.
    pub lang: Option<String>,
}

/// File watching configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Glob patterns (relative to the docs root) for watched files.
    pub patterns: Option<Vec<String>>,
    /// Debounce window in milliseconds.
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            patterns: None,
            debounce_ms: 100,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`docs.path`").
        field: String,
        /// Error message (e.g., "${`DOCS_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sidebar.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(collapsed) = settings.collapsed {
            self.sidebar.collapsed = Some(collapsed);
        }
        if let Some(ignore_index_item) = settings.ignore_index_item {
            self.sidebar.ignore_index_item = ignore_index_item;
        }
    }

    /// Watch patterns, defaulting to markdown files plus sidecar metadata files.
    #[must_use]
    pub fn watch_patterns(&self) -> Vec<String> {
        self.watch.patterns.clone().unwrap_or_else(|| {
            vec![
                "**/*.md".to_owned(),
                format!("**/{}", self.sidebar.meta_filename),
            ]
        })
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            sidebar: SidebarConfig::default(),
            locales: BTreeMap::new(),
            watch: WatchConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file. Regex syntax in
    /// `ignore_patterns` and `delete_prefix_pattern` is checked when build
    /// options are compiled, not here.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_sidebar()?;
        self.validate_watch()?;
        Ok(())
    }

    /// Validate sidebar configuration.
    fn validate_sidebar(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.sidebar.meta_filename, "sidebar.meta_filename")?;

        if self.sidebar.delete_prefix.is_some() && self.sidebar.delete_prefix_pattern.is_some() {
            return Err(ConfigError::Validation(
                "sidebar.delete_prefix and sidebar.delete_prefix_pattern are mutually exclusive"
                    .to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate watch configuration.
    fn validate_watch(&self) -> Result<(), ConfigError> {
        if self.watch.debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "watch.debounce_ms must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.docs.path {
            self.docs.path = Some(expand::expand_env(path, "docs.path")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(self.docs.path.as_deref().unwrap_or("docs")),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.sidebar.meta_filename, ".sidebar.meta.json");
        assert!(!config.sidebar.ignore_index_item);
        assert!(config.sidebar.collapsed.is_none());
        assert!(config.locales.is_empty());
        assert_eq!(config.watch.debounce_ms, 100);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.sidebar.meta_filename, ".sidebar.meta.json");
        assert!(config.sidebar.ignore_list.is_empty());
    }

    #[test]
    fn test_parse_sidebar_config() {
        let toml = r#"
[sidebar]
ignore_list = ["drafts", "notes.md"]
ignore_patterns = ["^_"]
ignore_index_item = true
delete_prefix_pattern = "^\\d+-"
collapsed = false
meta_filename = "_meta.json"
title_from_file = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sidebar.ignore_list, vec!["drafts", "notes.md"]);
        assert_eq!(config.sidebar.ignore_patterns, vec!["^_"]);
        assert!(config.sidebar.ignore_index_item);
        assert_eq!(
            config.sidebar.delete_prefix_pattern.as_deref(),
            Some("^\\d+-")
        );
        assert_eq!(config.sidebar.collapsed, Some(false));
        assert_eq!(config.sidebar.meta_filename, "_meta.json");
        assert!(config.sidebar.title_from_file);
        assert!(!config.sidebar.title_from_file_by_yaml);
    }

    #[test]
    fn test_parse_camel_case_aliases() {
        let toml = r#"
[sidebar]
ignoreList = ["drafts"]
ignoreIndexItem = true
deletePrefix = "01."
metaFilename = "meta.json"
titleFromFileByYaml = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sidebar.ignore_list, vec!["drafts"]);
        assert!(config.sidebar.ignore_index_item);
        assert_eq!(config.sidebar.delete_prefix.as_deref(), Some("01."));
        assert_eq!(config.sidebar.meta_filename, "meta.json");
        assert!(config.sidebar.title_from_file_by_yaml);
    }

    #[test]
    fn test_parse_locales() {
        let toml = r#"
[locales.root]
lang = "en"

[locales.zh]
lang = "zh"

[locales.broken]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.locales.len(), 3);
        assert_eq!(config.locales["root"].lang.as_deref(), Some("en"));
        assert_eq!(config.locales["zh"].lang.as_deref(), Some("zh"));
        assert!(config.locales["broken"].lang.is_none());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
path = "site/docs"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/site/docs")
        );
    }

    #[test]
    fn test_resolve_paths_default() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/docs")
        );
    }

    #[test]
    fn test_expand_env_vars_docs_path() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SIDEBAR_TEST_DOCS", "content");
        }

        let toml = r#"
[docs]
path = "${SIDEBAR_TEST_DOCS}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/content")
        );

        unsafe {
            std::env::remove_var("SIDEBAR_TEST_DOCS");
        }
    }

    #[test]
    fn test_apply_cli_settings_source_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/docs")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/custom/docs")
        );
        assert!(config.sidebar.collapsed.is_none()); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_flags() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            collapsed: Some(true),
            ignore_index_item: Some(true),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.sidebar.collapsed, Some(true));
        assert!(config.sidebar.ignore_index_item);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert!(config.sidebar.collapsed.is_none());
        assert!(!config.sidebar.ignore_index_item);
    }

    #[test]
    fn test_watch_patterns_default_includes_meta_filename() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.sidebar.meta_filename = "_meta.json".to_owned();

        assert_eq!(
            config.watch_patterns(),
            vec!["**/*.md".to_owned(), "**/_meta.json".to_owned()]
        );
    }

    #[test]
    fn test_watch_patterns_configured() {
        let toml = r#"
[watch]
patterns = ["**/*.md", "**/*.mdx"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.watch_patterns(), vec!["**/*.md", "**/*.mdx"]);
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_meta_filename_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.sidebar.meta_filename = String::new();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sidebar.meta_filename"));
    }

    #[test]
    fn test_validate_prefix_options_exclusive() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.sidebar.delete_prefix = Some("01-".to_owned());
        config.sidebar.delete_prefix_pattern = Some("^\\d+-".to_owned());

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_validate_debounce_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.watch.debounce_ms = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("debounce_ms"));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/sidebar.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("sidebar.toml");
        std::fs::write(
            &config_path,
            "[docs]\npath = \"documentation\"\n\n[sidebar]\ncollapsed = true\n",
        )
        .unwrap();

        let settings = CliSettings {
            collapsed: Some(false),
            ..Default::default()
        };
        let config = Config::load(Some(&config_path), Some(&settings)).unwrap();

        assert_eq!(
            config.docs_resolved.source_dir,
            temp_dir.path().join("documentation")
        );
        assert_eq!(config.config_path.as_deref(), Some(config_path.as_path()));
        // CLI wins over file
        assert_eq!(config.sidebar.collapsed, Some(false));
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("sidebar.toml");
        std::fs::write(&config_path, "[sidebar\n").unwrap();

        let result = Config::load(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
