//! Site configuration management.

use std::{collections::BTreeSet, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for Collate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Content discovery settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Collation settings.
    #[serde(default)]
    pub collate: CollateConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Category assigned to articles that do not declare one.
    #[serde(default)]
    pub default_category: Option<String>,
}

/// Content discovery configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Content root directory.
    #[serde(default = "default_content_dir")]
    pub dir: String,

    /// Directory (relative to `dir`) holding pages; everything else is an article.
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    /// Whether to include drafts.
    #[serde(default)]
    pub drafts: bool,
}

/// Collation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollateConfig {
    /// Original category names to collate. Absent means every category.
    #[serde(default, alias = "CATEGORIES_TO_COLLATE")]
    pub categories_to_collate: Option<CategoryFilter>,

    /// Reject unsupported filter values instead of disabling filtering.
    #[serde(default)]
    pub strict_filter: bool,
}

/// Configured category allow-list.
///
/// Any array activates filtering with its string entries as the allowed
/// names. Any other value is kept as [`CategoryFilter::Unsupported`] so
/// validation can report it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFilter", into = "RawFilter")]
pub enum CategoryFilter {
    /// A collection of original (unsanitized) category names.
    Categories {
        /// Allowed names.
        names: BTreeSet<String>,
        /// Array entries that are not strings and can never match.
        ignored: Vec<toml::Value>,
    },
    /// A value of any other shape, e.g. a bare string or a table.
    Unsupported(toml::Value),
}

/// Filter as written in the configuration file.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawFilter {
    List(Vec<toml::Value>),
    Other(toml::Value),
}

impl From<RawFilter> for CategoryFilter {
    fn from(raw: RawFilter) -> Self {
        match raw {
            RawFilter::List(entries) => {
                let mut names = BTreeSet::new();
                let mut ignored = Vec::new();
                for entry in entries {
                    match entry {
                        toml::Value::String(name) => {
                            names.insert(name);
                        }
                        other => ignored.push(other),
                    }
                }
                Self::Categories { names, ignored }
            }
            RawFilter::Other(value) => Self::Unsupported(value),
        }
    }
}

impl From<CategoryFilter> for RawFilter {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::Categories { names, ignored } => Self::List(
                names
                    .into_iter()
                    .map(toml::Value::String)
                    .chain(ignored)
                    .collect(),
            ),
            CategoryFilter::Unsupported(value) => Self::Other(value),
        }
    }
}

impl CategoryFilter {
    /// Build an active filter from category names.
    pub fn categories<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Categories {
            names: names.into_iter().map(Into::into).collect(),
            ignored: Vec::new(),
        }
    }

    /// Whether this filter restricts collation at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Categories { .. })
    }

    /// Whether an item with this original category name is collated.
    ///
    /// Inactive filters allow everything.
    #[must_use]
    pub fn allows(&self, category: &str) -> bool {
        match self {
            Self::Categories { names, .. } => names.contains(category),
            Self::Unsupported(_) => true,
        }
    }

    /// The allowed names, if the filter is active.
    #[must_use]
    pub fn names(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Categories { names, .. } => Some(names),
            Self::Unsupported(_) => None,
        }
    }

    /// Non-string array entries, which match no category.
    #[must_use]
    pub fn ignored(&self) -> &[toml::Value] {
        match self {
            Self::Categories { ignored, .. } => ignored,
            Self::Unsupported(_) => &[],
        }
    }

    /// Short description of the configured value's type, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Categories { .. } => "array",
            Self::Unsupported(value) => value.type_str(),
        }
    }
}

impl CollateConfig {
    /// The configured filter, if any.
    #[must_use]
    pub fn filter(&self) -> Option<&CategoryFilter> {
        self.categories_to_collate.as_ref()
    }

    /// Whether filtering is in effect for this run.
    #[must_use]
    pub fn filtering_active(&self) -> bool {
        self.filter().is_some_and(CategoryFilter::is_active)
    }
}

// Default value functions
fn default_content_dir() -> String {
    "content".to_string()
}

fn default_pages_dir() -> String {
    "pages".to_string()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
            pages_dir: default_pages_dir(),
            drafts: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, with `COLLATE__*` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("COLLATE").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.content.pages_dir.is_empty() {
            return Err(CoreError::config("content.pages_dir cannot be empty"));
        }

        match self.collate.filter() {
            Some(CategoryFilter::Unsupported(value)) if self.collate.strict_filter => {
                return Err(CoreError::config(format!(
                    "collate.categories_to_collate must be an array of category names, got {}",
                    value.type_str()
                )));
            }
            Some(CategoryFilter::Unsupported(value)) => {
                tracing::warn!(
                    kind = value.type_str(),
                    "collate.categories_to_collate is not an array; category filtering is disabled"
                );
            }
            Some(filter) => {
                let ignored = filter.ignored();
                if let Some(first) = ignored.first() {
                    if self.collate.strict_filter {
                        return Err(CoreError::config(format!(
                            "collate.categories_to_collate must only contain category names, \
                             got {} non-string entries (first: {first})",
                            ignored.len()
                        )));
                    }
                    tracing::warn!(
                        count = ignored.len(),
                        first = %first,
                        "collate.categories_to_collate has non-string entries; they match nothing"
                    );
                }
                if filter.names().is_some_and(BTreeSet::is_empty) {
                    tracing::warn!(
                        "collate.categories_to_collate is empty; nothing will be collated"
                    );
                }
            }
            None => {}
        }

        if self
            .site
            .default_category
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            tracing::warn!("site.default_category is blank");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[site]
title = "Test Site"
default_category = "misc"

[content]
dir = "src/content"
pages_dir = "static-pages"
drafts = true

[collate]
categories_to_collate = ["Tech News", "Rust"]
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.site.title, "Test Site");
        assert_eq!(config.site.default_category.as_deref(), Some("misc"));
        assert_eq!(config.content.dir, "src/content");
        assert_eq!(config.content.pages_dir, "static-pages");
        assert!(config.content.drafts);
        assert!(config.collate.filtering_active());

        let filter = config.collate.filter().expect("filter");
        assert!(filter.allows("Tech News"));
        assert!(filter.allows("Rust"));
        assert!(!filter.allows("Tech_News"));
        assert!(!filter.allows("Other"));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_toml_str(
            r#"
[site]
title = "Minimal Site"
"#,
        )
        .expect("parse config");

        assert_eq!(config.content.dir, "content");
        assert_eq!(config.content.pages_dir, "pages");
        assert!(!config.content.drafts);
        assert!(config.site.default_category.is_none());
        assert!(config.collate.filter().is_none());
        assert!(!config.collate.filtering_active());
        assert!(!config.collate.strict_filter);
    }

    #[test]
    fn test_uppercase_setting_alias() {
        let config = Config::from_toml_str(
            r#"
[site]
title = "Site"

[collate]
CATEGORIES_TO_COLLATE = ["Tech News"]
"#,
        )
        .expect("parse config");

        assert!(config.collate.filtering_active());
        assert_eq!(
            config.collate.filter().and_then(CategoryFilter::names),
            Some(&BTreeSet::from(["Tech News".to_string()]))
        );
    }

    #[test]
    fn test_bare_string_filter_is_inactive() {
        let config = Config::from_toml_str(
            r#"
[site]
title = "Site"

[collate]
categories_to_collate = "Tech News"
"#,
        )
        .expect("parse config");

        let filter = config.collate.filter().expect("filter");
        assert!(!filter.is_active());
        assert_eq!(filter.type_name(), "string");
        assert!(filter.allows("Other"));
        assert!(!config.collate.filtering_active());
    }

    #[test]
    fn test_table_filter_is_inactive() {
        let config = Config::from_toml_str(
            r#"
[site]
title = "Site"

[collate.categories_to_collate]
"Tech News" = true
"#,
        )
        .expect("parse config");

        let filter = config.collate.filter().expect("filter");
        assert!(!filter.is_active());
        assert_eq!(filter.type_name(), "table");
    }

    #[test]
    fn test_strict_filter_rejects_unsupported_value() {
        let result = Config::from_toml_str(
            r#"
[site]
title = "Site"

[collate]
categories_to_collate = "Tech News"
strict_filter = true
"#,
        );

        let err = result.expect_err("strict filter should reject a string");
        assert!(err.to_string().contains("must be an array"));
    }

    #[test]
    fn test_empty_filter_is_active() {
        let config = Config::from_toml_str(
            r#"
[site]
title = "Site"

[collate]
categories_to_collate = []
"#,
        )
        .expect("parse config");

        let filter = config.collate.filter().expect("filter");
        assert!(filter.is_active());
        assert!(!filter.allows("Anything"));
    }

    #[test]
    fn test_mixed_array_filter_keeps_string_entries() {
        let config = Config::from_toml_str(
            r#"
[site]
title = "Site"

[collate]
categories_to_collate = ["Rust", 2024]
"#,
        )
        .expect("parse config");

        let filter = config.collate.filter().expect("filter");
        assert!(filter.is_active());
        assert!(filter.allows("Rust"));
        assert!(!filter.allows("Other"));
        assert!(!filter.allows("2024"));
        assert_eq!(filter.ignored(), [toml::Value::Integer(2024)]);
        assert_eq!(filter.type_name(), "array");
    }

    #[test]
    fn test_strict_filter_rejects_non_string_entries() {
        let result = Config::from_toml_str(
            r#"
[site]
title = "Site"

[collate]
categories_to_collate = ["Rust", 2024]
strict_filter = true
"#,
        );

        let err = result.expect_err("strict filter should reject a number entry");
        assert!(err.to_string().contains("non-string"));
        assert!(err.to_string().contains("2024"));
    }

    #[test]
    fn test_config_validation_empty_title() {
        let result = Config::from_toml_str(
            r#"
[site]
title = ""
"#,
        );
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("title cannot be empty")
        );
    }

    #[test]
    fn test_load_with_env_reads_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("collate.toml");
        std::fs::write(&config_path, create_test_config()).expect("write");

        let config = Config::load_with_env(&config_path).expect("load config");
        assert_eq!(config.site.title, "Test Site");
        assert!(config.collate.filtering_active());
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
