//! Content types and structures.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::frontmatter::Frontmatter;

/// Kind of generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Dated, categorized posts.
    Article,
    /// Standalone pages.
    Page,
}

impl ContentKind {
    /// Pluralized label used in group keys and context names.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Article => "articles",
            Self::Page => "pages",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Article => "article",
            Self::Page => "page",
        })
    }
}

/// A content category as entered by the author.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Original, unsanitized name.
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A generated content item ready for collation and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Item title.
    pub title: String,

    /// URL slug, unique per kind.
    pub slug: String,

    /// Article or page.
    pub kind: ContentKind,

    /// Publication date.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    /// Category, if one was declared or defaulted.
    #[serde(default)]
    pub category: Option<Category>,

    /// Source file path.
    #[serde(default)]
    pub source_path: Option<PathBuf>,
}

impl ContentItem {
    /// Create an item with only the fields collation cares about.
    pub fn new(title: impl Into<String>, slug: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            kind,
            date: None,
            category: None,
            source_path: None,
        }
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(Category::new(name));
        self
    }

    /// Set the publication date.
    #[must_use]
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Build an item from parsed frontmatter and its path relative to the content root.
    ///
    /// The slug falls back to the file stem when the frontmatter has none, and the
    /// title falls back to the slug. A blank category counts as no category.
    pub fn from_frontmatter(fm: Frontmatter, relative_path: &Path, kind: ContentKind) -> Self {
        let slug = fm.slug.clone().unwrap_or_else(|| slug_from_path(relative_path));
        let title = if fm.title.is_empty() {
            slug.clone()
        } else {
            fm.title
        };

        Self {
            title,
            slug,
            kind,
            date: fm.date,
            category: fm
                .category
                .filter(|name| !name.trim().is_empty())
                .map(Category::new),
            source_path: Some(relative_path.to_path_buf()),
        }
    }

    /// Category name, if any.
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}

/// Derive a slug from a content path: the file stem, or the parent directory for `index` files.
fn slug_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    if stem == "index"
        && let Some(parent) = path.parent().and_then(Path::file_name)
    {
        return parent.to_string_lossy().to_string();
    }

    stem
}
