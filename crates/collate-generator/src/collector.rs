//! Content collection.
//!
//! Walks the content directory and turns every Markdown file into a
//! [`ContentItem`], classified as article or page by its location.

use std::{
    cmp::Ordering,
    fs,
    path::{Path, PathBuf},
};

use collate_core::{
    Config, ContentItem, ContentKind, CoreError, content::Category, frontmatter::parse_frontmatter,
};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frontmatter or other core error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Directory traversal error.
    #[error("failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid content path.
    #[error("invalid content path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Collected articles and pages, each sorted for generation.
#[derive(Debug, Default)]
pub struct CollectedContent {
    /// Articles, oldest first.
    pub articles: Vec<ContentItem>,

    /// Pages, oldest first.
    pub pages: Vec<ContentItem>,
}

impl CollectedContent {
    /// Total number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len() + self.pages.len()
    }

    /// Whether nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty() && self.pages.is_empty()
    }
}

/// Content collector that walks directories and parses files.
#[derive(Debug)]
pub struct ContentCollector {
    config: Config,
    content_dir: PathBuf,
}

impl ContentCollector {
    /// Create a new content collector.
    #[must_use]
    pub fn new(config: Config, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
        }
    }

    /// Collect all content from the content directory.
    ///
    /// Unlike rendering, collection fails on the first unparsable file: a
    /// missing or malformed category would silently change the groups.
    pub fn collect(&self) -> Result<CollectedContent> {
        info!(dir = %self.content_dir.display(), "collecting content");

        let files = self.find_content_files()?;
        info!(count = files.len(), "found content files");

        let parsed: Vec<Option<ContentItem>> = files
            .par_iter()
            .map(|path| self.parse_file(path))
            .collect::<Result<_>>()?;

        let mut content = CollectedContent::default();
        for item in parsed.into_iter().flatten() {
            match item.kind {
                ContentKind::Article => content.articles.push(item),
                ContentKind::Page => content.pages.push(item),
            }
        }

        content.articles.sort_by(generation_order);
        content.pages.sort_by(generation_order);

        info!(
            articles = content.articles.len(),
            pages = content.pages.len(),
            "content collection complete"
        );

        Ok(content)
    }

    /// Find all content files recursively, skipping hidden directories.
    pub fn find_content_files(&self) -> Result<Vec<PathBuf>> {
        if !self.content_dir.exists() {
            warn!(dir = %self.content_dir.display(), "content directory does not exist");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.content_dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden_dir(e))
        {
            let entry = entry?;
            if entry.file_type().is_file() && is_content_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Classify a content path relative to the content root.
    fn kind_of(&self, relative_path: &Path) -> ContentKind {
        if relative_path.starts_with(&self.config.content.pages_dir) {
            ContentKind::Page
        } else {
            ContentKind::Article
        }
    }

    /// Parse a single content file. Drafts yield `None` unless configured.
    ///
    /// Articles without a category take `site.default_category`.
    pub fn parse_file(&self, path: &Path) -> Result<Option<ContentItem>> {
        debug!(path = %path.display(), "parsing file");

        let content = fs::read_to_string(path)?;
        let relative_path = path
            .strip_prefix(&self.content_dir)
            .map_err(|_| CollectorError::InvalidPath(path.to_path_buf()))?;

        let (frontmatter, _body) = parse_frontmatter(&content, relative_path)?;

        if frontmatter.draft && !self.config.content.drafts {
            debug!(path = %relative_path.display(), "skipping draft");
            return Ok(None);
        }

        let kind = self.kind_of(relative_path);
        let mut item = ContentItem::from_frontmatter(frontmatter, relative_path, kind);

        if item.category.is_none()
            && kind == ContentKind::Article
            && let Some(default) = &self.config.site.default_category
        {
            item.category = Some(Category::new(default.clone()));
        }

        Ok(Some(item))
    }
}

/// Whether a path is a Markdown content file.
pub fn is_content_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        matches!(
            ext.to_string_lossy().to_lowercase().as_str(),
            "md" | "markdown"
        )
    })
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_string_lossy().starts_with('.')
}

/// Oldest first, undated items last, ties broken by slug.
fn generation_order(a: &ContentItem, b: &ContentItem) -> Ordering {
    match (&a.date, &b.date) {
        (Some(a_date), Some(b_date)) => a_date.cmp(b_date).then_with(|| a.slug.cmp(&b.slug)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.slug.cmp(&b.slug),
    }
}
