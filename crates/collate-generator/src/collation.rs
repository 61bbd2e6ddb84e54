//! Category collation.
//!
//! Groups content items by sanitized category name into lists keyed
//! `{category}_{articles|pages}` for template consumption.

use std::{collections::BTreeMap, sync::Arc};

use collate_core::{CategoryFilter, ContentItem, ContentKind};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

/// Collation errors.
#[derive(Debug, Error)]
pub enum CollateError {
    /// An item reached the collator without a category.
    #[error("{kind} '{item}' has no category")]
    MissingCategory { item: String, kind: ContentKind },
}

/// Result type for collation operations.
pub type Result<T> = std::result::Result<T, CollateError>;

/// Something the collator can group.
pub trait Collatable {
    /// Original, unsanitized category name.
    fn category_name(&self) -> Option<&str>;

    /// Human-readable identifier used in error messages.
    fn describe(&self) -> String;
}

impl Collatable for ContentItem {
    fn category_name(&self) -> Option<&str> {
        ContentItem::category_name(self)
    }

    fn describe(&self) -> String {
        match &self.source_path {
            Some(path) => path.display().to_string(),
            None => self.slug.clone(),
        }
    }
}

impl<T: Collatable + ?Sized> Collatable for Arc<T> {
    fn category_name(&self) -> Option<&str> {
        (**self).category_name()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<T: Collatable + ?Sized> Collatable for &T {
    fn category_name(&self) -> Option<&str> {
        (**self).category_name()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Replace whitespace and hyphens in a category name with underscores.
///
/// Nothing else is touched: the result is not guaranteed to be a valid
/// identifier in any template language.
pub fn sanitize_category(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .map(|c| if c == '-' { '_' } else { c })
        .collect()
}

/// Group key for a category name and content kind, e.g. `Tech_News_articles`.
pub fn group_key(category: &str, kind: ContentKind) -> String {
    format!("{}_{}", sanitize_category(category), kind.label())
}

/// Accumulated collation groups for one generation run.
///
/// A key is present only once an item has been pushed to it. Items keep
/// their order of arrival.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collations<T = Arc<ContentItem>> {
    groups: BTreeMap<String, Vec<T>>,
}

impl<T> Default for Collations<T> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<T> Collations<T> {
    /// Create an empty collation map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to a group, creating the group if needed.
    pub fn push(&mut self, key: impl Into<String>, item: T) {
        self.groups.entry(key.into()).or_default().push(item);
    }

    /// Items of a group.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[T]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Whether a group exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.groups.contains_key(key)
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Groups in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Total number of collated items across all groups.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Outcome counts of one [`collate`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollateStats {
    /// Items appended to a group.
    pub collated: usize,
    /// Items excluded by the category filter.
    pub skipped: usize,
}

/// Collate `items` of one content kind into `collations`.
///
/// Filtering applies only when `filter` is an active [`CategoryFilter`]; items
/// whose original category name is not listed are skipped. The first item
/// without a category aborts the call.
pub fn collate<T>(
    items: &[T],
    kind: ContentKind,
    filter: Option<&CategoryFilter>,
    collations: &mut Collations<T>,
) -> Result<CollateStats>
where
    T: Collatable + Clone,
{
    let filter = filter.filter(|f| f.is_active());
    let mut stats = CollateStats::default();

    for item in items {
        let category = item
            .category_name()
            .ok_or_else(|| CollateError::MissingCategory {
                item: item.describe(),
                kind,
            })?;

        if filter.is_some_and(|f| !f.allows(category)) {
            trace!(%kind, category, "category not in filter, skipping");
            stats.skipped += 1;
            continue;
        }

        collations.push(group_key(category, kind), item.clone());
        stats.collated += 1;
    }

    debug!(
        %kind,
        collated = stats.collated,
        skipped = stats.skipped,
        groups = collations.len(),
        keys = ?collations.keys().collect::<Vec<_>>(),
        "collated content"
    );

    Ok(stats)
}
