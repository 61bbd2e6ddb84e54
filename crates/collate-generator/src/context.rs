//! Generation context shared by the stages of one run.

use std::sync::Arc;

use collate_core::{Config, ContentItem, ContentKind};
use serde_json::{Map, Value};

use crate::collation::Collations;

/// Context key under which collations are published to templates.
pub const COLLATIONS_KEY: &str = "collations";

/// Mutable state of one generation run, read and written by its stages.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    articles: Vec<Arc<ContentItem>>,
    pages: Vec<Arc<ContentItem>>,
    collations: Option<Collations>,
}

impl GenerationContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context holding generated articles and pages.
    pub fn with_items(
        articles: impl IntoIterator<Item = ContentItem>,
        pages: impl IntoIterator<Item = ContentItem>,
    ) -> Self {
        Self {
            articles: articles.into_iter().map(Arc::new).collect(),
            pages: pages.into_iter().map(Arc::new).collect(),
            collations: None,
        }
    }

    /// Items of one kind, in generation order.
    #[must_use]
    pub fn items(&self, kind: ContentKind) -> &[Arc<ContentItem>] {
        match kind {
            ContentKind::Article => &self.articles,
            ContentKind::Page => &self.pages,
        }
    }

    /// Append a generated item to the list of its kind.
    pub fn add_item(&mut self, item: ContentItem) {
        match item.kind {
            ContentKind::Article => self.articles.push(Arc::new(item)),
            ContentKind::Page => self.pages.push(Arc::new(item)),
        }
    }

    /// Published collations, if any stage created them.
    #[must_use]
    pub fn collations(&self) -> Option<&Collations> {
        self.collations.as_ref()
    }

    /// Split borrow: the items of one kind alongside the shared collations,
    /// which are created on first use.
    pub fn items_and_collations(
        &mut self,
        kind: ContentKind,
    ) -> (&[Arc<ContentItem>], &mut Collations) {
        let items = match kind {
            ContentKind::Article => &self.articles,
            ContentKind::Page => &self.pages,
        };
        (items, self.collations.get_or_insert_with(Collations::new))
    }

    /// Template-facing view: `articles`, `pages` and, once published, `collations`.
    pub fn to_template_value(&self) -> serde_json::Result<Value> {
        let mut map = Map::new();
        map.insert(
            ContentKind::Article.label().to_string(),
            serde_json::to_value(&self.articles)?,
        );
        map.insert(
            ContentKind::Page.label().to_string(),
            serde_json::to_value(&self.pages)?,
        );
        if let Some(collations) = &self.collations {
            map.insert(COLLATIONS_KEY.to_string(), serde_json::to_value(collations)?);
        }
        Ok(Value::Object(map))
    }
}

/// A content generator as seen by plugins: its settings and its context.
#[derive(Debug, Clone)]
pub struct Generator {
    /// Site settings.
    pub settings: Config,

    /// Generation context.
    pub context: GenerationContext,
}

impl Generator {
    /// Create a generator over an existing context.
    #[must_use]
    pub fn new(settings: Config, context: GenerationContext) -> Self {
        Self { settings, context }
    }
}
