//! Collation plugin.
//!
//! Hooks the article and page generators so that, once each has finalized
//! its context, its items are grouped by category into the shared
//! `collations` context entry.

use collate_core::ContentKind;
use tracing::{debug, info};

use crate::{
    collation::{CollateStats, Result, collate},
    context::Generator,
    signals::{Signal, Signals},
};

/// Connect the collation handlers to the generator signals.
pub fn register(signals: &mut Signals) {
    signals.connect(Signal::ArticleGeneratorFinalized, "collate_articles", |g| {
        group_articles(g)?;
        Ok(())
    });
    signals.connect(Signal::PageGeneratorFinalized, "collate_pages", |g| {
        group_pages(g)?;
        Ok(())
    });
}

/// Collate the generator's articles.
pub fn group_articles(generator: &mut Generator) -> Result<CollateStats> {
    group_content(generator, ContentKind::Article)
}

/// Collate the generator's pages.
pub fn group_pages(generator: &mut Generator) -> Result<CollateStats> {
    group_content(generator, ContentKind::Page)
}

/// Collate items of `kind` into the context's shared collations.
fn group_content(generator: &mut Generator, kind: ContentKind) -> Result<CollateStats> {
    let filter = generator.settings.collate.filter();
    let (items, collations) = generator.context.items_and_collations(kind);
    debug!(
        %kind,
        items = items.len(),
        filtering = filter.is_some_and(|f| f.is_active()),
        "grouping content"
    );

    let stats = collate(items, kind, filter, collations)?;

    info!(
        %kind,
        collated = stats.collated,
        skipped = stats.skipped,
        groups = collations.len(),
        "collations updated"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use collate_core::{Config, ContentItem};

    use super::*;
    use crate::context::{COLLATIONS_KEY, GenerationContext};

    fn settings(collate: &str) -> Config {
        Config::from_toml_str(&format!("[site]\ntitle = \"Test\"\n\n[collate]\n{collate}\n"))
            .expect("config")
    }

    fn item(slug: &str, kind: ContentKind, category: &str) -> ContentItem {
        ContentItem::new(slug, slug, kind).with_category(category)
    }

    fn sample_generator(collate: &str) -> Generator {
        let context = GenerationContext::with_items(
            [
                item("a1", ContentKind::Article, "Tech News"),
                item("a2", ContentKind::Article, "Other"),
                item("a3", ContentKind::Article, "Tech News"),
            ],
            [
                item("p1", ContentKind::Page, "Tech News"),
                item("p2", ContentKind::Page, "about-us"),
            ],
        );
        Generator::new(settings(collate), context)
    }

    fn group_slugs(generator: &Generator, key: &str) -> Vec<String> {
        generator
            .context
            .collations()
            .and_then(|c| c.get(key))
            .map(|items| items.iter().map(|i| i.slug.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_register_connects_both_signals() {
        let mut signals = Signals::new();
        register(&mut signals);

        assert_eq!(
            signals.handlers(Signal::ArticleGeneratorFinalized),
            ["collate_articles"]
        );
        assert_eq!(signals.handlers(Signal::PageGeneratorFinalized), ["collate_pages"]);
    }

    #[test]
    fn test_signals_publish_collations() {
        let mut signals = Signals::new();
        register(&mut signals);
        let mut generator = sample_generator("");

        signals
            .send(Signal::ArticleGeneratorFinalized, &mut generator)
            .expect("articles");
        signals
            .send(Signal::PageGeneratorFinalized, &mut generator)
            .expect("pages");

        assert_eq!(group_slugs(&generator, "Tech_News_articles"), ["a1", "a3"]);
        assert_eq!(group_slugs(&generator, "Other_articles"), ["a2"]);
        assert_eq!(group_slugs(&generator, "Tech_News_pages"), ["p1"]);
        assert_eq!(group_slugs(&generator, "about_us_pages"), ["p2"]);

        let value = generator.context.to_template_value().expect("serialize");
        assert!(value[COLLATIONS_KEY]["Tech_News_articles"].is_array());
    }

    #[test]
    fn test_pages_before_articles_share_map() {
        let mut generator = sample_generator("");

        group_pages(&mut generator).expect("pages");
        group_articles(&mut generator).expect("articles");

        let collations = generator.context.collations().expect("collations");
        assert_eq!(collations.len(), 4);
        assert_eq!(collations.item_count(), 5);
    }

    #[test]
    fn test_filter_applies_to_both_kinds() {
        let mut generator = sample_generator("categories_to_collate = [\"Tech News\"]");

        let articles = group_articles(&mut generator).expect("articles");
        let pages = group_pages(&mut generator).expect("pages");

        assert_eq!(articles, CollateStats { collated: 2, skipped: 1 });
        assert_eq!(pages, CollateStats { collated: 1, skipped: 1 });

        let keys: Vec<_> = generator
            .context
            .collations()
            .expect("collations")
            .keys()
            .map(str::to_string)
            .collect();
        assert_eq!(keys, ["Tech_News_articles", "Tech_News_pages"]);
    }

    #[test]
    fn test_bare_string_filter_collates_everything() {
        let mut generator = sample_generator("categories_to_collate = \"Tech News\"");

        group_articles(&mut generator).expect("articles");

        assert_eq!(group_slugs(&generator, "Other_articles"), ["a2"]);
        assert_eq!(group_slugs(&generator, "Tech_News_articles"), ["a1", "a3"]);
    }

    #[test]
    fn test_missing_category_aborts_dispatch() {
        let mut signals = Signals::new();
        register(&mut signals);
        let context = GenerationContext::with_items(
            [],
            [ContentItem::new("Untitled", "untitled", ContentKind::Page)],
        );
        let mut generator = Generator::new(settings(""), context);

        let err = signals
            .send(Signal::PageGeneratorFinalized, &mut generator)
            .expect_err("missing category");
        assert!(err.to_string().contains("collate_pages"));
        assert!(err.to_string().contains("untitled"));
    }
}
