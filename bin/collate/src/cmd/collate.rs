//! Collate command - groups site content by category and prints the result

use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Instant,
};

use collate_core::{Config, ContentItem};
use collate_generator::{Collations, Runner};
use color_eyre::eyre::{Result, WrapErr};
use serde_json::{Map, Value, json};

/// Options for the collate command.
#[derive(Debug, Default)]
pub struct CollateOptions<'a> {
    /// Content directory override.
    pub content: Option<&'a Path>,
    /// Include drafts.
    pub drafts: bool,
    /// Pretty-print JSON.
    pub pretty: bool,
    /// Write JSON here instead of stdout.
    pub output: Option<&'a Path>,
}

/// Run the collate command.
///
/// Collects content, runs the collation plugin and writes the published
/// `collations` as JSON.
pub fn run(config_path: &Path, options: &CollateOptions<'_>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?options, "Starting collation");

    let mut config =
        Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;

    if options.drafts {
        config.content.drafts = true;
    }

    let content_dir = options
        .content
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.content.dir));

    tracing::debug!(?config, ?content_dir, "Loaded configuration");

    let (context, stats) = Runner::new(config, &content_dir)
        .run()
        .wrap_err("Collation failed")?;

    let summary = context
        .collations()
        .map(summarize)
        .unwrap_or_else(|| Value::Object(Map::new()));

    let rendered = if options.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };

    match options.output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            eprintln!("  Wrote {} group(s) to {}", stats.groups, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
        }
    }

    let duration = start.elapsed();
    eprintln!();
    eprintln!("  Articles:  {}", stats.articles);
    eprintln!("  Pages:     {}", stats.pages);
    eprintln!("  Groups:    {}", stats.groups);
    eprintln!("  Collated:  {}", stats.collated);
    eprintln!("  Duration:  {:.2}s", duration.as_secs_f64());

    tracing::info!(?stats, ?duration, "Collation completed successfully");

    Ok(())
}

/// Reduce collations to the fields a template author needs to see.
pub fn summarize(collations: &Collations) -> Value {
    let groups = collations
        .iter()
        .map(|(key, items)| {
            let items = items.iter().map(|item| item_summary(item)).collect();
            (key.to_string(), Value::Array(items))
        })
        .collect::<Map<_, _>>();
    Value::Object(groups)
}

fn item_summary(item: &ContentItem) -> Value {
    json!({
        "title": item.title,
        "slug": item.slug,
        "category": item.category_name(),
        "date": item.date.map(|d| d.to_rfc3339()),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use collate_core::ContentKind;

    use super::*;

    #[test]
    fn test_summarize() {
        let mut collations = Collations::new();
        collations.push(
            "Tech_News_articles",
            Arc::new(
                ContentItem::new("Launch", "launch", ContentKind::Article)
                    .with_category("Tech News"),
            ),
        );

        let value = summarize(&collations);
        assert_eq!(
            value,
            json!({
                "Tech_News_articles": [
                    { "title": "Launch", "slug": "launch", "category": "Tech News", "date": null }
                ]
            })
        );
    }

    #[test]
    fn test_run_writes_output_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("collate.toml");
        std::fs::write(&config_path, "[site]\ntitle = \"Test\"\n").expect("write config");
        let content = dir.path().join("content");
        std::fs::create_dir_all(content.join("posts")).expect("mkdir");
        std::fs::write(
            content.join("posts/hello.md"),
            "---\ntitle: Hello\ncategory: Tech News\n---\n",
        )
        .expect("write post");
        let output = dir.path().join("collations.json");

        let options = CollateOptions {
            content: Some(&content),
            output: Some(&output),
            ..Default::default()
        };
        run(&config_path, &options).expect("run");

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).expect("read")).expect("json");
        assert_eq!(written["Tech_News_articles"][0]["title"], "Hello");
    }
}
