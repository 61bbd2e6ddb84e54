//! Check command - validate configuration and content categories

use std::{collections::BTreeSet, path::Path};

use collate_core::{CategoryFilter, Config};
use collate_generator::ContentCollector;
use color_eyre::eyre::{Result, bail};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Categories found in the content tree.
#[derive(Debug, Default)]
struct CategoryScan {
    checked: usize,
    drafts: usize,
    used: BTreeSet<String>,
}

/// Run the check command.
///
/// Validates configuration and the categories declared by content files.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            None
        }
    };

    if let Some(ref cfg) = config {
        println!("\nChecking category filter...");
        check_filter(cfg.collate.filter(), &mut result);

        let content_dir = Path::new(&cfg.content.dir);
        if content_dir.exists() {
            println!("\nChecking content files...");
            let scan = scan_content(content_dir, cfg, &mut result);
            check_filter_usage(cfg.collate.filter(), &scan, &mut result);
        } else {
            result.add_warning(format!(
                "Content directory does not exist: {}",
                content_dir.display()
            ));
        }
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Report how the configured filter will behave.
fn check_filter(filter: Option<&CategoryFilter>, result: &mut ValidationResult) {
    match filter {
        None => println!("  ✓ No filter, all categories are collated"),
        Some(CategoryFilter::Categories { names, ignored }) => {
            for value in ignored {
                result.add_warning(format!(
                    "Filter entry {value} is not a string and matches nothing"
                ));
            }
            if names.is_empty() {
                result.add_warning("Filter has no category names, nothing will be collated");
                println!("  ⚠ Empty filter");
            } else {
                println!("  ✓ Filtering on {} categories", names.len());
            }
        }
        Some(unsupported) => {
            result.add_warning(format!(
                "collate.categories_to_collate is a {}, not an array; filtering is disabled",
                unsupported.type_name()
            ));
            println!("  ⚠ Unsupported filter value, filtering disabled");
        }
    }
}

/// Parse every content file the way a run does and record the categories in use.
///
/// Items without a category abort a real run, so they are reported as errors.
fn scan_content(
    content_dir: &Path,
    config: &Config,
    result: &mut ValidationResult,
) -> CategoryScan {
    let mut scan = CategoryScan::default();
    let collector = ContentCollector::new(config.clone(), content_dir);

    let files = match collector.find_content_files() {
        Ok(files) => files,
        Err(e) => {
            result.add_error(format!("{}: {e}", content_dir.display()));
            return scan;
        }
    };

    for path in &files {
        scan.checked += 1;
        match collector.parse_file(path) {
            Ok(Some(item)) => match item.category_name() {
                Some(name) => {
                    scan.used.insert(name.to_string());
                }
                None => {
                    result.add_error(format!("{}: {} has no category", path.display(), item.kind));
                }
            },
            Ok(None) => scan.drafts += 1,
            Err(e) => result.add_error(format!("{}: {e}", path.display())),
        }
    }

    println!(
        "  ✓ {} content files checked ({} drafts skipped), {} categories in use",
        scan.checked,
        scan.drafts,
        scan.used.len()
    );
    scan
}

/// Warn about filter entries that match no content.
fn check_filter_usage(
    filter: Option<&CategoryFilter>,
    scan: &CategoryScan,
    result: &mut ValidationResult,
) {
    let Some(names) = filter.and_then(CategoryFilter::names) else {
        return;
    };

    for name in names.difference(&scan.used) {
        result.add_warning(format!(
            "Filter entry '{name}' matches no content category \
             (names are matched before sanitizing)"
        ));
    }
}
