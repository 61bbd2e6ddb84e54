//! Run orchestration.
//!
//! Collects content, hands it to the generators' plugins through the
//! lifecycle signals, and returns the finished context.

use std::{path::PathBuf, time::Instant};

use chrono::{DateTime, Utc};
use collate_core::{Config, ContentKind};
use thiserror::Error;
use tracing::info;

use crate::{
    collector::{CollectorError, ContentCollector},
    context::{GenerationContext, Generator},
    plugin,
    signals::{Signal, SignalError, Signals},
};

/// Run errors.
#[derive(Debug, Error)]
pub enum RunError {
    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// A plugin handler failed.
    #[error("plugin error: {0}")]
    Signal(#[from] SignalError),
}

/// Result type for run operations.
pub type Result<T> = std::result::Result<T, RunError>;

/// Run statistics.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// Number of articles generated.
    pub articles: usize,

    /// Number of pages generated.
    pub pages: usize,

    /// Number of collation groups published.
    pub groups: usize,

    /// Number of items placed in a group.
    pub collated: usize,

    /// Run duration in milliseconds.
    pub duration_ms: u64,
}

/// Drives one generation run.
#[derive(Debug)]
pub struct Runner {
    config: Config,
    content_dir: PathBuf,
    signals: Signals,
}

impl Runner {
    /// Create a runner with the collation plugin registered.
    #[must_use]
    pub fn new(config: Config, content_dir: impl Into<PathBuf>) -> Self {
        let mut signals = Signals::new();
        plugin::register(&mut signals);
        Self::with_signals(config, content_dir, signals)
    }

    /// Create a runner with a caller-provided signal registry.
    #[must_use]
    pub fn with_signals(config: Config, content_dir: impl Into<PathBuf>, signals: Signals) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
            signals,
        }
    }

    /// Execute the run: articles are finalized before pages.
    pub fn run(&self) -> Result<(GenerationContext, RunStats)> {
        let start = Instant::now();
        let started_at = Utc::now();

        info!(content = %self.content_dir.display(), "starting run");

        let collector = ContentCollector::new(self.config.clone(), &self.content_dir);
        let content = collector.collect()?;

        let context = GenerationContext::with_items(content.articles, content.pages);
        let mut generator = Generator::new(self.config.clone(), context);

        self.signals
            .send(Signal::ArticleGeneratorFinalized, &mut generator)?;
        self.signals
            .send(Signal::PageGeneratorFinalized, &mut generator)?;

        let context = generator.context;
        let (groups, collated) = context
            .collations()
            .map(|c| (c.len(), c.item_count()))
            .unwrap_or_default();

        let stats = RunStats {
            started_at,
            articles: context.items(ContentKind::Article).len(),
            pages: context.items(ContentKind::Page).len(),
            groups,
            collated,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(?stats, "run complete");
        Ok((context, stats))
    }
}
