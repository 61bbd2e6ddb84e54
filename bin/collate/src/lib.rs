//! Collate CLI Library
//!
//! This library provides the command implementations for the Collate CLI.
//! It is used by the binary entry point and exposes the commands for
//! integration purposes.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (collate, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use collate::cmd;
//!
//! // Validate configuration and content categories
//! cmd::check::run(Path::new("collate.toml"), false).unwrap();
//! ```

pub mod cmd;

// Re-export core types for convenience
pub use collate_core::{Config, ContentItem};
pub use collate_generator::{Collations, GenerationContext, RunStats, Runner};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
