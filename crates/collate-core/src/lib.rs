//! Collate Core Library
//!
//! Core types, configuration, and error handling for the Collate content collator.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;

pub use config::{CategoryFilter, CollateConfig, Config};
pub use content::{Category, ContentItem, ContentKind};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
