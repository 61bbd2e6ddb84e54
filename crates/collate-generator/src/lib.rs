//! Collate Generator Library
//!
//! Content collection and category collation for static sites.
//!
//! # Modules
//!
//! - [`collation`] - Category sanitizing and grouping
//! - [`context`] - Generation context shared across a run
//! - [`signals`] - Generator lifecycle signals
//! - [`plugin`] - Collation handlers and their registration
//! - [`collector`] - Content collection from disk
//! - [`run`] - Run orchestration

pub mod collation;
pub mod collector;
pub mod context;
pub mod plugin;
pub mod run;
pub mod signals;

pub use collation::{
    Collatable, CollateError, CollateStats, Collations, collate, group_key, sanitize_category,
};
pub use collector::{CollectedContent, ContentCollector};
pub use context::{COLLATIONS_KEY, GenerationContext, Generator};
pub use run::{RunStats, Runner};
pub use signals::{Signal, Signals};
