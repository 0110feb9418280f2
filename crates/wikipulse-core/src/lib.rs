//! Core types, configuration, and error handling for the wikipulse crates.
//!
//! This crate provides the shared foundation used by the metric crates:
//! - [`WikipulseError`] — unified error type using `thiserror`
//! - [`AnalysisConfig`] — analysis defaults loaded from `wikipulse.toml`
//! - The revision data model: [`RevisionRecord`], [`RevisionTable`],
//!   [`Editor`], [`RawRevision`], [`SkippedRows`]
//! - Shared metric options: [`Granularity`], [`ValueSelector`]

mod config;
mod error;
mod types;

pub use config::{AnalysisConfig, EditorConfig, TemporalConfig};
pub use error::WikipulseError;
pub use types::{
    Editor, Granularity, RawRevision, RevisionRecord, RevisionTable, SkippedRows, ValueSelector,
};

/// A convenience `Result` type for wikipulse operations.
pub type Result<T> = std::result::Result<T, WikipulseError>;
