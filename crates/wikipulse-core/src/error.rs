use std::path::PathBuf;

/// Errors that can occur across the wikipulse crates.
///
/// Each variant wraps a specific error domain. Per-row data problems are
/// never errors — they are recovered at the validation boundary and counted
/// in [`crate::SkippedRows`]. Only I/O, configuration, and structural misuse
/// (e.g. comparing two different metric kinds) surface here.
///
/// # Examples
///
/// ```
/// use wikipulse_core::WikipulseError;
///
/// let err = WikipulseError::Config("missing subject name".into());
/// assert!(err.to_string().contains("missing subject name"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WikipulseError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid search pattern for comment mining.
    #[error("pattern error: {0}")]
    Pattern(String),

    /// Comparator invoked with two different metric kinds.
    #[error("metric mismatch: {0}")]
    MetricMismatch(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}
