use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::WikipulseError;
use crate::types::{Granularity, ValueSelector};

/// Analysis defaults loaded from `wikipulse.toml`.
///
/// Every metric function takes its parameters explicitly; this config only
/// supplies the defaults a caller hands through, so analyses stay
/// reproducible without hidden state.
///
/// # Examples
///
/// ```
/// use wikipulse_core::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.editors.top_k, 5);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Temporal aggregation defaults.
    #[serde(default)]
    pub temporal: TemporalConfig,
    /// Editor-analysis defaults.
    #[serde(default)]
    pub editors: EditorConfig,
}

impl AnalysisConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WikipulseError::Io`] if the file cannot be read, or
    /// [`WikipulseError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wikipulse_core::AnalysisConfig;
    /// use std::path::Path;
    ///
    /// let config = AnalysisConfig::from_file(Path::new("wikipulse.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, WikipulseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`WikipulseError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use wikipulse_core::{AnalysisConfig, Granularity};
    ///
    /// let toml = r#"
    /// [temporal]
    /// granularity = "day"
    /// "#;
    /// let config = AnalysisConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.temporal.granularity, Granularity::Day);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, WikipulseError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Defaults for temporal aggregation.
///
/// # Examples
///
/// ```
/// use wikipulse_core::{Granularity, TemporalConfig, ValueSelector};
///
/// let config = TemporalConfig::default();
/// assert_eq!(config.granularity, Granularity::Month);
/// assert_eq!(config.selector, ValueSelector::EditCount);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemporalConfig {
    /// Bucket width (default: month).
    #[serde(default)]
    pub granularity: Granularity,
    /// Per-bucket aggregate (default: edit count).
    #[serde(default)]
    pub selector: ValueSelector,
}

/// Defaults for editor-diversity analysis.
///
/// # Examples
///
/// ```
/// use wikipulse_core::EditorConfig;
///
/// let config = EditorConfig::default();
/// assert_eq!(config.top_k, 5);
/// assert_eq!(config.superfan_quantile, 0.95);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// How many top contributors to rank (default: 5).
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Active-day quantile above which an editor counts as a superfan
    /// (default: 0.95, i.e. the top 5% of editors by active days).
    #[serde(default = "default_superfan_quantile")]
    pub superfan_quantile: f64,
}

fn default_top_k() -> usize {
    5
}

fn default_superfan_quantile() -> f64 {
    0.95
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            superfan_quantile: default_superfan_quantile(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_has_expected_values() {
        let config = AnalysisConfig::default();
        assert_eq!(config.temporal.granularity, Granularity::Month);
        assert_eq!(config.temporal.selector, ValueSelector::EditCount);
        assert_eq!(config.editors.top_k, 5);
        assert_eq!(config.editors.superfan_quantile, 0.95);
    }

    #[test]
    fn parse_minimal_toml() {
        let toml = r#"
[editors]
top_k = 10
"#;
        let config = AnalysisConfig::from_toml(toml).unwrap();
        assert_eq!(config.editors.top_k, 10);
        assert_eq!(config.editors.superfan_quantile, 0.95);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[temporal]
granularity = "year"
selector = "byteDeltaSum"

[editors]
top_k = 3
superfan_quantile = 0.9
"#;
        let config = AnalysisConfig::from_toml(toml).unwrap();
        assert_eq!(config.temporal.granularity, Granularity::Year);
        assert_eq!(config.temporal.selector, ValueSelector::ByteDeltaSum);
        assert_eq!(config.editors.top_k, 3);
        assert_eq!(config.editors.superfan_quantile, 0.9);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = AnalysisConfig::from_toml("").unwrap();
        assert_eq!(config.temporal.granularity, Granularity::Month);
        assert_eq!(config.editors.top_k, 5);
    }

    #[test]
    fn invalid_toml_returns_error() {
        let result = AnalysisConfig::from_toml("{{invalid}}");
        assert!(result.is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[temporal]\ngranularity = \"day\"").unwrap();
        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.temporal.granularity, Granularity::Day);
    }
}
