//! Tunables of the resolver itself
//!
//! These knobs describe how the pipeline behaves, not where properties come
//! from. They can be embedded in an application's own TOML configuration:
//!
//! ```toml
//! namespace_aggregation = true
//! namespace_parallel_threshold = 1024
//! max_substitution_depth = 16
//! disabled_features = ["parameter_formatting"]
//! ```

use crate::Result;
use props_meta::Feature;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Resolver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether a missing or default-valued key is retried as a namespace pattern
    pub namespace_aggregation: bool,

    /// Key-set size from which namespace matching runs on the rayon pool
    pub namespace_parallel_threshold: usize,

    /// Nesting limit for recursive `${...}` expansion
    pub max_substitution_depth: usize,

    /// Features switched off for every accessor of every handler built with
    /// these settings
    pub disabled_features: Vec<Feature>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            namespace_aggregation: true,
            namespace_parallel_threshold: 256,
            max_substitution_depth: props_text::substitutor::DEFAULT_MAX_DEPTH,
            disabled_features: Vec::new(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML. Missing fields keep their defaults.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(?path, "Loading resolver settings");
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn parse_empty_keeps_defaults() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn parse_overrides_only_given_fields() {
        let settings = Settings::parse("namespace_parallel_threshold = 8").unwrap();
        assert_eq!(settings.namespace_parallel_threshold, 8);
        assert!(settings.namespace_aggregation);
        assert_eq!(settings.max_substitution_depth, 32);
    }

    #[test]
    fn parse_rejects_wrong_types() {
        let err = Settings::parse("namespace_aggregation = \"yes\"").unwrap_err();
        assert!(matches!(err, crate::Error::TomlDe(_)));
    }

    #[test]
    fn parse_disabled_features() {
        let settings =
            Settings::parse("disabled_features = [\"variable_expansion\"]").unwrap();
        assert_eq!(settings.disabled_features, vec![Feature::VariableExpansion]);

        let err = Settings::parse("disabled_features = [\"caching\"]").unwrap_err();
        assert!(matches!(err, crate::Error::TomlDe(_)));
    }

    #[test]
    fn load_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("resolver.toml");
        std::fs::write(&path, "namespace_aggregation = false\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert!(!settings.namespace_aggregation);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = Settings::load(temp_dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
