//! Host configuration for vetter.
//!
//! Configuration is a small YAML file, auto-discovered in the working
//! directory when not passed explicitly. It carries the plugin root, the
//! analyzer exclusion list, the severity remapping and the SARIF code root.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::severity::SeverityMappings;

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["vetter.yaml", ".vetter.yaml"];

/// Top-level host configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Root directory scanned for plugin manifests.
    #[serde(default)]
    pub analyzers_path: Option<PathBuf>,
    /// Analyzer display names to exclude from registration.
    #[serde(default)]
    pub exclude_analyzers: Vec<String>,
    /// Code-to-severity remapping, applied before any sink.
    #[serde(default)]
    pub severity: SeverityMappings,
    /// Base directory for SARIF artifact URIs.
    #[serde(default)]
    pub code_root: Option<PathBuf>,
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Discover a configuration file in the current directory.
    ///
    /// Returns `None` when no default file exists; a missing configuration
    /// is not an error, everything has a default.
    pub fn discover() -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }
}

/// Validate a configuration before any analyzer executes.
///
/// The only invariant today is severity-set disjointness; a code remapped
/// to two severities is a configuration error.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if !config.severity.validate() {
        anyhow::bail!(
            "severity mappings overlap: a diagnostic code may be remapped to at most one severity"
        );
    }
    Ok(())
}
