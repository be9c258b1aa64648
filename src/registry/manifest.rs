//! Plugin manifest schema and loading.
//!
//! A plugin ships a small YAML manifest next to (or instead of) its code.
//! The file name must contain "analyzer" and end in `.yaml`/`.yml` to be
//! picked up by the registry scan; the manifest lists the entry-point
//! symbols the plugin registered in the catalog.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::ContextKind;

/// Display name used when a plugin entry omits one.
pub const DEFAULT_ANALYZER_NAME: &str = "Analyzer";

/// One exported entry point.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ManifestEntry {
    /// Catalog symbol this entry resolves to.
    pub symbol: String,
    /// Display name; defaults to [`DEFAULT_ANALYZER_NAME`].
    #[serde(default)]
    pub name: Option<String>,
    /// Context kind the entry supports.
    #[serde(default = "default_kind")]
    pub kind: ContextKind,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub help_uri: Option<String>,
}

fn default_kind() -> ContextKind {
    ContextKind::Cli
}

impl ManifestEntry {
    /// The effective display name for this entry.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_ANALYZER_NAME)
    }
}

/// A plugin manifest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Manifest {
    /// Optional plugin name, for logs only.
    #[serde(default)]
    pub plugin: Option<String>,
    #[serde(default)]
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parse a manifest from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, super::RegistryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| super::RegistryError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| super::RegistryError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Whether a path looks like a plugin manifest: the file stem contains
/// "analyzer" (case-insensitive) and the extension is `.yaml` or `.yml`.
pub fn is_manifest_path(path: &Path) -> bool {
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);
    if !ext_ok {
        return false;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase().contains("analyzer"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_is_manifest_path() {
        assert!(is_manifest_path(&PathBuf::from("plugins/MyAnalyzer.yaml")));
        assert!(is_manifest_path(&PathBuf::from("unused-analyzer.yml")));
        assert!(!is_manifest_path(&PathBuf::from("analyzer.toml")));
        assert!(!is_manifest_path(&PathBuf::from("plugins/checker.yaml")));
    }

    #[test]
    fn test_parse_manifest() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("demo-analyzer.yaml");
        std::fs::write(
            &path,
            r#"
plugin: demo
entries:
  - symbol: demo_entry
    name: DemoAnalyzer
    kind: cli
    short_description: A demo
"#,
        )
        .unwrap();

        let manifest = Manifest::parse_file(&path).unwrap();
        assert_eq!(manifest.plugin.as_deref(), Some("demo"));
        assert_eq!(manifest.entries.len(), 1);
        assert_eq!(manifest.entries[0].display_name(), "DemoAnalyzer");
        assert_eq!(manifest.entries[0].kind, ContextKind::Cli);
    }

    #[test]
    fn test_entry_defaults() {
        let manifest: Manifest = serde_yaml::from_str(
            r#"
entries:
  - symbol: bare
"#,
        )
        .unwrap();
        let entry = &manifest.entries[0];
        assert_eq!(entry.display_name(), DEFAULT_ANALYZER_NAME);
        assert_eq!(entry.kind, ContextKind::Cli);
        assert!(entry.short_description.is_none());
    }

    #[test]
    fn test_parse_corrupt_manifest_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("bad-analyzer.yaml");
        std::fs::write(&path, "entries: [ {{ not yaml").unwrap();
        assert!(Manifest::parse_file(&path).is_err());
    }
}
