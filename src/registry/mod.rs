//! Analyzer registry: discovers plugin manifests on disk and binds their
//! entry points to callables from the catalog.
//!
//! Discovery is best-effort per manifest: one unreadable or unresolvable
//! plugin never aborts discovery of the others. Failures are logged on the
//! error channel and recorded in the [`ScanReport`].

pub mod catalog;
mod manifest;

pub use catalog::{AnalyzerFn, CatalogEntry};
pub use manifest::{is_manifest_path, Manifest, ManifestEntry, DEFAULT_ANALYZER_NAME};

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error};
use walkdir::WalkDir;

use crate::context::ContextKind;

/// Errors recorded during a registry scan.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("manifest {path}: entry point {symbol:?} is not linked into this host")]
    UnknownSymbol { path: PathBuf, symbol: String },
}

/// The registry's record binding a display name to a callable analyzer.
#[derive(Clone)]
pub struct AnalyzerDescriptor {
    pub name: String,
    /// Context kind this analyzer requires.
    pub requires: ContextKind,
    pub callable: AnalyzerFn,
    /// SARIF rule metadata, when the plugin provides it.
    pub short_description: Option<String>,
    pub help_uri: Option<String>,
}

impl std::fmt::Debug for AnalyzerDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerDescriptor")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}

/// Outcome of one scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Manifest files matching the plugin naming pattern (attempted,
    /// regardless of load success).
    pub plugin_files: usize,
    /// Entry points successfully registered.
    pub analyzers: usize,
    /// Per-manifest and per-entry failures, in discovery order.
    pub load_errors: Vec<RegistryError>,
}

/// Name-to-descriptor mapping for one context kind.
///
/// Built once at startup, then read-only for the rest of the process.
/// Descriptors are kept sorted by name, which is also the engine's
/// submission order.
pub struct Registry {
    kind: ContextKind,
    analyzers: BTreeMap<String, AnalyzerDescriptor>,
}

impl Registry {
    pub fn new(kind: ContextKind) -> Self {
        Self {
            kind,
            analyzers: BTreeMap::new(),
        }
    }

    /// The context kind this registry admits.
    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    /// Register a descriptor directly.
    ///
    /// Duplicate names are last-wins: a later registration under the same
    /// name silently replaces the earlier one. This is an accepted
    /// ambiguity of name-based binding.
    pub fn register(&mut self, descriptor: AnalyzerDescriptor) {
        self.analyzers.insert(descriptor.name.clone(), descriptor);
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&AnalyzerDescriptor> {
        self.analyzers.get(name)
    }

    /// All descriptors in name order.
    pub fn descriptors(&self) -> Vec<&AnalyzerDescriptor> {
        self.analyzers.values().collect()
    }

    /// Registered analyzer names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.analyzers.keys().cloned().collect()
    }

    /// Recursively scan `root` for plugin manifests and register every
    /// matching entry point.
    ///
    /// An entry is registered when its symbol resolves in the catalog, its
    /// declared kind matches this registry's kind, and its display name is
    /// not in `excluded`. Manifest-level and entry-level failures are
    /// logged, recorded in the report, and skipped.
    pub fn scan<P: AsRef<Path>>(
        &mut self,
        root: P,
        excluded: &HashSet<String>,
    ) -> anyhow::Result<ScanReport> {
        let mut report = ScanReport::default();

        for entry in WalkDir::new(root.as_ref()).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_manifest_path(entry.path()) {
                continue;
            }
            report.plugin_files += 1;

            let manifest = match Manifest::parse_file(entry.path()) {
                Ok(m) => m,
                Err(e) => {
                    error!("skipping plugin: {}", e);
                    report.load_errors.push(e);
                    continue;
                }
            };

            for plugin_entry in &manifest.entries {
                self.register_entry(entry.path(), plugin_entry, excluded, &mut report);
            }
        }

        Ok(report)
    }

    fn register_entry(
        &mut self,
        manifest_path: &Path,
        entry: &ManifestEntry,
        excluded: &HashSet<String>,
        report: &mut ScanReport,
    ) {
        let name = entry.display_name();

        if entry.kind != self.kind {
            debug!(
                "skipping {:?}: requires {} context, registry is {}",
                name, entry.kind, self.kind
            );
            return;
        }
        if excluded.contains(name) {
            debug!("skipping {:?}: excluded by configuration", name);
            return;
        }

        let catalog_entry = match catalog::resolve(&entry.symbol) {
            Some(c) => c,
            None => {
                let err = RegistryError::UnknownSymbol {
                    path: manifest_path.to_path_buf(),
                    symbol: entry.symbol.clone(),
                };
                error!("skipping entry: {}", err);
                report.load_errors.push(err);
                return;
            }
        };

        self.register(AnalyzerDescriptor {
            name: name.to_string(),
            requires: entry.kind,
            callable: catalog_entry.callable,
            short_description: entry.short_description.clone(),
            help_uri: entry.help_uri.clone(),
        });
        report.analyzers += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    use crate::diagnostics::{Message, Range, Severity};

    fn descriptor(name: &str, code: &str) -> AnalyzerDescriptor {
        let code = code.to_string();
        AnalyzerDescriptor {
            name: name.to_string(),
            requires: ContextKind::Cli,
            callable: Arc::new(move |_ctx| {
                Ok(vec![Message {
                    kind: "lint".to_string(),
                    code: code.clone(),
                    message: "test".to_string(),
                    severity: Severity::Warning,
                    range: Range::new("a.src", 1, 0),
                    fixes: Vec::new(),
                }])
            }),
            short_description: None,
            help_uri: None,
        }
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let mut registry = Registry::new(ContextKind::Cli);
        registry.register(descriptor("Dup", "FS001"));
        registry.register(descriptor("Dup", "FS002"));

        assert_eq!(registry.len(), 1);
        let ctx = crate::context::AnalysisContext::partial("a.src", None, Default::default());
        let messages = (registry.get("Dup").unwrap().callable)(&ctx).unwrap();
        assert_eq!(messages[0].code, "FS002");
    }

    #[test]
    fn test_scan_registers_good_and_records_corrupt() {
        catalog::register("registry_test_no_unused", ContextKind::Cli, |_ctx| {
            Ok(Vec::new())
        });

        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("good-analyzer.yaml"),
            r#"
entries:
  - symbol: registry_test_no_unused
    name: NoUnusedValues
    kind: cli
"#,
        )
        .unwrap();
        fs::write(temp.path().join("broken-analyzer.yaml"), "entries: [ {{").unwrap();
        // Not matching the naming pattern: must be ignored entirely
        fs::write(temp.path().join("notes.yaml"), "entries: []").unwrap();

        let mut registry = Registry::new(ContextKind::Cli);
        let report = registry.scan(temp.path(), &HashSet::new()).unwrap();

        assert_eq!(report.plugin_files, 2);
        assert_eq!(report.analyzers, 1);
        assert_eq!(report.load_errors.len(), 1);
        assert!(registry.get("NoUnusedValues").is_some());
    }

    #[test]
    fn test_scan_records_unknown_symbol() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("ghost-analyzer.yaml"),
            r#"
entries:
  - symbol: registry_test_never_registered
    name: Ghost
"#,
        )
        .unwrap();

        let mut registry = Registry::new(ContextKind::Cli);
        let report = registry.scan(temp.path(), &HashSet::new()).unwrap();

        assert_eq!(report.plugin_files, 1);
        assert_eq!(report.analyzers, 0);
        assert_eq!(report.load_errors.len(), 1);
        assert!(matches!(
            report.load_errors[0],
            RegistryError::UnknownSymbol { .. }
        ));
    }

    #[test]
    fn test_scan_honors_exclusions_and_kind() {
        catalog::register("registry_test_excluded", ContextKind::Cli, |_ctx| {
            Ok(Vec::new())
        });
        catalog::register("registry_test_editor_only", ContextKind::Editor, |_ctx| {
            Ok(Vec::new())
        });

        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("mixed-analyzer.yaml"),
            r#"
entries:
  - symbol: registry_test_excluded
    name: Unwanted
    kind: cli
  - symbol: registry_test_editor_only
    name: EditorOnly
    kind: editor
"#,
        )
        .unwrap();

        let excluded: HashSet<String> = ["Unwanted".to_string()].into_iter().collect();
        let mut registry = Registry::new(ContextKind::Cli);
        let report = registry.scan(temp.path(), &excluded).unwrap();

        // Kind mismatch and exclusion are skips, not load errors.
        assert_eq!(report.plugin_files, 1);
        assert_eq!(report.analyzers, 0);
        assert!(report.load_errors.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_descriptors_are_name_ordered() {
        let mut registry = Registry::new(ContextKind::Cli);
        registry.register(descriptor("Zeta", "FS001"));
        registry.register(descriptor("Alpha", "FS002"));
        let names: Vec<_> = registry
            .descriptors()
            .iter()
            .map(|d| d.name.clone())
            .collect();
        assert_eq!(names, vec!["Alpha".to_string(), "Zeta".to_string()]);
    }
}
