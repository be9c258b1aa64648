//! Analysis context handed to every analyzer, and the boundary to the
//! external compiler front-end that produces it.
//!
//! The host does not parse or type-check anything itself. A [`Frontend`]
//! implementation supplies the phase outcomes for one file; the host wraps
//! them into an [`AnalysisContext`] and shares that read-only bundle across
//! all analyzers for a run.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Message, Range};

/// Which flavor of context a host run provides.
///
/// Analyzer entry points declare the kind they support; the registry only
/// admits entries matching the kind the host requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    /// One-shot CLI run: all phases are required to have succeeded.
    Cli,
    /// Editor/incremental run: any phase may be missing.
    Editor,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKind::Cli => "cli",
            ContextKind::Editor => "editor",
        }
    }
}

impl std::fmt::Display for ContextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An entity (binding, type, member) visible in the typed tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    /// Fully qualified name, when the front-end can provide one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    pub is_public: bool,
    pub range: Range,
}

/// One use of a symbol in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolUse {
    pub name: String,
    /// True when this use is the symbol's own definition site.
    pub is_definition: bool,
    pub range: Range,
}

/// Outcome of the parse phase.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub diagnostics: Vec<Message>,
}

/// Outcome of the file-level type-check phase.
#[derive(Debug, Clone, Default)]
pub struct FileCheckOutcome {
    pub symbol_uses: Vec<SymbolUse>,
    pub diagnostics: Vec<Message>,
}

/// Typed-tree contents for the checked file.
#[derive(Debug, Clone, Default)]
pub struct TypedTree {
    pub entities: Vec<Entity>,
}

/// Outcome of the project-wide check phase.
#[derive(Debug, Clone, Default)]
pub struct ProjectCheckOutcome {
    pub symbol_uses: Vec<SymbolUse>,
    pub diagnostics: Vec<Message>,
}

/// All phase outcomes for one successfully checked file.
#[derive(Debug, Clone)]
pub struct CheckedSource {
    pub parse: ParseOutcome,
    pub check: FileCheckOutcome,
    pub typed_tree: TypedTree,
    pub project_check: ProjectCheckOutcome,
}

/// Phase outcomes where one or more phases may have failed or not run.
#[derive(Debug, Clone, Default)]
pub struct PartialCheckedSource {
    pub parse: Option<ParseOutcome>,
    pub check: Option<FileCheckOutcome>,
    pub typed_tree: Option<TypedTree>,
    pub project_check: Option<ProjectCheckOutcome>,
}

/// Result of asking the front-end to check one file.
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// Every phase succeeded.
    Complete(CheckedSource),
    /// One or more phases failed; the rest are carried as-is.
    Incomplete(PartialCheckedSource),
}

/// Options forwarded to the front-end for one check.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Compiler arguments resolved by the project-system loader.
    pub compiler_args: Vec<String>,
}

/// The external compiler-services collaborator.
///
/// Implementations parse and type-check one file (within its project) and
/// hand back the phase outcomes. The host never inspects source itself.
pub trait Frontend: Send + Sync {
    /// Human-readable name for logs and reports.
    fn name(&self) -> &str;

    /// Check `source` as the contents of `file_name`.
    ///
    /// Phase failures are reported through [`CheckOutcome::Incomplete`];
    /// `Err` is reserved for the front-end itself being unable to run.
    fn check(
        &self,
        file_name: &str,
        source: &str,
        options: &CheckOptions,
    ) -> anyhow::Result<CheckOutcome>;
}

/// Full-context data: every phase present (CLI one-shot runs).
#[derive(Debug, Clone)]
pub struct FullContext {
    pub file_name: String,
    pub source: String,
    pub parse: ParseOutcome,
    pub check: FileCheckOutcome,
    pub typed_tree: TypedTree,
    pub project_check: ProjectCheckOutcome,
}

/// Partial-context data: any phase may be absent (editor runs).
#[derive(Debug, Clone)]
pub struct PartialContext {
    pub file_name: String,
    pub source: Option<String>,
    pub parse: Option<ParseOutcome>,
    pub check: Option<FileCheckOutcome>,
    pub typed_tree: Option<TypedTree>,
    pub project_check: Option<ProjectCheckOutcome>,
}

/// The read-only bundle of facts about one file, shared by reference across
/// every analyzer in a run.
///
/// Both variants expose the same capability surface; the Partial variant
/// degrades gracefully, returning empty results for any query whose
/// underlying phase is missing.
#[derive(Debug, Clone)]
pub enum AnalysisContext {
    Full(FullContext),
    Partial(PartialContext),
}

impl AnalysisContext {
    /// Build a Full context from a complete check.
    pub fn full(file_name: impl Into<String>, source: impl Into<String>, checked: CheckedSource) -> Self {
        AnalysisContext::Full(FullContext {
            file_name: file_name.into(),
            source: source.into(),
            parse: checked.parse,
            check: checked.check,
            typed_tree: checked.typed_tree,
            project_check: checked.project_check,
        })
    }

    /// Build a Partial context, tolerating missing phases.
    pub fn partial(
        file_name: impl Into<String>,
        source: Option<String>,
        phases: PartialCheckedSource,
    ) -> Self {
        AnalysisContext::Partial(PartialContext {
            file_name: file_name.into(),
            source,
            parse: phases.parse,
            check: phases.check,
            typed_tree: phases.typed_tree,
            project_check: phases.project_check,
        })
    }

    /// Wrap a front-end outcome for editor use: a complete check becomes a
    /// Full context, an incomplete one a Partial context.
    pub fn from_outcome(
        file_name: impl Into<String>,
        source: impl Into<String>,
        outcome: CheckOutcome,
    ) -> Self {
        let file_name = file_name.into();
        let source = source.into();
        match outcome {
            CheckOutcome::Complete(checked) => AnalysisContext::full(file_name, source, checked),
            CheckOutcome::Incomplete(phases) => {
                AnalysisContext::partial(file_name, Some(source), phases)
            }
        }
    }

    pub fn kind(&self) -> ContextKind {
        match self {
            AnalysisContext::Full(_) => ContextKind::Cli,
            AnalysisContext::Partial(_) => ContextKind::Editor,
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            AnalysisContext::Full(c) => &c.file_name,
            AnalysisContext::Partial(c) => &c.file_name,
        }
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            AnalysisContext::Full(c) => Some(&c.source),
            AnalysisContext::Partial(c) => c.source.as_deref(),
        }
    }

    /// All entities visible at this point, optionally public-only.
    pub fn entities(&self, public_only: bool) -> Vec<Entity> {
        let entities = match self {
            AnalysisContext::Full(c) => &c.typed_tree.entities,
            AnalysisContext::Partial(c) => match &c.typed_tree {
                Some(tree) => &tree.entities,
                None => return Vec::new(),
            },
        };
        entities
            .iter()
            .filter(|e| !public_only || e.is_public)
            .cloned()
            .collect()
    }

    /// All symbol uses in the whole project.
    pub fn symbol_uses_in_project(&self) -> Vec<SymbolUse> {
        match self {
            AnalysisContext::Full(c) => c.project_check.symbol_uses.clone(),
            AnalysisContext::Partial(c) => c
                .project_check
                .as_ref()
                .map(|p| p.symbol_uses.clone())
                .unwrap_or_default(),
        }
    }

    /// All symbol uses in this file.
    pub fn symbol_uses_in_file(&self) -> Vec<SymbolUse> {
        match self {
            AnalysisContext::Full(c) => c.check.symbol_uses.clone(),
            AnalysisContext::Partial(c) => c
                .check
                .as_ref()
                .map(|f| f.symbol_uses.clone())
                .unwrap_or_default(),
        }
    }

    /// Diagnostics reported by the phases themselves (parse and check
    /// errors), for hosts that want to surface them alongside analyzer
    /// output. Missing phases contribute nothing.
    pub fn phase_diagnostics(&self) -> Vec<Message> {
        let mut out = Vec::new();
        match self {
            AnalysisContext::Full(c) => {
                out.extend(c.parse.diagnostics.iter().cloned());
                out.extend(c.check.diagnostics.iter().cloned());
                out.extend(c.project_check.diagnostics.iter().cloned());
            }
            AnalysisContext::Partial(c) => {
                if let Some(parse) = &c.parse {
                    out.extend(parse.diagnostics.iter().cloned());
                }
                if let Some(check) = &c.check {
                    out.extend(check.diagnostics.iter().cloned());
                }
                if let Some(project) = &c.project_check {
                    out.extend(project.diagnostics.iter().cloned());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str, is_public: bool) -> Entity {
        Entity {
            name: name.to_string(),
            qualified_name: None,
            is_public,
            range: Range::new("a.src", 1, 0),
        }
    }

    fn symbol_use(name: &str) -> SymbolUse {
        SymbolUse {
            name: name.to_string(),
            is_definition: false,
            range: Range::new("a.src", 2, 4),
        }
    }

    fn checked() -> CheckedSource {
        CheckedSource {
            parse: ParseOutcome::default(),
            check: FileCheckOutcome {
                symbol_uses: vec![symbol_use("x")],
                diagnostics: Vec::new(),
            },
            typed_tree: TypedTree {
                entities: vec![entity("pub_fn", true), entity("priv_fn", false)],
            },
            project_check: ProjectCheckOutcome {
                symbol_uses: vec![symbol_use("x"), symbol_use("y")],
                diagnostics: Vec::new(),
            },
        }
    }

    #[test]
    fn test_full_context_capabilities() {
        let ctx = AnalysisContext::full("a.src", "let x = 1", checked());
        assert_eq!(ctx.entities(false).len(), 2);
        assert_eq!(ctx.entities(true).len(), 1);
        assert_eq!(ctx.symbol_uses_in_file().len(), 1);
        assert_eq!(ctx.symbol_uses_in_project().len(), 2);
        assert_eq!(ctx.kind(), ContextKind::Cli);
    }

    #[test]
    fn test_partial_missing_phases_yield_empty() {
        let ctx = AnalysisContext::partial("a.src", None, PartialCheckedSource::default());
        assert!(ctx.entities(false).is_empty());
        assert!(ctx.symbol_uses_in_file().is_empty());
        assert!(ctx.symbol_uses_in_project().is_empty());
        assert!(ctx.phase_diagnostics().is_empty());
        assert_eq!(ctx.kind(), ContextKind::Editor);
    }

    #[test]
    fn test_partial_present_phase_is_queried() {
        let phases = PartialCheckedSource {
            typed_tree: Some(TypedTree {
                entities: vec![entity("only", true)],
            }),
            ..Default::default()
        };
        let ctx = AnalysisContext::partial("a.src", None, phases);
        assert_eq!(ctx.entities(true).len(), 1);
        assert!(ctx.symbol_uses_in_project().is_empty());
    }

    #[test]
    fn test_from_outcome_complete_is_full() {
        let ctx = AnalysisContext::from_outcome("a.src", "src", CheckOutcome::Complete(checked()));
        assert!(matches!(ctx, AnalysisContext::Full(_)));
    }

    #[test]
    fn test_from_outcome_incomplete_is_partial() {
        let ctx = AnalysisContext::from_outcome(
            "a.src",
            "src",
            CheckOutcome::Incomplete(PartialCheckedSource::default()),
        );
        assert!(matches!(ctx, AnalysisContext::Partial(_)));
    }
}
