//! Vetter - pluggable static-analysis host.
//!
//! Vetter discovers analyzer plugins compiled against this crate's contract,
//! feeds them a shared type-check context for a source file or project,
//! aggregates their diagnostics, and reports them (console and SARIF).
//! The host implements no analysis of its own.
//!
//! # Architecture
//!
//! - `context`: the read-only data bundle handed to every analyzer, plus the
//!   `Frontend` trait to the external compiler services
//! - `registry`: plugin-manifest discovery and name-to-callable binding
//! - `engine`: concurrent fan-out/fan-in execution with per-analyzer fault
//!   isolation
//! - `severity`: user-declared code-to-severity remapping
//! - `report`: console and SARIF sinks
//! - `config`: host configuration (YAML)
//! - `cli`: command-line surface and exit codes
//!
//! # Writing a plugin
//!
//! A plugin crate registers its entry points in the catalog
//! (`registry::catalog::register`) and ships a YAML manifest whose file name
//! contains "analyzer"; the manifest binds catalog symbols to display names
//! and context kinds. See `registry` for the manifest schema.

pub mod cli;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod engine;
pub mod registry;
pub mod report;
pub mod severity;

pub use context::{
    AnalysisContext, CheckOptions, CheckOutcome, CheckedSource, ContextKind, Entity, Frontend,
    PartialCheckedSource, SymbolUse,
};
pub use diagnostics::{AnalyzerMessage, Fix, Message, Range, Severity};
pub use engine::{run_all, run_all_safely, AnalysisResult, AnalyzerFailure};
pub use registry::{AnalyzerDescriptor, Registry, RegistryError, ScanReport};
pub use severity::SeverityMappings;
