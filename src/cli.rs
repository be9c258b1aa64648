//! Command-line interface for vetter.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;

use crate::config::{self, Config};
use crate::context::{AnalysisContext, CheckOptions, CheckOutcome, ContextKind};
use crate::diagnostics::{AnalyzerMessage, Severity};
use crate::engine;
use crate::registry::{catalog, Registry};
use crate::report;
use crate::severity::SeverityMappings;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
/// At least one diagnostic reached Error severity after remapping.
pub const EXIT_FAILED: i32 = 1;
/// No analysis could run (configuration/usage error).
pub const EXIT_ERROR: i32 = 2;

/// Pluggable static-analysis host.
///
/// Vetter discovers analyzer plugins, runs them concurrently against a
/// shared type-check context for each source file, and reports the
/// aggregated diagnostics on the console or as a SARIF report.
#[derive(Parser)]
#[command(name = "vetter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run all registered analyzers against source files
    Check(CheckArgs),
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Source files to analyze
    pub paths: Vec<PathBuf>,

    /// Directory scanned for analyzer plugin manifests
    #[arg(short, long)]
    pub analyzers_path: Option<PathBuf>,

    /// Path to configuration YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or sarif
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Write SARIF output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Analyzer names to exclude (repeatable)
    #[arg(long = "exclude-analyzer")]
    pub exclude_analyzers: Vec<String>,

    /// Base directory for SARIF artifact URIs
    #[arg(long)]
    pub code_root: Option<PathBuf>,

    /// Compiler arguments forwarded to the front-end
    #[arg(long = "compiler-arg")]
    pub compiler_args: Vec<String>,
}

/// Compute the exit code for a finished run from its remapped messages.
pub fn exit_code_for(messages: &[AnalyzerMessage]) -> i32 {
    if messages
        .iter()
        .any(|m| m.message.severity == Severity::Error)
    {
        EXIT_FAILED
    } else {
        EXIT_SUCCESS
    }
}

/// Apply severity remapping to every message.
pub fn remap_severities(
    mappings: &SeverityMappings,
    messages: Vec<AnalyzerMessage>,
) -> Vec<AnalyzerMessage> {
    messages
        .into_iter()
        .map(|mut am| {
            am.message = mappings.apply(&am.message);
            am
        })
        .collect()
}

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "sarif" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'sarif'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    if args.paths.is_empty() {
        eprintln!("Error: no source files given, nothing to analyze");
        return Ok(EXIT_ERROR);
    }

    // Load configuration (explicit path, else auto-discovered, else default).
    let config = match load_config(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    // Configuration errors stop the run before any analyzer executes.
    if let Err(e) = config::validate(&config) {
        eprintln!("Error: invalid configuration: {}", e);
        return Ok(EXIT_ERROR);
    }

    let analyzers_path = match args
        .analyzers_path
        .clone()
        .or_else(|| config.analyzers_path.clone())
    {
        Some(p) => p,
        None => {
            eprintln!("Error: no analyzers path given (flag --analyzers-path or config)");
            return Ok(EXIT_ERROR);
        }
    };

    let mut excluded: HashSet<String> = config.exclude_analyzers.iter().cloned().collect();
    excluded.extend(args.exclude_analyzers.iter().cloned());

    // Discover and register plugins.
    let mut registry = Registry::new(ContextKind::Cli);
    let scan = registry.scan(&analyzers_path, &excluded)?;

    if scan.plugin_files == 0 {
        eprintln!(
            "Error: no analyzer plugins found under {}",
            analyzers_path.display()
        );
        return Ok(EXIT_ERROR);
    }
    if scan.analyzers == 0 {
        eprintln!(
            "Error: {} plugin file(s) found but no analyzers could be registered",
            scan.plugin_files
        );
        return Ok(EXIT_ERROR);
    }

    let frontend = match catalog::frontend() {
        Some(f) => f,
        None => {
            eprintln!("Error: no compiler front-end installed in this host build");
            return Ok(EXIT_ERROR);
        }
    };

    let options = CheckOptions {
        compiler_args: args.compiler_args.clone(),
    };

    // Analyze each file with a Full context; a file whose check is
    // incomplete is fatal for that file in CLI mode and is skipped.
    let mut messages: Vec<AnalyzerMessage> = Vec::new();
    let mut analyzed = 0usize;
    for path in &args.paths {
        let file_name = path.to_string_lossy().to_string();
        let source = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                error!("cannot read {}: {}", file_name, e);
                continue;
            }
        };
        let ctx = match frontend.check(&file_name, &source, &options)? {
            CheckOutcome::Complete(checked) => {
                AnalysisContext::full(file_name.as_str(), source, checked)
            }
            CheckOutcome::Incomplete(_) => {
                error!("type-check incomplete for {}, skipping", file_name);
                continue;
            }
        };
        analyzed += 1;
        messages.extend(engine::run_all(&registry, &ctx));
    }

    if analyzed == 0 {
        eprintln!("Error: no file could be analyzed");
        return Ok(EXIT_ERROR);
    }

    let messages = remap_severities(&config.severity, messages);

    let code_root = args
        .code_root
        .clone()
        .or_else(|| config.code_root.clone())
        .unwrap_or_default();

    match args.format.as_str() {
        "sarif" => match &args.output {
            Some(out_path) => {
                let mut file = fs::File::create(out_path)?;
                report::write_sarif(&mut file, &messages, &code_root)?;
            }
            None => {
                let stdout = std::io::stdout();
                report::write_sarif(&mut stdout.lock(), &messages, &code_root)?;
            }
        },
        _ => {
            let shown = args
                .paths
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            report::write_pretty(&shown, &messages, registry.len());
        }
    }

    Ok(exit_code_for(&messages))
}

fn load_config(args: &CheckArgs) -> anyhow::Result<Config> {
    match &args.config {
        Some(path) => Config::parse_file(path),
        None => match Config::discover() {
            Some(path) => Config::parse_file(path),
            None => Ok(Config::default()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Message, Range};

    fn analyzer_message(code: &str, severity: Severity) -> AnalyzerMessage {
        AnalyzerMessage::new(
            "Test",
            Message {
                kind: "lint".to_string(),
                code: code.to_string(),
                message: "test".to_string(),
                severity,
                range: Range::new("a.src", 1, 0),
                fixes: Vec::new(),
            },
        )
    }

    #[test]
    fn test_exit_code_clean() {
        let messages = vec![analyzer_message("FS001", Severity::Warning)];
        assert_eq!(exit_code_for(&messages), EXIT_SUCCESS);
    }

    #[test]
    fn test_exit_code_with_error() {
        let messages = vec![
            analyzer_message("FS001", Severity::Hint),
            analyzer_message("FS002", Severity::Error),
        ];
        assert_eq!(exit_code_for(&messages), EXIT_FAILED);
    }

    #[test]
    fn test_remap_then_exit_code() {
        // A Hint remapped to Error must flip the exit code.
        let mappings: SeverityMappings = serde_yaml::from_str("error: [FS001]").unwrap();
        let messages = vec![analyzer_message("FS001", Severity::Hint)];
        assert_eq!(exit_code_for(&messages), EXIT_SUCCESS);

        let remapped = remap_severities(&mappings, messages);
        assert_eq!(remapped[0].message.severity, Severity::Error);
        assert_eq!(exit_code_for(&remapped), EXIT_FAILED);
    }
}
