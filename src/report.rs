//! Output sinks for analyzer messages.
//!
//! Two sinks:
//! - Pretty: colored terminal output for human readability
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI
//!   integration
//!
//! Columns are 0-based everywhere inside the host; the SARIF sink is the
//! only place they are incremented to the 1-based convention.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use colored::*;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{AnalyzerMessage, Severity};

/// Sort messages into the deterministic display order: file, position,
/// code, analyzer. Completion order out of the engine is unspecified, so
/// every sink sorts first.
pub fn sort_for_display(messages: &mut [AnalyzerMessage]) {
    messages.sort_by(|a, b| {
        let ka = (
            &a.message.range.file,
            a.message.range.start_line,
            a.message.range.start_col,
            &a.message.code,
            &a.analyzer,
        );
        let kb = (
            &b.message.range.file,
            b.message.range.start_line,
            b.message.range.start_col,
            &b.message.code,
            &b.analyzer,
        );
        ka.cmp(&kb)
    });
}

// =============================================================================
// Pretty format
// =============================================================================

/// Write messages in pretty (human-readable) format to stdout.
pub fn write_pretty(path: &str, messages: &[AnalyzerMessage], analyzer_count: usize) {
    let mut sorted = messages.to_vec();
    sort_for_display(&mut sorted);

    println!();
    print!("  ");
    print!("{}", "vetter".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Analyzing: ".dimmed());
    println!("{}", path);
    print!("  {}", "Analyzers: ".dimmed());
    println!("{}", analyzer_count);
    println!();

    if sorted.is_empty() {
        println!("  {}", "✓ No diagnostics".green());
        println!();
        return;
    }

    println!("  {} ({}):", "Diagnostics".bold(), sorted.len());
    println!();

    for am in &sorted {
        let m = &am.message;
        write_severity_tag(&m.severity);
        print!("   ");
        print!("{:<10}", m.code.dimmed());
        print!("{}", m.range.file.blue());
        print!(
            "{}",
            format!(":{}:{}", m.range.start_line, m.range.start_col).dimmed()
        );
        println!("  {}", format!("[{}]", am.analyzer).dimmed());

        println!("            {}", m.message);
        if !m.fixes.is_empty() {
            let plural = if m.fixes.len() != 1 { "es" } else { "" };
            println!(
                "            {}",
                format!("({} suggested fix{})", m.fixes.len(), plural).dimmed()
            );
        }
        println!();
    }

    write_summary(&sorted);
    println!();
}

fn write_severity_tag(severity: &Severity) {
    match severity {
        Severity::Error => print!("    {} ", "ERROR".red()),
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
        Severity::Hint => print!("    {} ", "HINT ".cyan()),
        Severity::Info => print!("    {} ", "INFO ".blue()),
    }
}

fn write_summary(messages: &[AnalyzerMessage]) {
    let errors = count_severity(messages, Severity::Error);
    let warnings = count_severity(messages, Severity::Warning);

    print!("  ");
    if errors > 0 {
        print!("{}", format!("{} error(s)", errors).red());
    } else {
        print!("{}", "0 errors".green());
    }
    print!("  ");
    if warnings > 0 {
        print!("{}", format!("{} warning(s)", warnings).yellow());
    } else {
        print!("{}", "0 warnings".dimmed());
    }
    println!();
}

fn count_severity(messages: &[AnalyzerMessage], severity: Severity) -> usize {
    messages
        .iter()
        .filter(|m| m.message.severity == severity)
        .count()
}

// =============================================================================
// SARIF format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "vetter";
const INFO_URI: &str = "https://github.com/vetter-host/vetter";

#[derive(Serialize, Deserialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    #[serde(rename = "informationUri")]
    pub information_uri: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifText,
    #[serde(rename = "helpUri", skip_serializing_if = "Option::is_none")]
    pub help_uri: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifText,
    pub locations: Vec<SarifLocation>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifText {
    pub text: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifact,
    pub region: SarifRegion,
}

#[derive(Serialize, Deserialize)]
pub struct SarifArtifact {
    pub uri: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRegion {
    #[serde(rename = "startLine")]
    pub start_line: u32,
    #[serde(rename = "startColumn")]
    pub start_column: u32,
    #[serde(rename = "endLine")]
    pub end_line: u32,
    #[serde(rename = "endColumn")]
    pub end_column: u32,
}

fn make_relative_uri(file: &str, code_root: &Path) -> String {
    if code_root.as_os_str().is_empty() {
        return file.replace('\\', "/");
    }
    Path::new(file)
        .strip_prefix(code_root)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file.replace('\\', "/"))
}

/// Build the SARIF report for a set of messages.
///
/// Each unique diagnostic code becomes one rule descriptor; rule metadata
/// comes from the first message carrying it. Each message becomes one
/// result with a 1-based region.
pub fn build_sarif(messages: &[AnalyzerMessage], code_root: &Path) -> SarifReport {
    let mut sorted = messages.to_vec();
    sort_for_display(&mut sorted);

    // One rule per unique code; BTreeMap keeps rule order stable.
    let mut rules: BTreeMap<String, SarifRule> = BTreeMap::new();
    for am in &sorted {
        rules
            .entry(am.message.code.clone())
            .or_insert_with(|| SarifRule {
                id: am.message.code.clone(),
                name: am.analyzer.clone(),
                short_description: SarifText {
                    text: am
                        .short_description
                        .clone()
                        .unwrap_or_else(|| am.message.message.clone()),
                },
                help_uri: am.help_uri.clone(),
            });
    }

    let results: Vec<SarifResult> = sorted
        .iter()
        .map(|am| {
            let r = &am.message.range;
            SarifResult {
                rule_id: am.message.code.clone(),
                level: am.message.severity.to_sarif_level().to_string(),
                message: SarifText {
                    text: am.message.message.clone(),
                },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifact {
                            uri: make_relative_uri(&r.file, code_root),
                        },
                        region: SarifRegion {
                            start_line: r.start_line.max(1),
                            // 0-based internally; SARIF wants 1-based.
                            start_column: r.start_col + 1,
                            end_line: r.end_line.max(1),
                            end_column: r.end_col + 1,
                        },
                    },
                }],
            }
        })
        .collect();

    SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: INFO_URI.to_string(),
                    rules: rules.into_values().collect(),
                },
            },
            results,
        }],
    }
}

/// Write messages in SARIF format to the given writer.
pub fn write_sarif(
    out: &mut dyn Write,
    messages: &[AnalyzerMessage],
    code_root: &Path,
) -> anyhow::Result<()> {
    let report = build_sarif(messages, code_root);
    let json = serde_json::to_string_pretty(&report)?;
    writeln!(out, "{}", json)?;
    Ok(())
}
