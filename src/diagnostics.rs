//! Core diagnostic types shared by analyzers, the engine, and the sinks.

use serde::{Deserialize, Serialize};

/// Severity levels for diagnostics.
///
/// The ordering (Info < Hint < Warning < Error) exists only so the severity
/// remapping priority is well defined; no other comparison semantics are
/// implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Hint,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Hint => "hint",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// SARIF `level` string for this severity.
    pub fn to_sarif_level(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info | Severity::Hint => "note",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "hint" => Ok(Severity::Hint),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Source range of a diagnostic.
///
/// Lines are 1-based, columns are 0-based. Sinks that need 1-based columns
/// (SARIF) convert at their own boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub file: String,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Range {
    pub fn new(file: impl Into<String>, start_line: u32, start_col: u32) -> Self {
        Self {
            file: file.into(),
            start_line,
            start_col,
            end_line: start_line,
            end_col: start_col,
        }
    }

    pub fn with_end(mut self, end_line: u32, end_col: u32) -> Self {
        self.end_line = end_line;
        self.end_col = end_col;
        self
    }
}

/// A textual edit suggested as a fix for a diagnostic.
///
/// Fixes on a message are an ordered list with no overlap-resolution
/// guarantee; consumers apply them independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    pub range: Range,
    pub from_text: String,
    pub to_text: String,
}

/// One diagnostic produced by an analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Category of the diagnostic (e.g. "lint", "style").
    pub kind: String,
    /// Stable identifier used for severity remapping and suppression.
    pub code: String,
    /// Human-readable text.
    pub message: String,
    pub severity: Severity,
    pub range: Range,
    #[serde(default)]
    pub fixes: Vec<Fix>,
}

impl Message {
    /// Create a unique key for this message (for deduplication/sorting).
    pub fn key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.range.file, self.range.start_line, self.code, self.message
        )
    }
}

/// A [`Message`] tagged with its originating analyzer, plus optional
/// metadata consumed only by the SARIF sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerMessage {
    pub analyzer: String,
    pub message: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_uri: Option<String>,
}

impl AnalyzerMessage {
    pub fn new(analyzer: impl Into<String>, message: Message) -> Self {
        Self {
            analyzer: analyzer.into(),
            message,
            short_description: None,
            help_uri: None,
        }
    }
}
