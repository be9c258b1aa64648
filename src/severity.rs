//! User-declared severity remapping of diagnostic codes.
//!
//! A mapping assigns diagnostic codes to one of the four severities. The
//! four code sets must be pairwise disjoint; overlap is a configuration
//! error detected before any analyzer runs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Message, Severity};

/// Four disjoint sets of diagnostic codes, one per target severity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeverityMappings {
    #[serde(default)]
    pub info: BTreeSet<String>,
    #[serde(default)]
    pub hint: BTreeSet<String>,
    #[serde(default)]
    pub warning: BTreeSet<String>,
    #[serde(default)]
    pub error: BTreeSet<String>,
}

impl SeverityMappings {
    /// True iff the four code sets are pairwise disjoint.
    ///
    /// Checked via: sum of set sizes equals size of their union.
    pub fn validate(&self) -> bool {
        let total = self.info.len() + self.hint.len() + self.warning.len() + self.error.len();
        let mut union = BTreeSet::new();
        union.extend(self.info.iter());
        union.extend(self.hint.iter());
        union.extend(self.warning.iter());
        union.extend(self.error.iter());
        union.len() == total
    }

    /// True if no code is remapped at all.
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
            && self.hint.is_empty()
            && self.warning.is_empty()
            && self.error.is_empty()
    }

    /// Look up the target severity for a code, if any.
    ///
    /// Sets are consulted in fixed priority order Info, Hint, Warning,
    /// Error. `validate` guarantees disjointness, so the order only matters
    /// as a tie-break if a caller skipped validation.
    pub fn severity_for(&self, code: &str) -> Option<Severity> {
        if self.info.contains(code) {
            Some(Severity::Info)
        } else if self.hint.contains(code) {
            Some(Severity::Hint)
        } else if self.warning.contains(code) {
            Some(Severity::Warning)
        } else if self.error.contains(code) {
            Some(Severity::Error)
        } else {
            None
        }
    }

    /// Apply the mapping to one message.
    ///
    /// Replaces the severity when the code is mapped; otherwise returns the
    /// message unchanged.
    pub fn apply(&self, message: &Message) -> Message {
        let mut out = message.clone();
        if let Some(severity) = self.severity_for(&message.code) {
            out.severity = severity;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Range;

    fn set(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn message(code: &str, severity: Severity) -> Message {
        Message {
            kind: "lint".to_string(),
            code: code.to_string(),
            message: "test diagnostic".to_string(),
            severity,
            range: Range::new("a.src", 1, 0),
            fixes: Vec::new(),
        }
    }

    #[test]
    fn test_validate_disjoint() {
        let mappings = SeverityMappings {
            info: set(&["FS001"]),
            hint: set(&["FS002", "FS003"]),
            warning: set(&["FS004"]),
            error: set(&["FS005"]),
        };
        assert!(mappings.validate());
    }

    #[test]
    fn test_validate_empty() {
        assert!(SeverityMappings::default().validate());
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let mappings = SeverityMappings {
            info: set(&["FS001"]),
            error: set(&["FS001", "FS002"]),
            ..Default::default()
        };
        assert!(!mappings.validate());
    }

    #[test]
    fn test_apply_remaps_mapped_code() {
        let mappings = SeverityMappings {
            error: set(&["FS001"]),
            ..Default::default()
        };
        let original = message("FS001", Severity::Hint);
        let remapped = mappings.apply(&original);
        assert_eq!(remapped.severity, Severity::Error);
        // Everything else untouched
        assert_eq!(remapped.code, original.code);
        assert_eq!(remapped.message, original.message);
        assert_eq!(remapped.range, original.range);
    }

    #[test]
    fn test_apply_identity_on_unmapped_code() {
        let mappings = SeverityMappings {
            warning: set(&["FS009"]),
            ..Default::default()
        };
        let original = message("FS001", Severity::Hint);
        let remapped = mappings.apply(&original);
        assert_eq!(remapped.severity, Severity::Hint);
    }

    #[test]
    fn test_priority_order_on_unvalidated_overlap() {
        // Defensive tie-break only; validate() would reject this mapping.
        let mappings = SeverityMappings {
            info: set(&["FS001"]),
            error: set(&["FS001"]),
            ..Default::default()
        };
        assert_eq!(mappings.severity_for("FS001"), Some(Severity::Info));
    }
}
