//! Non-fatal findings collected while assembling a document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Warning,
    Info,
}

/// A value that was clamped to its element maximum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncationWarning {
    pub record_id: Option<String>,
    /// Element reference, e.g. `NM103`.
    pub element: String,
    pub max_len: usize,
    pub original_len: usize,
}

/// Something worth reporting that did not stop assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyIssue {
    pub code: String,
    pub message: String,
    pub severity: IssueSeverity,
    pub record_id: Option<String>,
}

/// A record skipped because it carries no claim grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("record '{record_id}' (input index {index}) has no claim grouping key")]
pub struct MissingIdentityError {
    pub record_id: String,
    pub index: usize,
}

/// Everything non-fatal produced by one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub truncations: Vec<TruncationWarning>,
    pub issues: Vec<AssemblyIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn truncated(
        &mut self,
        record_id: Option<&str>,
        element: &str,
        max_len: usize,
        original_len: usize,
    ) {
        self.truncations.push(TruncationWarning {
            record_id: record_id.map(str::to_string),
            element: element.to_string(),
            max_len,
            original_len,
        });
    }

    pub fn warn(&mut self, code: &str, message: impl Into<String>, record_id: Option<&str>) {
        self.push(IssueSeverity::Warning, code, message.into(), record_id);
    }

    pub fn info(&mut self, code: &str, message: impl Into<String>, record_id: Option<&str>) {
        self.push(IssueSeverity::Info, code, message.into(), record_id);
    }

    fn push(&mut self, severity: IssueSeverity, code: &str, message: String, record_id: Option<&str>) {
        self.issues.push(AssemblyIssue {
            code: code.to_string(),
            message,
            severity,
            record_id: record_id.map(str::to_string),
        });
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Warning)
            .count()
            + self.truncations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.truncations.is_empty() && self.issues.is_empty()
    }
}
