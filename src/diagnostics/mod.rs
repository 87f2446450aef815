//! Diagnostics collected while translating a document
//!
//! The translator reports through the `Reporter` trait and never formats or
//! writes anything itself. `Diagnostics` is the collector the crate ships:
//! it keeps every record and mirrors it to the `log` facade.

use serde::{Deserialize, Serialize};

/// Receiver of translation diagnostics
pub trait Reporter {
    fn report_error(&mut self, line: usize, message: &str);
    fn report_warning(&mut self, line: usize, message: &str);
}

/// Severity level for a diagnostic
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// One reported problem, anchored at an input line
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Line in the MusicXML input (1-based)
    pub line: usize,
    pub severity: DiagnosticSeverity,
    pub message: String,
}

/// Collection of diagnostics for one translation
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Diagnostics {
    pub records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    pub fn has_errors(&self) -> bool {
        self.records
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
    }

    /// Whether any record mentions `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.records.iter().any(|d| d.message.contains(needle))
    }
}

impl Reporter for Diagnostics {
    fn report_error(&mut self, line: usize, message: &str) {
        log::error!("line {}: {}", line, message);
        self.records.push(Diagnostic {
            line,
            severity: DiagnosticSeverity::Error,
            message: message.to_string(),
        });
    }

    fn report_warning(&mut self, line: usize, message: &str) {
        log::warn!("line {}: {}", line, message);
        self.records.push(Diagnostic {
            line,
            severity: DiagnosticSeverity::Warning,
            message: message.to_string(),
        });
    }
}
