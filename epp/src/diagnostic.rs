use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic as Report, Label, Severity as ReportSeverity};
use serde::Serialize;

use crate::document::SourceLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

impl From<Severity> for ReportSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => ReportSeverity::Error,
            Severity::Warning => ReportSeverity::Warning,
        }
    }
}

/// A structural problem attached to one source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 0-based line number.
    pub line: usize,
    /// Character columns covered on that line; always the whole line.
    pub columns: Range<usize>,
    /// Byte span in the document, for rendering source snippets.
    pub span: Range<usize>,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, line: &SourceLine<'_>) -> Self {
        Self::on_line(Severity::Error, message, line)
    }

    pub fn warning(message: impl Into<String>, line: &SourceLine<'_>) -> Self {
        Self::on_line(Severity::Warning, message, line)
    }

    fn on_line(severity: Severity, message: impl Into<String>, line: &SourceLine<'_>) -> Self {
        Diagnostic {
            line: line.number,
            columns: 0..line.char_len(),
            span: line.span(),
            message: message.into(),
            severity,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Convert to a codespan-reporting diagnostic for terminal display.
    pub fn to_report<FileId: Copy>(&self, file_id: FileId) -> Report<FileId> {
        Report::new(self.severity.into())
            .with_message(&self.message)
            .with_labels(vec![Label::primary(file_id, self.span.clone())])
            .with_notes(self.notes.clone())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: line {}: {}", self.severity, self.line + 1, self.message)
    }
}
