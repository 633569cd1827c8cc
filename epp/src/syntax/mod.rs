pub mod classify;
mod structural;

pub use classify::{BlockKind, LineClassification, classify};
pub use structural::{OpenBlockFrame, track};

use tracing::debug;

use crate::diagnostic::Diagnostic;
use crate::document::{TextDocument, split_lines};
use crate::publish::DiagnosticSink;

/// Structural validator entry point. One value is one pass.
pub struct Validator<'a> {
    source: &'a str,
}

impl<'a> Validator<'a> {
    pub fn new(source: &'a str) -> Self {
        Validator { source }
    }

    /// Classify every line and track block nesting over the whole document.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let lines = split_lines(self.source);
        let line_count = lines.len();
        let diagnostics = track(lines.into_iter().map(|line| {
            let classification = classify(line.text);
            (line, classification)
        }));
        debug!(
            lines = line_count,
            errors = diagnostics.iter().filter(|d| d.is_error()).count(),
            warnings = diagnostics.iter().filter(|d| d.is_warning()).count(),
            "structural pass complete"
        );
        diagnostics
    }
}

/// Validate an editor document and publish the result to `sink`.
///
/// Documents in other languages are left alone and `false` is returned.
pub fn validate_document(document: &TextDocument, sink: &impl DiagnosticSink) -> bool {
    if !document.is_epp() {
        debug!(uri = %document.uri, language = %document.language_id, "skipping non-E++ document");
        return false;
    }
    let diagnostics = Validator::new(&document.text).validate();
    sink.replace(&document.uri, document.version, diagnostics);
    true
}
