pub mod catalog;
pub mod diagnostic;
pub mod document;
pub mod publish;
pub mod syntax;

pub use diagnostic::{Diagnostic, Severity};
pub use document::{SourceLine, TextDocument};
pub use publish::{DiagnosticCollection, DiagnosticSink};
pub use syntax::Validator;

/// Language identifier that editors attach to E++ documents.
pub const LANGUAGE_ID: &str = "epp";

/// File extension of E++ programs, without the leading dot.
pub const FILE_EXTENSION: &str = "epp";

/// Run one structural pass over `source` and return its diagnostics.
pub fn validate(source: &str) -> Vec<Diagnostic> {
    Validator::new(source).validate()
}
