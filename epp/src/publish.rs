use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::diagnostic::Diagnostic;

/// Destination for the diagnostics of one validation pass.
///
/// `replace` swaps the whole set for a document; implementations never merge
/// with what was published before.
pub trait DiagnosticSink {
    fn replace(&self, uri: &str, version: i32, diagnostics: Vec<Diagnostic>);
}

#[derive(Debug, Clone)]
struct Published {
    version: i32,
    diagnostics: Vec<Diagnostic>,
}

/// Per-document diagnostic sets, safe to share between threads.
///
/// Replacement is serialized per collection. A set whose version is older
/// than the stored one is dropped, so a slow pass over stale text cannot
/// overwrite the result of a newer pass.
#[derive(Debug, Default)]
pub struct DiagnosticCollection {
    entries: RwLock<HashMap<String, Published>>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current diagnostics for `uri`, empty if nothing was published.
    pub fn get(&self, uri: &str) -> Vec<Diagnostic> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uri)
            .map(|p| p.diagnostics.clone())
            .unwrap_or_default()
    }

    /// Version of the set currently stored for `uri`.
    pub fn version(&self, uri: &str) -> Option<i32> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uri)
            .map(|p| p.version)
    }

    /// Forget a document, e.g. when it is closed.
    pub fn clear(&self, uri: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(uri);
    }

    /// Number of documents with a published set.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for DiagnosticCollection {
    fn replace(&self, uri: &str, version: i32, diagnostics: Vec<Diagnostic>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = entries.get(uri) {
            if current.version > version {
                debug!(uri, version, current = current.version, "dropping stale diagnostics");
                return;
            }
        }
        debug!(uri, version, count = diagnostics.len(), "publishing diagnostics");
        entries.insert(
            uri.to_string(),
            Published {
                version,
                diagnostics,
            },
        );
    }
}
