use tracing::trace;

use crate::diagnostic::Diagnostic;
use crate::document::SourceLine;
use crate::syntax::classify::{BlockKind, LineClassification};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Track block nesting over classified lines and report structural problems.
///
/// Closers pop the innermost frame whatever its kind. A closer with nothing
/// open is an error at the closer's line; frames still open at the end are
/// warnings at their opener's line, innermost first.
pub fn track<'a, I>(lines: I) -> Vec<Diagnostic>
where
    I: IntoIterator<Item = (SourceLine<'a>, LineClassification)>,
{
    let mut state = TrackState::new();
    for (line, classification) in lines {
        state.process_line(line, classification);
    }
    state.finalize()
}

// ---------------------------------------------------------------------------
// Track state
// ---------------------------------------------------------------------------

/// A block that has been opened and not yet closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenBlockFrame<'a> {
    pub kind: BlockKind,
    pub line: SourceLine<'a>,
}

impl OpenBlockFrame<'_> {
    pub fn source_text(&self) -> &str {
        self.line.text.trim()
    }
}

struct TrackState<'a> {
    /// Innermost open block is last.
    block_stack: Vec<OpenBlockFrame<'a>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> TrackState<'a> {
    fn new() -> Self {
        TrackState {
            block_stack: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn process_line(&mut self, line: SourceLine<'a>, classification: LineClassification) {
        match classification {
            LineClassification::Ignore | LineClassification::Neutral => {}
            LineClassification::Opener(kind) => {
                trace!(line = line.number, %kind, depth = self.block_stack.len() + 1, "open block");
                self.block_stack.push(OpenBlockFrame { kind, line });
            }
            LineClassification::Closer(_) => self.close_block(&line),
        }
    }

    fn close_block(&mut self, line: &SourceLine<'a>) {
        match self.block_stack.pop() {
            Some(frame) => {
                trace!(
                    line = line.number,
                    opened_at = frame.line.number,
                    kind = %frame.kind,
                    "close block"
                );
            }
            None => {
                trace!(line = line.number, "closer with empty stack");
                self.diagnostics.push(unexpected_closer(line));
            }
        }
    }

    fn finalize(mut self) -> Vec<Diagnostic> {
        while let Some(frame) = self.block_stack.pop() {
            self.diagnostics.push(unclosed_block(&frame));
        }
        self.diagnostics
    }
}

fn unexpected_closer(line: &SourceLine<'_>) -> Diagnostic {
    Diagnostic::error(
        format!(
            "unexpected block closer `{}`: no matching opener",
            line.text.trim()
        ),
        line,
    )
}

fn unclosed_block(frame: &OpenBlockFrame<'_>) -> Diagnostic {
    let closers = frame
        .kind
        .expected_closers()
        .iter()
        .map(|c| format!("`{}`", c))
        .collect::<Vec<_>>()
        .join(" or ");
    Diagnostic::warning(
        format!(
            "unclosed {} block: missing closing statement",
            frame.kind.label()
        ),
        &frame.line,
    )
    .with_note(format!("`{}` is never closed", frame.source_text()))
    .with_note(format!("expected {}", closers))
}
