use epp::syntax::{LineClassification, classify};
use epp::{Severity, validate};
use proptest::prelude::*;

const OPENERS: &[&str] = &[
    "if x then.",
    "IF x > 1 THEN",
    "while x.",
    "define f.",
    "FUNCTION f(a)",
    "repeat 3 times.",
    "repeat.",
    "DO",
    "for each a in b.",
    "FOR i = 1 TO 9",
    "attempt.",
    "SWITCH x",
    "let t be text block.",
    "start program.",
];

const CLOSERS: &[&str] = &[
    "end if.",
    "ENDIF",
    "end while.",
    "end define.",
    "END FUNCTION",
    "end repeat.",
    "until x.",
    "LOOP WHILE x",
    "end for.",
    "NEXT",
    "end attempt.",
    "END SWITCH",
    "end text.",
    "end program.",
];

const OTHERS: &[&str] = &[
    "",
    "say 1.",
    "// end if",
    "note repeat 3 times",
    "otherwise.",
    "ELSE IF y THEN",
    "if it fails.",
    "on error.",
    "CASE 2:",
    "PRINT x",
    "if x then say 1.",
];

fn any_line() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        prop::sample::select(OPENERS),
        prop::sample::select(CLOSERS),
        prop::sample::select(OTHERS),
    ]
}

/// Reference model: plain counter over the classified lines.
fn model(lines: &[&str]) -> (Vec<usize>, Vec<usize>) {
    let mut errors = Vec::new();
    let mut stack = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        match classify(line) {
            LineClassification::Opener(_) => stack.push(i),
            LineClassification::Closer(_) => {
                if stack.pop().is_none() {
                    errors.push(i);
                }
            }
            _ => {}
        }
    }
    stack.reverse();
    (errors, stack)
}

#[test]
fn vocabulary_is_classified_as_intended() {
    for line in OPENERS {
        assert!(matches!(classify(line), LineClassification::Opener(_)), "{line}");
    }
    for line in CLOSERS {
        assert!(matches!(classify(line), LineClassification::Closer(_)), "{line}");
    }
    for line in OTHERS {
        assert!(
            matches!(
                classify(line),
                LineClassification::Neutral | LineClassification::Ignore
            ),
            "{line}"
        );
    }
}

proptest! {
    #[test]
    fn no_structure_means_no_diagnostics(lines in prop::collection::vec(prop::sample::select(OTHERS), 0..40)) {
        prop_assert!(validate(&lines.join("\n")).is_empty());
    }

    #[test]
    fn errors_and_warnings_match_the_stack_model(lines in prop::collection::vec(any_line(), 0..60)) {
        let diags = validate(&lines.join("\n"));
        let (errors, open) = model(&lines);

        let got_errors: Vec<usize> = diags.iter().filter(|d| d.severity == Severity::Error).map(|d| d.line).collect();
        let got_warnings: Vec<usize> = diags.iter().filter(|d| d.severity == Severity::Warning).map(|d| d.line).collect();

        prop_assert_eq!(got_errors, errors);
        prop_assert_eq!(got_warnings, open);
    }

    #[test]
    fn validation_is_idempotent(lines in prop::collection::vec(any_line(), 0..60)) {
        let source = lines.join("\n");
        prop_assert_eq!(validate(&source), validate(&source));
    }

    #[test]
    fn swapping_balanced_blocks_stays_clean(
        a in 0..OPENERS.len(),
        b in 0..OPENERS.len(),
        body in prop::collection::vec(prop::sample::select(OTHERS), 0..5),
    ) {
        let block = |i: usize| {
            let mut lines = vec![OPENERS[i]];
            lines.extend(body.iter().copied());
            lines.push(CLOSERS[i]);
            lines
        };
        let mut forward = block(a);
        forward.extend(block(b));
        let mut backward = block(b);
        backward.extend(block(a));

        prop_assert!(validate(&forward.join("\n")).is_empty());
        prop_assert!(validate(&backward.join("\n")).is_empty());
    }
}
