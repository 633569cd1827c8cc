//! Line classification for both E++ dialects.
//!
//! Each line is reduced to one of four outcomes: it opens a block, closes
//! the innermost block, is ignored (blank or comment), or is a plain
//! statement. Classification looks at a single line only.
//!
//! Patterns overlap heavily between the natural-language dialect
//! (`if x then.`, `repeat 5 times.`, `end attempt.`) and the pseudocode
//! dialect (`IF x THEN`, `FOR i = 1 TO 10`, `ENDIF`), so every table below
//! is ordered and the first match wins:
//!
//! 1. trailing `.` is stripped
//! 2. blank lines and comments are ignored
//! 3. exclusion guards (`if it fails`, `on error`, branch continuations)
//! 4. opener table
//! 5. closer table
//! 6. everything else is neutral

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// The lexical family of a block opener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Conditional,
    WhileLoop,
    CountedRepeat,
    Repeat,
    DoLoop,
    ForEach,
    ForLoop,
    Function,
    TryAttempt,
    Switch,
    TextBlock,
    Record,
    ProgramBlock,
}

impl BlockKind {
    /// Short human label used in diagnostic messages.
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Conditional => "conditional",
            BlockKind::WhileLoop => "while loop",
            BlockKind::CountedRepeat => "repeat-times loop",
            BlockKind::Repeat => "repeat loop",
            BlockKind::DoLoop => "do loop",
            BlockKind::ForEach => "for-each loop",
            BlockKind::ForLoop => "for loop",
            BlockKind::Function => "function",
            BlockKind::TryAttempt => "attempt",
            BlockKind::Switch => "switch",
            BlockKind::TextBlock => "text block",
            BlockKind::Record => "record",
            BlockKind::ProgramBlock => "program",
        }
    }

    /// Closing statements accepted for this family, natural dialect first.
    pub fn expected_closers(self) -> &'static [&'static str] {
        match self {
            BlockKind::Conditional => &["end if", "ENDIF"],
            BlockKind::WhileLoop => &["end while", "ENDWHILE"],
            BlockKind::CountedRepeat => &["end repeat"],
            BlockKind::Repeat => &["until <condition>", "end repeat"],
            BlockKind::DoLoop => &["loop while <condition>", "loop until <condition>", "LOOP"],
            BlockKind::ForEach => &["end for", "ENDFOR"],
            BlockKind::ForLoop => &["NEXT", "end for"],
            BlockKind::Function => &["end define", "END FUNCTION", "END PROCEDURE"],
            BlockKind::TryAttempt => &["end attempt", "END TRY"],
            BlockKind::Switch => &["end switch", "END SELECT"],
            BlockKind::TextBlock => &["end text"],
            BlockKind::Record => &["end record"],
            BlockKind::ProgramBlock => &["end program", "END"],
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a single line contributes to block nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClassification {
    Opener(BlockKind),
    /// Ends the innermost open block. The kind is advisory; `None` when the
    /// closer names no family (a bare `end`).
    Closer(Option<BlockKind>),
    Neutral,
    Ignore,
}

/// Ordered opener rules: `(kind, pattern, unless)`.
///
/// A rule matches when `pattern` matches and `unless` (if any) does not.
/// Order matters: `repeat … times` must precede bare `repeat`, `for each`
/// must precede the numeric `for`, and the `then`-terminated conditional
/// must precede the bare one.
const OPENER_PATTERNS: &[(BlockKind, &str, Option<&str>)] = &[
    (BlockKind::Conditional, r"^if\b.*\bthen$", None),
    (BlockKind::Conditional, r"^if\b", Some(r"\bthen\b")),
    (BlockKind::WhileLoop, r"^while\b", None),
    (BlockKind::DoLoop, r"^do(\s+(while|until)\b.*)?$", None),
    (
        BlockKind::Function,
        r"^(define|function|procedure|algorithm|routine|sub|subroutine)\b",
        None,
    ),
    (BlockKind::CountedRepeat, r"^repeat\b.+\btimes$", None),
    (BlockKind::Repeat, r"^repeat\b", None),
    (BlockKind::ForEach, r"^for\s+(each|every)\b", None),
    (BlockKind::ForLoop, r"^for\s+\S+\s*(=|:=|<-|←|\bfrom\b|\bin\b)", None),
    (BlockKind::TryAttempt, r"^(try|attempt)\b", None),
    (BlockKind::Switch, r"^(switch|select|match)\b", None),
    (BlockKind::TextBlock, r"\btext\s+block$", Some(r"^end\b")),
    (BlockKind::Record, r"^record\b", None),
    (
        BlockKind::ProgramBlock,
        r"^((start|begin)\s+program\b|program\b|begin$)",
        None,
    ),
];

/// Ordered closer rules. `None` kinds close whatever is innermost.
const CLOSER_PATTERNS: &[(Option<BlockKind>, &str)] = &[
    (Some(BlockKind::Conditional), r"^end\s*if\b"),
    (Some(BlockKind::WhileLoop), r"^(end\s*while|wend)\b"),
    (
        Some(BlockKind::Function),
        r"^end\s*(define|function|procedure|algorithm|routine|subroutine|sub)\b",
    ),
    (Some(BlockKind::CountedRepeat), r"^end\s*repeat\b"),
    (Some(BlockKind::Repeat), r"^until\b"),
    (Some(BlockKind::DoLoop), r"^loop(\s+(while|until)\b.*)?$"),
    (Some(BlockKind::DoLoop), r"^end\s*(do|loop)\b"),
    (Some(BlockKind::ForLoop), r"^next\b"),
    (Some(BlockKind::ForLoop), r"^end\s*for(\s*each)?\b"),
    (Some(BlockKind::TryAttempt), r"^end\s*(try|attempt)\b"),
    (Some(BlockKind::Switch), r"^end\s*(switch|select|match|case)\b"),
    (Some(BlockKind::TextBlock), r"^end\s*text\b"),
    (Some(BlockKind::Record), r"^end\s*record\b"),
    (Some(BlockKind::ProgramBlock), r"^end\s*program\b"),
    (None, r"^end$"),
];

/// Leading words that continue an already open conditional or switch.
const BRANCH_CONTINUATION: &str = r"^(otherwise|else\s+if|elseif|elif|else|default|case)\b";

/// Compound phrases that contain structural words but are not structural.
const EXCLUDED_PHRASES: &str = r"\b(if it fails|on error)\b";

struct OpenerRule {
    kind: BlockKind,
    pattern: Regex,
    unless: Option<Regex>,
}

impl OpenerRule {
    fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line) && !self.unless.as_ref().is_some_and(|u| u.is_match(line))
    }
}

static OPENERS: Lazy<Vec<OpenerRule>> = Lazy::new(|| {
    OPENER_PATTERNS
        .iter()
        .map(|(kind, pattern, unless)| OpenerRule {
            kind: *kind,
            pattern: Regex::new(pattern).expect("opener pattern is valid"),
            unless: unless.map(|u| Regex::new(u).expect("opener guard is valid")),
        })
        .collect()
});

static CLOSERS: Lazy<Vec<(Option<BlockKind>, Regex)>> = Lazy::new(|| {
    CLOSER_PATTERNS
        .iter()
        .map(|(kind, pattern)| (*kind, Regex::new(pattern).expect("closer pattern is valid")))
        .collect()
});

static BRANCH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(BRANCH_CONTINUATION).expect("branch pattern is valid"));

static EXCLUDED_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EXCLUDED_PHRASES).expect("excluded phrase pattern is valid"));

static NOTE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^note\b").expect("note pattern is valid"));

/// Classify one source line.
pub fn classify(line: &str) -> LineClassification {
    let line = normalize(line);

    if is_ignored(&line) {
        return LineClassification::Ignore;
    }

    if is_excluded(&line) {
        return LineClassification::Neutral;
    }

    if let Some(rule) = OPENERS.iter().find(|rule| rule.matches(&line)) {
        return LineClassification::Opener(rule.kind);
    }

    if let Some((kind, _)) = CLOSERS.iter().find(|(_, pattern)| pattern.is_match(&line)) {
        return LineClassification::Closer(*kind);
    }

    LineClassification::Neutral
}

/// Trim, lower-case, and drop one optional trailing `.`.
fn normalize(line: &str) -> String {
    let lowered = line.trim().to_lowercase();
    match lowered.strip_suffix('.') {
        Some(stripped) => stripped.trim_end().to_string(),
        None => lowered,
    }
}

fn is_ignored(line: &str) -> bool {
    line.is_empty() || line.starts_with("//") || NOTE_REGEX.is_match(line)
}

fn is_excluded(line: &str) -> bool {
    EXCLUDED_REGEX.is_match(line) || BRANCH_REGEX.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use LineClassification::*;

    fn opener(kind: BlockKind) -> LineClassification {
        Opener(kind)
    }

    fn closer(kind: BlockKind) -> LineClassification {
        Closer(Some(kind))
    }

    #[test]
    fn all_patterns_compile() {
        assert_eq!(OPENERS.len(), OPENER_PATTERNS.len());
        assert_eq!(CLOSERS.len(), CLOSER_PATTERNS.len());
        Lazy::force(&BRANCH_REGEX);
        Lazy::force(&EXCLUDED_REGEX);
        Lazy::force(&NOTE_REGEX);
    }

    #[test]
    fn blank_and_comment_lines_are_ignored() {
        assert_eq!(classify(""), Ignore);
        assert_eq!(classify("   \t"), Ignore);
        assert_eq!(classify("."), Ignore);
        assert_eq!(classify("// if x then"), Ignore);
        assert_eq!(classify("note this repeats 5 times."), Ignore);
        assert_eq!(classify("NOTE: end if"), Ignore);
    }

    #[test]
    fn note_must_be_a_whole_word() {
        assert_eq!(classify("notebook = 3"), Neutral);
    }

    #[test]
    fn trailing_period_does_not_matter() {
        assert_eq!(classify("if x then."), classify("if x then"));
        assert_eq!(classify("end if."), classify("end if"));
        assert_eq!(classify("repeat 5 times ."), opener(BlockKind::CountedRepeat));
    }

    #[test]
    fn natural_dialect_openers() {
        assert_eq!(classify("if x is greater than 3 then."), opener(BlockKind::Conditional));
        assert_eq!(classify("while x is less than 10."), opener(BlockKind::WhileLoop));
        assert_eq!(classify("define greet with name."), opener(BlockKind::Function));
        assert_eq!(classify("repeat 5 times."), opener(BlockKind::CountedRepeat));
        assert_eq!(classify("repeat."), opener(BlockKind::Repeat));
        assert_eq!(classify("for each item in list."), opener(BlockKind::ForEach));
        assert_eq!(classify("attempt."), opener(BlockKind::TryAttempt));
        assert_eq!(classify("let poem be text block."), opener(BlockKind::TextBlock));
        assert_eq!(classify("record."), opener(BlockKind::Record));
        assert_eq!(classify("start program."), opener(BlockKind::ProgramBlock));
    }

    #[test]
    fn pseudocode_dialect_openers() {
        assert_eq!(classify("IF x > 3 THEN"), opener(BlockKind::Conditional));
        assert_eq!(classify("IF x > 3"), opener(BlockKind::Conditional));
        assert_eq!(classify("WHILE x < 10 DO"), opener(BlockKind::WhileLoop));
        assert_eq!(classify("FUNCTION add(a, b)"), opener(BlockKind::Function));
        assert_eq!(classify("PROCEDURE swap(a, b)"), opener(BlockKind::Function));
        assert_eq!(classify("ALGORITHM sort"), opener(BlockKind::Function));
        assert_eq!(classify("FOR i = 1 TO 10"), opener(BlockKind::ForLoop));
        assert_eq!(classify("FOR i ← 1 TO n"), opener(BlockKind::ForLoop));
        assert_eq!(classify("for i from 1 to 10"), opener(BlockKind::ForLoop));
        assert_eq!(classify("FOR EACH x IN items"), opener(BlockKind::ForEach));
        assert_eq!(classify("DO"), opener(BlockKind::DoLoop));
        assert_eq!(classify("DO WHILE x < 3"), opener(BlockKind::DoLoop));
        assert_eq!(classify("TRY"), opener(BlockKind::TryAttempt));
        assert_eq!(classify("SWITCH x"), opener(BlockKind::Switch));
        assert_eq!(classify("SELECT CASE x"), opener(BlockKind::Switch));
        assert_eq!(classify("BEGIN"), opener(BlockKind::ProgramBlock));
    }

    #[test]
    fn closers_of_both_dialects() {
        assert_eq!(classify("end if."), closer(BlockKind::Conditional));
        assert_eq!(classify("ENDIF"), closer(BlockKind::Conditional));
        assert_eq!(classify("end while."), closer(BlockKind::WhileLoop));
        assert_eq!(classify("ENDWHILE"), closer(BlockKind::WhileLoop));
        assert_eq!(classify("end define."), closer(BlockKind::Function));
        assert_eq!(classify("END FUNCTION"), closer(BlockKind::Function));
        assert_eq!(classify("ENDPROCEDURE"), closer(BlockKind::Function));
        assert_eq!(classify("end repeat."), closer(BlockKind::CountedRepeat));
        assert_eq!(classify("NEXT"), closer(BlockKind::ForLoop));
        assert_eq!(classify("NEXT i"), closer(BlockKind::ForLoop));
        assert_eq!(classify("end for."), closer(BlockKind::ForLoop));
        assert_eq!(classify("END TRY"), closer(BlockKind::TryAttempt));
        assert_eq!(classify("end attempt."), closer(BlockKind::TryAttempt));
        assert_eq!(classify("END SWITCH"), closer(BlockKind::Switch));
        assert_eq!(classify("end text."), closer(BlockKind::TextBlock));
        assert_eq!(classify("end record."), closer(BlockKind::Record));
        assert_eq!(classify("end program."), closer(BlockKind::ProgramBlock));
        assert_eq!(classify("END"), Closer(None));
    }

    #[test]
    fn closers_from_a_different_family() {
        assert_eq!(classify("until x is 10."), closer(BlockKind::Repeat));
        assert_eq!(classify("LOOP WHILE x < 3"), closer(BlockKind::DoLoop));
        assert_eq!(classify("loop until done"), closer(BlockKind::DoLoop));
        assert_eq!(classify("LOOP"), closer(BlockKind::DoLoop));
    }

    #[test]
    fn exclusions_run_before_openers() {
        assert_eq!(classify("if it fails."), Neutral);
        assert_eq!(classify("say \"oops\" if it fails"), Neutral);
        assert_eq!(classify("on error."), Neutral);
        assert_eq!(classify("if on error then"), Neutral);
    }

    #[test]
    fn excluded_phrases_match_whole_words_only() {
        assert_eq!(classify("if connection error then."), opener(BlockKind::Conditional));
        assert_eq!(classify("while no communication error."), opener(BlockKind::WhileLoop));
        assert_eq!(classify("if it failsafe then."), opener(BlockKind::Conditional));
    }

    #[test]
    fn branch_continuations_are_neutral() {
        assert_eq!(classify("otherwise."), Neutral);
        assert_eq!(classify("otherwise if x then."), Neutral);
        assert_eq!(classify("ELSE"), Neutral);
        assert_eq!(classify("ELSE IF x THEN"), Neutral);
        assert_eq!(classify("ELSEIF x THEN"), Neutral);
        assert_eq!(classify("ELIF x"), Neutral);
        assert_eq!(classify("CASE 1:"), Neutral);
        assert_eq!(classify("DEFAULT:"), Neutral);
    }

    #[test]
    fn inline_conditional_is_neutral() {
        assert_eq!(classify("if x then say 1."), Neutral);
    }

    #[test]
    fn table_order_resolves_overlaps() {
        // `repeat … times` before bare `repeat`.
        assert_eq!(classify("repeat 3 times"), opener(BlockKind::CountedRepeat));
        assert_eq!(classify("repeat until done"), opener(BlockKind::Repeat));
        // `for each` before numeric `for`.
        assert_eq!(classify("for each i in xs"), opener(BlockKind::ForEach));
        // `then`-terminated conditional before the bare form.
        assert_eq!(classify("if a then"), opener(BlockKind::Conditional));
        // `end repeat` is a closer even though it ends in a keyword.
        assert_eq!(classify("end repeat"), closer(BlockKind::CountedRepeat));
        // A closer ending in `text block` is not an opener.
        assert_eq!(classify("end text block"), closer(BlockKind::TextBlock));
        assert_eq!(classify("ENDFOREACH"), closer(BlockKind::ForLoop));
    }

    #[test]
    fn plain_statements_are_neutral() {
        assert_eq!(classify("say \"hello\"."), Neutral);
        assert_eq!(classify("PRINT x"), Neutral);
        assert_eq!(classify("set x to 5."), Neutral);
        assert_eq!(classify("say \"error\"."), Neutral);
        assert_eq!(classify("wait for 5 seconds."), Neutral);
        assert_eq!(classify("ending = 3"), Neutral);
        assert_eq!(classify("forecast = 1"), Neutral);
        assert_eq!(classify("dough = 2"), Neutral);
    }

    #[test]
    fn expected_closers_are_listed_for_every_kind() {
        for (kind, _, _) in OPENER_PATTERNS {
            assert!(!kind.expected_closers().is_empty(), "{kind}");
        }
    }
}
