//! Keyword documentation and completion catalogs.
//!
//! Both tables are static and keyed by lowercase keyword. Hover text is
//! Markdown; [`render_plain`] turns it into terminal text.

use pulldown_cmark::{Event, Parser as CmarkParser, Tag};
use serde::Serialize;

const HOVER_DOCS: &[(&str, &str)] = &[
    (
        "say",
        "**say** `[expression]`\n\nPrints the expression to the console. (Equivalent to `print`)\n\n*Example:* `say \"Hello.\"`",
    ),
    ("print", "**PRINT** `[expression]`\n\nPseudo code output instruction."),
    ("declare", "**DECLARE** `[variable] = [value]`\n\nCreates a new variable."),
    ("set", "**set** `[variable]` **to** `[value]`\n\nAssigns a new value to a variable."),
    ("let", "**let** `[variable]` **be** `[value]`\n\nDeclares a variable."),
    (
        "function",
        "**FUNCTION** `name(args)`\n... \n**END FUNCTION**\n\nDefines a pseudo code function.",
    ),
    (
        "define",
        "**define** `name` **with** `args`.\n... \n**end define**.\n\nDefines a new E++ functional block.",
    ),
    (
        "repeat",
        "**repeat** `[N]` **times**.\n... \n**end repeat**.\n\nLoops exactly N times.",
    ),
    (
        "while",
        "**while** `[condition]`.\n... \n**end while**.\n\nLoops as long as condition is true.",
    ),
    (
        "ask",
        "**ask** `\"[prompt]\"` **and store it in** `[variable]`.\n\nGets user input.",
    ),
    (
        "create",
        "**create window titled** `\"[Title]\"`\n\nInitializes a graphical webview window.",
    ),
    ("open", "**open url** `\"[URL]\"` **in window** `\"[Title]\"`\n\nLoads a webpage in a window."),
    (
        "show",
        "**show windows**.\n\nStarts the graphical interface loop. Must be the last statement.",
    ),
    ("fetch", "**fetch page** `\"[URL]\"` **into** `[variable]`.\n\nDownloads raw HTML of a web page."),
    (
        "attempt",
        "**attempt**.\n...\n**if it fails**.\n...\n**end attempt**.\n\nTry-catch block for error handling.",
    ),
    (
        "record",
        "**record**.\n...\n**end record**.\n\nCreates an object/record to store properties.",
    ),
];

/// `(label, snippet body, detail)`; bodies use `${n:placeholder}` tab stops.
const SNIPPETS: &[(&str, &str, &str)] = &[
    ("if block", "if ${1:condition} then.\n\t${2:say \"true\"}\nend if.", "E++ If Block"),
    (
        "IF THEN ENDIF",
        "IF ${1:condition} THEN\n\t${2:PRINT \"true\"}\nENDIF",
        "Pseudo Code IF Block",
    ),
    (
        "define function",
        "define ${1:name} with ${2:args}.\n\t${3:give back null}\nend define.",
        "E++ Function",
    ),
    ("FUNCTION", "FUNCTION ${1:name}(${2:args})\n\t${3:RETURN null}\nEND FUNCTION", "Pseudo Code Function"),
    ("repeat times", "repeat ${1:10} times.\n\t${2:say \"loop\"}\nend repeat.", "E++ Repeat Loop"),
    ("FOR loop", "FOR ${1:i} = ${2:1} TO ${3:10}\n\t${4:PRINT i}\nNEXT", "Pseudo Code FOR Loop"),
    (
        "create window",
        "create window titled \"${1:My App}\" sized ${2:800} by ${3:600}.\nshow windows.",
        "E++ UI Window",
    ),
];

const KEYWORDS: &[&str] = &[
    "say",
    "ask",
    "let",
    "set",
    "declare",
    "print",
    "output",
    "input",
    "increment",
    "decrement",
    "swap",
    "start program.",
    "end program.",
];

/// Markdown documentation for a keyword, matched case-insensitively.
pub fn hover(word: &str) -> Option<&'static str> {
    let word = word.to_lowercase();
    HOVER_DOCS
        .iter()
        .find(|(keyword, _)| *keyword == word)
        .map(|(_, doc)| *doc)
}

/// All keywords that have hover documentation, in table order.
pub fn documented_keywords() -> impl Iterator<Item = &'static str> {
    HOVER_DOCS.iter().map(|(keyword, _)| *keyword)
}

/// The word under `column` (a character index) on `line`, if any.
///
/// Words are runs of alphanumerics and `_`. A cursor just past the last
/// character of a word still selects it.
pub fn word_at(line: &str, column: usize) -> Option<&str> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    let mut idx = column.min(chars.len());
    if idx == chars.len() || !is_word(chars[idx].1) {
        if idx > 0 && is_word(chars[idx - 1].1) {
            idx -= 1;
        } else {
            return None;
        }
    }

    let mut start = idx;
    while start > 0 && is_word(chars[start - 1].1) {
        start -= 1;
    }
    let mut end = idx + 1;
    while end < chars.len() && is_word(chars[end].1) {
        end += 1;
    }

    let byte_start = chars[start].0;
    let byte_end = chars.get(end).map(|(b, _)| *b).unwrap_or(line.len());
    Some(&line[byte_start..byte_end])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Snippet,
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
}

impl CompletionItem {
    fn new(label: impl Into<String>, kind: CompletionKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            insert_text: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }
}

/// Snippets first, then plain keywords.
pub fn completions() -> Vec<CompletionItem> {
    let snippets = SNIPPETS.iter().map(|(label, body, detail)| {
        CompletionItem::new(*label, CompletionKind::Snippet)
            .with_insert_text(*body)
            .with_detail(*detail)
    });
    let keywords = KEYWORDS
        .iter()
        .map(|keyword| CompletionItem::new(*keyword, CompletionKind::Keyword));
    snippets.chain(keywords).collect()
}

/// Completions whose label starts with `prefix`, ignoring case.
pub fn completions_with_prefix(prefix: &str) -> Vec<CompletionItem> {
    let prefix = prefix.to_lowercase();
    completions()
        .into_iter()
        .filter(|item| item.label.to_lowercase().starts_with(&prefix))
        .collect()
}

/// Render hover Markdown as plain text: emphasis markers dropped, inline
/// code kept verbatim, paragraphs separated by a blank line.
pub fn render_plain(markdown: &str) -> String {
    let mut out = String::new();

    for event in CmarkParser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Start(Tag::Paragraph) if !out.is_empty() => out.push_str("\n\n"),
            _ => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_is_case_insensitive() {
        assert!(hover("SAY").is_some_and(|doc| doc.starts_with("**say**")));
        assert_eq!(hover("say"), hover("Say"));
        assert!(hover("nonsense").is_none());
    }

    #[test]
    fn every_documented_keyword_resolves() {
        for keyword in documented_keywords() {
            assert!(hover(keyword).is_some(), "{keyword}");
        }
        assert_eq!(documented_keywords().count(), 16);
    }

    #[test]
    fn word_at_finds_the_word_under_the_cursor() {
        let line = "  repeat 5 times.";
        assert_eq!(word_at(line, 2), Some("repeat"));
        assert_eq!(word_at(line, 5), Some("repeat"));
        assert_eq!(word_at(line, 8), Some("repeat"));
        assert_eq!(word_at(line, 9), Some("5"));
        assert_eq!(word_at(line, 0), None);
        assert_eq!(word_at(line, 16), Some("times"));
        assert_eq!(word_at("", 0), None);
    }

    #[test]
    fn word_at_handles_multibyte_text() {
        assert_eq!(word_at("say \"héllo\"", 6), Some("héllo"));
    }

    #[test]
    fn completions_keep_snippets_before_keywords() {
        let items = completions();
        assert_eq!(items.len(), SNIPPETS.len() + KEYWORDS.len());
        assert_eq!(items[0].label, "if block");
        assert_eq!(items[0].kind, CompletionKind::Snippet);
        assert_eq!(items[0].detail.as_deref(), Some("E++ If Block"));
        let last = items.last().unwrap();
        assert_eq!(last.label, "end program.");
        assert_eq!(last.kind, CompletionKind::Keyword);
        assert!(last.insert_text.is_none());
    }

    #[test]
    fn snippets_are_structurally_balanced() {
        for (label, body, _) in SNIPPETS {
            let diagnostics = crate::validate(body);
            assert!(diagnostics.is_empty(), "{label}: {diagnostics:?}");
        }
    }

    #[test]
    fn prefix_filter() {
        let labels: Vec<String> = completions_with_prefix("de")
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(labels, vec!["define function", "declare", "decrement"]);
    }

    #[test]
    fn render_plain_strips_markup() {
        let rendered = render_plain(hover("set").unwrap());
        assert_eq!(
            rendered,
            "set [variable] to [value]\n\nAssigns a new value to a variable."
        );
    }
}
