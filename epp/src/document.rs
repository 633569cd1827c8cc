/// One physical line of an E++ document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 0-based line number.
    pub number: usize,
    /// Raw line text without its terminator.
    pub text: &'a str,
    /// Byte offset of the line's first byte in the document.
    pub offset: usize,
}

impl SourceLine<'_> {
    /// Byte span of the line content in the document.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.text.len()
    }

    /// Length of the line in characters, used as the diagnostic column range.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split a document on `\n` or `\r\n`, keeping byte offsets.
///
/// A trailing terminator does not produce an extra empty line.
pub fn split_lines(source: &str) -> Vec<SourceLine<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;

    for (number, raw) in source.split_inclusive('\n').enumerate() {
        let text = raw
            .strip_suffix('\n')
            .map(|t| t.strip_suffix('\r').unwrap_or(t))
            .unwrap_or(raw);
        lines.push(SourceLine {
            number,
            text,
            offset,
        });
        offset += raw.len();
    }

    lines
}

/// A document as handed over by an editor: identity, language tag, version and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    pub uri: String,
    pub language_id: String,
    /// Monotonic version supplied by the editor. Newer passes carry larger versions.
    pub version: i32,
    pub text: String,
}

impl TextDocument {
    pub fn new(
        uri: impl Into<String>,
        language_id: impl Into<String>,
        version: i32,
        text: impl Into<String>,
    ) -> Self {
        TextDocument {
            uri: uri.into(),
            language_id: language_id.into(),
            version,
            text: text.into(),
        }
    }

    /// Whether this document belongs to E++ and should be validated.
    pub fn is_epp(&self) -> bool {
        self.language_id.eq_ignore_ascii_case(crate::LANGUAGE_ID)
    }
}
