// Text edits returned to the host (formatting)

use serde::{Deserialize, Serialize};

/// Zero-based line/character position
///
/// `character` counts UTF-16 code units, the unit editor hosts use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    /// Range from the start of the first line to the end of the last line
    pub fn full(text: &str) -> Self {
        let mut last_line = 0;
        let mut last_len = 0;
        for (idx, line) in text.split('\n').enumerate() {
            last_line = idx;
            last_len = line.trim_end_matches('\r').encode_utf16().count();
        }

        Self {
            start: Position::new(0, 0),
            end: Position::new(last_line, last_len),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: TextRange,
    pub new_text: String,
}

impl TextEdit {
    /// Replace the whole of `original` with `new_text`
    pub fn replace_all(original: &str, new_text: impl Into<String>) -> Self {
        Self {
            range: TextRange::full(original),
            new_text: new_text.into(),
        }
    }
}
