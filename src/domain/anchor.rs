use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Zero-based line / character position. `character` counts UTF-16 code units,
/// which is how editor hosts address columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Half-open range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range on a single line.
    pub fn on_line(line: u32, start_character: u32, end_character: u32) -> Self {
        Self {
            start: Position::new(line, start_character),
            end: Position::new(line, end_character),
        }
    }
}

/// A method declared inside an interface block; the range covers exactly the
/// method name on its line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodAnchor {
    pub name: String,
    pub range: Range,
}

/// A file + range, as returned by implementation queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub path: PathBuf,
    pub range: Range,
}

impl Location {
    pub fn new(path: impl Into<PathBuf>, range: Range) -> Self {
        Self {
            path: path.into(),
            range,
        }
    }
}

/// Convert a byte offset within `line` into a UTF-16 column.
pub fn utf16_column(line: &str, byte_offset: usize) -> u32 {
    let end = byte_offset.min(line.len());
    line.get(..end)
        .map(|prefix| prefix.encode_utf16().count() as u32)
        .unwrap_or(0)
}
