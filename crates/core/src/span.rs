//! Source positions shared by tokens, AST nodes, and errors.

use serde::Serialize;

/// A point in the source text. `offset` is a byte index into the UTF-8
/// source; `line` and `column` are 1-based, with columns counted in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };
}

/// A byte range in the source plus the line/column of its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: Position, end: usize) -> Self {
        Span {
            start: start.offset,
            end,
            line: start.line,
            column: start.column,
        }
    }

    pub fn start_position(&self) -> Position {
        Position {
            offset: self.start,
            line: self.line,
            column: self.column,
        }
    }

    /// The slice of `src` this span covers.
    pub fn text<'s>(&self, src: &'s str) -> &'s str {
        &src[self.start..self.end]
    }
}
