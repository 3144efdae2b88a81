//! Source positions and spans.
//!
//! Positions count characters, not bytes: the scanner works on a decoded
//! character stream and never sees the underlying byte offsets.

use std::fmt;

/// A position in source text, measured in characters from the start.
pub type TextPos = usize;

/// A live position in a character stream.
///
/// `line` is 1-based. `column` is the number of characters read since the
/// last line feed (0-based).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SourcePosition {
    pub offset: TextPos,
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    /// The position before the first character.
    #[inline]
    pub const fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 0,
        }
    }

    /// Move past one character.
    #[inline]
    pub fn advance(&mut self, ch: char) {
        self.offset += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span in source text, defined by a start position and a length.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextSpan {
    /// The character offset where this span starts.
    pub start: TextPos,
    /// The length of this span in characters.
    pub length: TextPos,
}

impl TextSpan {
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// The end position of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_span_display() {
        let span = TextSpan::new(5, 10);
        assert_eq!(span.end(), 15);
        assert_eq!(span.to_string(), "[5, 15)");
        assert_eq!(format!("{:?}", span), "5..15");
    }

    #[test]
    fn test_position_advance() {
        let mut pos = SourcePosition::start();
        pos.advance('a');
        assert_eq!((pos.offset, pos.line, pos.column), (1, 1, 1));
        pos.advance('\n');
        assert_eq!((pos.offset, pos.line, pos.column), (2, 2, 0));
        pos.advance('\r');
        assert_eq!((pos.offset, pos.line, pos.column), (3, 2, 1));
        assert_eq!(pos.to_string(), "2:1");
    }
}
