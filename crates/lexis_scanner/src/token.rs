//! The scanner's output record.

use crate::value::TokenValue;
use lexis_core::text::{SourcePosition, TextSpan};
use std::fmt;

bitflags::bitflags! {
    /// Classification details recorded when a token is built.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u8 {
        const NONE          = 0;
        /// A string or block reached end of input before its closer.
        const UNTERMINATED  = 1 << 0;
        /// The numeric lexeme contained a decimal point.
        const DECIMAL       = 1 << 1;
        /// The numeric lexeme contained an exponent marker.
        const SCIENTIFIC    = 1 << 2;
        /// The end-of-input token.
        const END_OF_INPUT  = 1 << 3;

        const NUMERIC_LITERAL_FLAGS = Self::DECIMAL.bits() | Self::SCIENTIFIC.bits();
    }
}

/// A classified lexeme.
///
/// `offset`, `line` and `column` are captured before the token's first
/// character was consumed. `length` counts every character consumed while
/// producing the token, so quotes and block delimiters are included.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<K> {
    kind: K,
    value: TokenValue,
    offset: usize,
    length: usize,
    line: usize,
    column: usize,
    flags: TokenFlags,
}

impl<K> Token<K> {
    pub(crate) fn new(
        kind: K,
        value: TokenValue,
        start: SourcePosition,
        length: usize,
        flags: TokenFlags,
    ) -> Self {
        Self {
            kind,
            value,
            offset: start.offset,
            length,
            line: start.line,
            column: start.column,
            flags,
        }
    }

    #[inline]
    pub fn kind(&self) -> &K {
        &self.kind
    }

    #[inline]
    pub fn value(&self) -> &TokenValue {
        &self.value
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    #[inline]
    pub fn flags(&self) -> TokenFlags {
        self.flags
    }

    pub fn span(&self) -> TextSpan {
        TextSpan::new(self.offset, self.length)
    }

    pub fn start_position(&self) -> SourcePosition {
        SourcePosition {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    pub fn is_end(&self) -> bool {
        self.flags.contains(TokenFlags::END_OF_INPUT)
    }

    pub fn is_unterminated(&self) -> bool {
        self.flags.contains(TokenFlags::UNTERMINATED)
    }

    pub fn into_parts(self) -> (K, TokenValue) {
        (self.kind, self.value)
    }
}

impl<K: fmt::Debug> fmt::Display for Token<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {:?} @{}+{} ({}:{})",
            self.kind, self.value, self.offset, self.length, self.line, self.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_accessors() {
        let start = SourcePosition {
            offset: 10,
            line: 3,
            column: 4,
        };
        let token = Token::new("Str", TokenValue::from("abc"), start, 4, TokenFlags::UNTERMINATED);
        assert_eq!(*token.kind(), "Str");
        assert_eq!(token.value().as_str(), Some("abc"));
        assert_eq!(token.span(), TextSpan::new(10, 4));
        assert_eq!(token.start_position(), start);
        assert!(token.is_unterminated());
        assert!(!token.is_end());
        assert_eq!(token.to_string(), "\"Str\" Str(\"abc\") @10+4 (3:4)");
    }

    #[test]
    fn test_numeric_flag_group() {
        let flags = TokenFlags::DECIMAL | TokenFlags::SCIENTIFIC;
        assert!(TokenFlags::NUMERIC_LITERAL_FLAGS.contains(flags));
        assert!(!TokenFlags::NUMERIC_LITERAL_FLAGS.contains(TokenFlags::END_OF_INPUT));
    }
}
