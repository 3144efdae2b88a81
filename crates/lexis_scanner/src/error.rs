//! Error types for scanning and rule registration.

use thiserror::Error;

/// A failure reading the underlying character stream.
///
/// Malformed lexemes are never errors; they surface as unknown tokens.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8 sequence at byte {offset}")]
    InvalidUtf8 { offset: u64 },
}

/// A rejected rule registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("character '{0}' is already registered as a single-character token")]
    DuplicateChar(char),

    #[error("character '{0}' is already registered as a tail-character token")]
    DuplicateTailChar(char),

    #[error("symbol '{0}' is already registered")]
    DuplicateSymbol(String),

    #[error("keyword '{0}' is already registered")]
    DuplicateKeyword(String),

    #[error("a block starting with '{0}' is already registered")]
    DuplicateBlock(String),

    #[error("{0} text must not be empty")]
    EmptyDelimiter(&'static str),
}
