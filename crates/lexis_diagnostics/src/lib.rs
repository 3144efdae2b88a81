//! lexis_diagnostics: Diagnostic messages recorded while scanning.
//!
//! Diagnostics never alter the token stream. They are a side channel that
//! lets callers report unterminated constructs and unrecognized input with a
//! code and a source location.

use lexis_core::text::{SourcePosition, TextSpan};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1001).
    pub code: u32,
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The character span of the offending token.
    pub span: TextSpan,
    /// Line and column where the span starts.
    pub line: usize,
    pub column: usize,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a diagnostic anchored at `start` and covering `length` characters.
    pub fn at(
        start: SourcePosition,
        length: usize,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            span: TextSpan::new(start.offset, length),
            line: start.line,
            column: start.column,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}:{}) {} LX{}: {}",
            self.line, self.column, self.category, self.code, self.message_text
        )
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Diagnostics accumulated during one scan.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Scanner diagnostics (1000-1099)
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1001, Error, "Unterminated string literal; expected closing '{0}'.");
    pub const UNTERMINATED_BLOCK: DiagnosticMessage = diag!(1002, Error, "Unterminated block; expected '{0}'.");
    pub const UNKNOWN_TOKEN: DiagnosticMessage = diag!(1003, Warning, "Unrecognized token '{0}'.");
    pub const INVALID_NUMERIC_LITERAL: DiagnosticMessage = diag!(1004, Warning, "Numeric literal '{0}' could not be parsed.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        assert_eq!(format_message("'{0}' expected.", &["*/"]), "'*/' expected.");
        assert_eq!(format_message("{0} and {1}", &["a", "b"]), "a and b");
    }

    #[test]
    fn test_diagnostic_display() {
        let start = SourcePosition {
            offset: 4,
            line: 2,
            column: 1,
        };
        let diag = Diagnostic::at(start, 3, &messages::UNTERMINATED_STRING_LITERAL, &["\""]);
        assert!(diag.is_error());
        assert_eq!(diag.span, TextSpan::new(4, 3));
        assert_eq!(
            diag.to_string(),
            "(2:1) error LX1001: Unterminated string literal; expected closing '\"'."
        );
    }

    #[test]
    fn test_collection_counts() {
        let mut diags = DiagnosticCollection::new();
        assert!(diags.is_empty());
        let start = SourcePosition::start();
        diags.add(Diagnostic::at(start, 1, &messages::UNKNOWN_TOKEN, &["@"]));
        assert!(!diags.has_errors());
        diags.add(Diagnostic::at(start, 2, &messages::UNTERMINATED_BLOCK, &["*/"]));
        assert!(diags.has_errors());
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.len(), 2);
        diags.clear();
        assert!(diags.is_empty());
    }
}
