//! The scan engine.
//!
//! `Scanner` pulls characters from a `CharCursor`, decides which rule claims
//! the text at the current position, and produces one `Token` per call.
//! Rules are consulted in a fixed order: blocks, literal symbols, single
//! characters, strings, numbers, tail characters, and finally bare words.

use crate::char_codes::{is_digit, is_sign, DOT};
use crate::cursor::CharCursor;
use crate::error::{RuleError, ScanError};
use crate::matcher::try_match;
use crate::readers::{self, NumberLexeme};
use crate::rules::RuleRegistry;
use crate::token::{Token, TokenFlags};
use crate::value::TokenValue;
use lexis_core::text::SourcePosition;
use lexis_core::CaseMode;
use lexis_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use std::fmt;
use std::io::Read;
use tracing::{debug, trace};

/// The token kinds the engine assigns on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinels<K> {
    /// Emitted once input is exhausted.
    pub end: K,
    /// Unmatched bare words, stray break characters, unparsable numbers.
    pub unknown: K,
    pub integer: K,
    pub decimal: K,
    pub string: K,
}

enum ScanState<K> {
    Idle,
    /// End of input was reported; the end token is replayed from here.
    Exhausted(Token<K>),
}

/// A rule-driven scanner over any `Read` source.
pub struct Scanner<K, R> {
    cursor: CharCursor<R>,
    rules: RuleRegistry<K>,
    sentinels: Sentinels<K>,
    state: ScanState<K>,
    current: Option<Token<K>>,
    /// Set once the iterator has handed out the end token.
    fused: bool,
    diagnostics: DiagnosticCollection,
}

impl<'a, K: Clone + fmt::Debug> Scanner<K, &'a [u8]> {
    /// Create a scanner over in-memory text.
    pub fn from_text(text: &'a str, sentinels: Sentinels<K>, case: CaseMode) -> Self {
        Self::new(text.as_bytes(), sentinels, case)
    }
}

impl<K: Clone + fmt::Debug, R: Read> Scanner<K, R> {
    pub fn new(reader: R, sentinels: Sentinels<K>, case: CaseMode) -> Self {
        Self {
            cursor: CharCursor::new(reader),
            rules: RuleRegistry::new(case),
            sentinels,
            state: ScanState::Idle,
            current: None,
            fused: false,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn rules(&self) -> &RuleRegistry<K> {
        &self.rules
    }

    /// Mutable access to the rule tables. Changes apply from the next token on.
    pub fn rules_mut(&mut self) -> &mut RuleRegistry<K> {
        &mut self.rules
    }

    pub fn sentinels(&self) -> &Sentinels<K> {
        &self.sentinels
    }

    pub fn add_char(&mut self, ch: char, kind: K) -> Result<(), RuleError> {
        self.rules.add_char(ch, kind)
    }

    pub fn add_tail_char(&mut self, ch: char, kind: K) -> Result<(), RuleError> {
        self.rules.add_tail_char(ch, kind)
    }

    pub fn add_symbol(&mut self, text: &str, kind: K, value: TokenValue) -> Result<(), RuleError> {
        self.rules.add_symbol(text, kind, value)
    }

    pub fn add_keyword(&mut self, text: &str, kind: K, value: TokenValue) -> Result<(), RuleError> {
        self.rules.add_keyword(text, kind, value)
    }

    pub fn add_block(&mut self, kind: K, start: &str, end: &str) -> Result<(), RuleError> {
        self.rules.add_block(kind, start, end)
    }

    pub fn set_allow_string(&mut self, allow: bool) {
        self.rules.set_allow_string(allow);
    }

    pub fn set_allow_number(&mut self, allow: bool) {
        self.rules.set_allow_number(allow);
    }

    pub fn set_break_on_ignore_in_keyword(&mut self, enabled: bool) {
        self.rules.set_break_on_ignore_in_keyword(enabled);
    }

    pub fn set_break_on_single_char_in_keyword(&mut self, enabled: bool) {
        self.rules.set_break_on_single_char_in_keyword(enabled);
    }

    pub fn set_ignore_chars(&mut self, chars: impl IntoIterator<Item = char>) {
        self.rules.set_ignore_chars(chars);
    }

    pub fn set_keyword_break_chars(&mut self, chars: impl IntoIterator<Item = char>) {
        self.rules.set_keyword_break_chars(chars);
    }

    pub fn set_string_start_chars(&mut self, chars: impl IntoIterator<Item = char>) {
        self.rules.set_string_start_chars(chars);
    }

    // ========================================================================
    // Stream management
    // ========================================================================

    /// The position of the next unconsumed character.
    pub fn position(&self) -> SourcePosition {
        self.cursor.position()
    }

    /// Start over on a new reader. Position, lookahead, the current token,
    /// the exhausted state and diagnostics are all reset; rules are kept.
    pub fn rebind(&mut self, reader: R) -> R {
        debug!("rebinding scanner to a new reader");
        self.state = ScanState::Idle;
        self.current = None;
        self.fused = false;
        self.diagnostics.clear();
        self.cursor.replace_reader(reader)
    }

    pub fn into_inner(self) -> R {
        self.cursor.into_inner()
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    // ========================================================================
    // Token access
    // ========================================================================

    /// Scan the next token and make it current. Returns `false` once the
    /// produced token is the end token.
    pub fn advance(&mut self) -> Result<bool, ScanError> {
        let token = self.scan()?;
        let more = !token.is_end();
        self.current = Some(token);
        Ok(more)
    }

    /// The current token, scanning the first one on demand.
    pub fn current(&mut self) -> Result<&Token<K>, ScanError> {
        let token = match self.current.take() {
            Some(token) => token,
            None => self.scan()?,
        };
        Ok(self.current.insert(token))
    }

    /// Scan the next token, make it current, and return a copy.
    pub fn next_token(&mut self) -> Result<Token<K>, ScanError> {
        let token = self.scan()?;
        self.current = Some(token.clone());
        Ok(token)
    }

    // ========================================================================
    // Direct reading
    // ========================================================================

    /// Skip ignore characters and return the next significant one, unconsumed.
    pub fn skip_ignored(&mut self) -> Result<Option<char>, ScanError> {
        while let Some(ch) = self.cursor.peek()? {
            if !self.rules.is_ignored(ch) {
                return Ok(Some(ch));
            }
            self.cursor.read()?;
        }
        Ok(None)
    }

    /// Read raw text up to `end`. See [`Scanner::read_to_any`].
    pub fn read_to(&mut self, end: &str, consume_end: bool) -> Result<(String, bool), ScanError> {
        self.read_to_any(&[end], consume_end)
    }

    /// Read raw text up to the first of `ends`, bypassing the rules.
    /// Returns the text and whether a terminator was found.
    pub fn read_to_any(
        &mut self,
        ends: &[&str],
        consume_end: bool,
    ) -> Result<(String, bool), ScanError> {
        readers::read_to(&mut self.cursor, ends, self.rules.case(), consume_end)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    fn scan(&mut self) -> Result<Token<K>, ScanError> {
        if let ScanState::Exhausted(end) = &self.state {
            return Ok(end.clone());
        }

        let ch = match self.skip_ignored()? {
            Some(ch) => ch,
            None => {
                let end = Token::new(
                    self.sentinels.end.clone(),
                    TokenValue::None,
                    self.cursor.position(),
                    1,
                    TokenFlags::END_OF_INPUT,
                );
                trace!(offset = end.offset(), "end of input");
                self.state = ScanState::Exhausted(end.clone());
                return Ok(end);
            }
        };

        let start = self.cursor.position();
        let token = self.dispatch(ch, start)?;
        trace!(
            kind = ?token.kind(),
            offset = token.offset(),
            length = token.length(),
            "token"
        );
        Ok(token)
    }

    fn dispatch(&mut self, ch: char, start: SourcePosition) -> Result<Token<K>, ScanError> {
        if let Some((kind, end)) = self.match_block()? {
            let (content, closed) =
                readers::read_to(&mut self.cursor, &[end.as_str()], self.rules.case(), true)?;
            let mut flags = TokenFlags::NONE;
            if !closed {
                flags |= TokenFlags::UNTERMINATED;
                self.report(start, &messages::UNTERMINATED_BLOCK, &end);
            }
            return Ok(self.finish(kind, TokenValue::Str(content), start, flags));
        }

        if let Some((kind, value)) = self.match_symbol()? {
            return Ok(self.finish(kind, value, start, TokenFlags::NONE));
        }

        if let Some(kind) = self.rules.single_char(ch).cloned() {
            self.cursor.read()?;
            return Ok(self.finish(kind, TokenValue::Char(ch), start, TokenFlags::NONE));
        }

        if self.rules.allow_string() && self.rules.is_string_start(ch) {
            self.cursor.read()?;
            let (body, closed) = readers::read_string(&mut self.cursor, ch)?;
            let mut flags = TokenFlags::NONE;
            if !closed {
                flags |= TokenFlags::UNTERMINATED;
                self.report(start, &messages::UNTERMINATED_STRING_LITERAL, &ch.to_string());
            }
            let kind = self.sentinels.string.clone();
            return Ok(self.finish(kind, TokenValue::Str(body), start, flags));
        }

        if self.rules.allow_number() && self.starts_number(ch)? {
            let lexeme = readers::read_number(&mut self.cursor)?;
            return Ok(self.classify_number(lexeme, start));
        }

        if let Some(kind) = self.rules.tail_char(ch).cloned() {
            self.cursor.read()?;
            return Ok(self.finish(kind, TokenValue::Char(ch), start, TokenFlags::NONE));
        }

        let word = readers::read_word(&mut self.cursor, &self.rules)?;
        if word.is_empty() {
            // The current character breaks words but no rule claims it.
            self.cursor.read()?;
            return Ok(self.unknown(ch.to_string(), start, &messages::UNKNOWN_TOKEN));
        }
        if let Some(rule) = self.rules.keyword(&word) {
            let (kind, value) = (rule.kind.clone(), rule.value.clone());
            return Ok(self.finish(kind, value, start, TokenFlags::NONE));
        }
        Ok(self.unknown(word, start, &messages::UNKNOWN_TOKEN))
    }

    /// Try block openers in registration order, consuming the one that matches.
    fn match_block(&mut self) -> Result<Option<(K, String)>, ScanError> {
        let case = self.rules.case();
        for block in self.rules.blocks() {
            if try_match(&mut self.cursor, &block.start, case, true)? {
                return Ok(Some((block.kind.clone(), block.end.clone())));
            }
        }
        Ok(None)
    }

    fn match_symbol(&mut self) -> Result<Option<(K, TokenValue)>, ScanError> {
        let case = self.rules.case();
        for symbol in self.rules.symbols() {
            if try_match(&mut self.cursor, &symbol.text, case, true)? {
                return Ok(Some((symbol.kind.clone(), symbol.value.clone())));
            }
        }
        Ok(None)
    }

    /// A digit, a sign or point followed by a digit, or a sign followed by a point.
    fn starts_number(&mut self, ch: char) -> Result<bool, ScanError> {
        if is_digit(ch) {
            return Ok(true);
        }
        if !is_sign(ch) && ch != DOT {
            return Ok(false);
        }
        Ok(match self.cursor.peek_nth(1)? {
            Some(next) => is_digit(next) || (is_sign(ch) && next == DOT),
            None => false,
        })
    }

    fn classify_number(&mut self, lexeme: NumberLexeme, start: SourcePosition) -> Token<K> {
        let mut flags = TokenFlags::NONE;
        flags.set(TokenFlags::DECIMAL, lexeme.is_decimal);
        flags.set(TokenFlags::SCIENTIFIC, lexeme.is_scientific);

        if flags.intersects(TokenFlags::NUMERIC_LITERAL_FLAGS) {
            if let Some(value) = readers::parse_decimal(&lexeme.text) {
                let kind = self.sentinels.decimal.clone();
                return self.finish(kind, TokenValue::Decimal(value), start, flags);
            }
        } else if let Ok(value) = lexeme.text.parse::<i64>() {
            let kind = self.sentinels.integer.clone();
            return self.finish(kind, TokenValue::Integer(value), start, flags);
        }

        self.unknown(lexeme.text, start, &messages::INVALID_NUMERIC_LITERAL)
    }

    fn unknown(
        &mut self,
        text: String,
        start: SourcePosition,
        message: &DiagnosticMessage,
    ) -> Token<K> {
        self.report(start, message, &text);
        let kind = self.sentinels.unknown.clone();
        self.finish(kind, TokenValue::Str(text), start, TokenFlags::NONE)
    }

    /// Build a token whose length is everything consumed since `start`.
    fn finish(&self, kind: K, value: TokenValue, start: SourcePosition, flags: TokenFlags) -> Token<K> {
        let length = self.cursor.position().offset - start.offset;
        Token::new(kind, value, start, length, flags)
    }

    fn report(&mut self, start: SourcePosition, message: &DiagnosticMessage, arg: &str) {
        let length = self.cursor.position().offset - start.offset;
        self.diagnostics.add(Diagnostic::at(start, length, message, &[arg]));
    }
}

/// Yields every token up to and including the end token, then `None`.
/// A read error is yielded once and also ends the iteration.
impl<K: Clone + fmt::Debug, R: Read> Iterator for Scanner<K, R> {
    type Item = Result<Token<K>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(token) if !token.is_end() => {}
            _ => self.fused = true,
        }
        Some(result)
    }
}

impl<K: fmt::Debug, R> fmt::Debug for Scanner<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("position", &self.cursor.position())
            .field("sentinels", &self.sentinels)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        End,
        Unknown,
        Integer,
        Decimal,
        Str,
        Semi,
        Comment,
    }

    fn sentinels() -> Sentinels<Kind> {
        Sentinels {
            end: Kind::End,
            unknown: Kind::Unknown,
            integer: Kind::Integer,
            decimal: Kind::Decimal,
            string: Kind::Str,
        }
    }

    #[test]
    fn test_current_is_lazy_and_stable() {
        let mut scanner = Scanner::from_text("a b", sentinels(), CaseMode::Sensitive);
        assert_eq!(scanner.current().unwrap().value().as_str(), Some("a"));
        assert_eq!(scanner.current().unwrap().value().as_str(), Some("a"));
        assert!(scanner.advance().unwrap());
        assert_eq!(scanner.current().unwrap().value().as_str(), Some("b"));
        assert!(!scanner.advance().unwrap());
        assert!(scanner.current().unwrap().is_end());
    }

    #[test]
    fn test_registration_between_calls() {
        let mut scanner = Scanner::from_text("; ;", sentinels(), CaseMode::Sensitive);
        assert_eq!(*scanner.next_token().unwrap().kind(), Kind::Unknown);
        scanner.add_char(';', Kind::Semi).unwrap();
        assert_eq!(*scanner.next_token().unwrap().kind(), Kind::Semi);
    }

    #[test]
    fn test_rebind_resets() {
        let mut scanner = Scanner::from_text("@", sentinels(), CaseMode::Sensitive);
        scanner.add_block(Kind::Comment, "/*", "*/").unwrap();
        assert_eq!(*scanner.next_token().unwrap().kind(), Kind::Unknown);
        assert!(scanner.next_token().unwrap().is_end());
        assert_eq!(scanner.diagnostics().len(), 1);

        scanner.rebind("\n/**/".as_bytes());
        assert!(scanner.diagnostics().is_empty());
        let token = scanner.next_token().unwrap();
        assert_eq!(*token.kind(), Kind::Comment);
        assert_eq!((token.offset(), token.line(), token.column()), (1, 2, 0));
    }

    #[test]
    fn test_read_to_helpers() {
        let mut scanner = Scanner::from_text("  key = value;\nnext", sentinels(), CaseMode::Sensitive);
        assert_eq!(scanner.skip_ignored().unwrap(), Some('k'));
        let (text, found) = scanner.read_to("=", true).unwrap();
        assert_eq!((text.as_str(), found), ("key ", true));
        let (text, found) = scanner.read_to_any(&[";", "\n"], false).unwrap();
        assert_eq!((text.as_str(), found), (" value", true));
        assert_eq!(scanner.position().offset, 13);
        assert_eq!(scanner.next_token().unwrap().value().as_str(), Some(";"));
    }

    #[test]
    fn test_debug_shows_position_and_current() {
        let mut scanner = Scanner::from_text("ab", sentinels(), CaseMode::Sensitive);
        assert!(format!("{:?}", scanner).contains("current: None"));
        scanner.advance().unwrap();
        let shown = format!("{:?}", scanner);
        assert!(shown.starts_with("Scanner {"));
        assert!(shown.contains("offset: 2"));
        assert!(shown.contains("current: Some"));
    }

    #[test]
    fn test_into_inner_returns_reader() {
        let scanner = Scanner::from_text("", sentinels(), CaseMode::Sensitive);
        assert!(scanner.into_inner().is_empty());
    }
}
