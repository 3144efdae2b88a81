//! The rule registry: every table the scan engine consults.
//!
//! Keys are stored case-folded under the registry's `CaseMode`, and every
//! probe is folded the same way before lookup.

use crate::char_codes::{DEFAULT_IGNORE_CHARS, DEFAULT_STRING_START_CHARS};
use crate::error::RuleError;
use crate::value::TokenValue;
use lexis_core::{CaseMode, FxHashMap, FxHashSet, OrderedMap};
use tracing::{debug, warn};

/// A delimited region such as a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRule<K> {
    pub kind: K,
    pub start: String,
    pub end: String,
}

/// A literal symbol or keyword with the fixed value its tokens carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedRule<K> {
    /// The text as registered, before case folding.
    pub text: String,
    pub kind: K,
    pub value: TokenValue,
}

#[derive(Debug, Clone)]
pub struct RuleRegistry<K> {
    case: CaseMode,
    ignore_chars: FxHashSet<char>,
    keyword_break_chars: FxHashSet<char>,
    string_start_chars: FxHashSet<char>,
    chars: FxHashMap<char, K>,
    tail_chars: FxHashMap<char, K>,
    symbols: OrderedMap<String, FixedRule<K>>,
    keywords: FxHashMap<String, FixedRule<K>>,
    blocks: Vec<BlockRule<K>>,
    allow_string: bool,
    allow_number: bool,
    break_on_ignore: bool,
    break_on_single_char: bool,
}

impl<K> RuleRegistry<K> {
    pub fn new(case: CaseMode) -> Self {
        Self {
            case,
            ignore_chars: fold_set(case, DEFAULT_IGNORE_CHARS),
            keyword_break_chars: fold_set(case, DEFAULT_IGNORE_CHARS),
            string_start_chars: fold_set(case, DEFAULT_STRING_START_CHARS),
            chars: FxHashMap::default(),
            tail_chars: FxHashMap::default(),
            symbols: OrderedMap::new(),
            keywords: FxHashMap::default(),
            blocks: Vec::new(),
            allow_string: true,
            allow_number: true,
            break_on_ignore: true,
            break_on_single_char: true,
        }
    }

    #[inline]
    pub fn case(&self) -> CaseMode {
        self.case
    }

    // ========================================================================
    // Registration
    // ========================================================================

    pub fn add_char(&mut self, ch: char, kind: K) -> Result<(), RuleError> {
        let key = self.case.fold_char(ch);
        let result = if self.chars.contains_key(&key) {
            Err(RuleError::DuplicateChar(ch))
        } else {
            self.chars.insert(key, kind);
            Ok(())
        };
        log_registration("char", &ch.to_string(), result)
    }

    pub fn add_tail_char(&mut self, ch: char, kind: K) -> Result<(), RuleError> {
        let key = self.case.fold_char(ch);
        let result = if self.tail_chars.contains_key(&key) {
            Err(RuleError::DuplicateTailChar(ch))
        } else {
            self.tail_chars.insert(key, kind);
            Ok(())
        };
        log_registration("tail char", &ch.to_string(), result)
    }

    pub fn add_symbol(&mut self, text: &str, kind: K, value: TokenValue) -> Result<(), RuleError> {
        let result = if text.is_empty() {
            Err(RuleError::EmptyDelimiter("symbol"))
        } else {
            let rule = FixedRule {
                text: text.to_string(),
                kind,
                value,
            };
            self.symbols
                .try_insert(self.case.fold_str(text).into_owned(), rule)
                .map_err(|_| RuleError::DuplicateSymbol(text.to_string()))
        };
        log_registration("symbol", text, result)
    }

    pub fn add_keyword(&mut self, text: &str, kind: K, value: TokenValue) -> Result<(), RuleError> {
        let key = self.case.fold_str(text).into_owned();
        let result = if text.is_empty() {
            Err(RuleError::EmptyDelimiter("keyword"))
        } else if self.keywords.contains_key(&key) {
            Err(RuleError::DuplicateKeyword(text.to_string()))
        } else {
            let rule = FixedRule {
                text: text.to_string(),
                kind,
                value,
            };
            self.keywords.insert(key, rule);
            Ok(())
        };
        log_registration("keyword", text, result)
    }

    pub fn add_block(&mut self, kind: K, start: &str, end: &str) -> Result<(), RuleError> {
        let case = self.case;
        let result = if start.is_empty() {
            Err(RuleError::EmptyDelimiter("block start"))
        } else if end.is_empty() {
            Err(RuleError::EmptyDelimiter("block end"))
        } else if self.blocks.iter().any(|b| case.eq_str(&b.start, start)) {
            Err(RuleError::DuplicateBlock(start.to_string()))
        } else {
            self.blocks.push(BlockRule {
                kind,
                start: start.to_string(),
                end: end.to_string(),
            });
            Ok(())
        };
        log_registration("block", start, result)
    }

    // ========================================================================
    // Toggles
    // ========================================================================

    pub fn set_allow_string(&mut self, allow: bool) {
        self.allow_string = allow;
    }

    pub fn set_allow_number(&mut self, allow: bool) {
        self.allow_number = allow;
    }

    pub fn set_break_on_ignore_in_keyword(&mut self, enabled: bool) {
        self.break_on_ignore = enabled;
    }

    pub fn set_break_on_single_char_in_keyword(&mut self, enabled: bool) {
        self.break_on_single_char = enabled;
    }

    pub fn set_ignore_chars(&mut self, chars: impl IntoIterator<Item = char>) {
        self.ignore_chars = fold_set(self.case, chars);
    }

    pub fn set_keyword_break_chars(&mut self, chars: impl IntoIterator<Item = char>) {
        self.keyword_break_chars = fold_set(self.case, chars);
    }

    pub fn set_string_start_chars(&mut self, chars: impl IntoIterator<Item = char>) {
        self.string_start_chars = fold_set(self.case, chars);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    pub fn allow_string(&self) -> bool {
        self.allow_string
    }

    #[inline]
    pub fn allow_number(&self) -> bool {
        self.allow_number
    }

    pub fn is_ignored(&self, ch: char) -> bool {
        self.ignore_chars.contains(&self.case.fold_char(ch))
    }

    pub fn is_string_start(&self, ch: char) -> bool {
        self.string_start_chars.contains(&self.case.fold_char(ch))
    }

    pub fn single_char(&self, ch: char) -> Option<&K> {
        self.chars.get(&self.case.fold_char(ch))
    }

    pub fn tail_char(&self, ch: char) -> Option<&K> {
        self.tail_chars.get(&self.case.fold_char(ch))
    }

    /// Whether `ch` ends a bare word under the current break settings.
    pub fn breaks_word(&self, ch: char) -> bool {
        let key = self.case.fold_char(ch);
        (self.break_on_ignore && self.ignore_chars.contains(&key))
            || (self.break_on_single_char && self.chars.contains_key(&key))
            || self.keyword_break_chars.contains(&key)
    }

    pub fn keyword(&self, word: &str) -> Option<&FixedRule<K>> {
        self.keywords.get(&*self.case.fold_str(word))
    }

    /// Literal symbols in registration order.
    pub fn symbols(&self) -> impl Iterator<Item = &FixedRule<K>> {
        self.symbols.values()
    }

    /// Block rules in registration order.
    pub fn blocks(&self) -> &[BlockRule<K>] {
        &self.blocks
    }
}

fn fold_set(case: CaseMode, chars: impl IntoIterator<Item = char>) -> FxHashSet<char> {
    chars.into_iter().map(|c| case.fold_char(c)).collect()
}

fn log_registration(rule: &'static str, text: &str, result: Result<(), RuleError>) -> Result<(), RuleError> {
    match &result {
        Ok(()) => debug!(rule, text, "registered rule"),
        Err(err) => warn!(rule, text, error = %err, "rejected rule"),
    }
    result
}
