//! lexis_ruleset: Scanner configuration from JSON rule files.
//!
//! Token kinds in a rule file are plain strings. A `Ruleset` interns them and
//! configures `Scanner<InternedString, R>` instances, keeping the interner so
//! callers can turn kinds back into names.

mod config;
mod preset;

pub use config::{parse_rules, BlockEntry, FixedEntry, RuleConfig, SentinelNames};
pub use preset::PRESET_NAMES;

use lexis_core::{CaseMode, InternedString, StringInterner};
use lexis_scanner::{Decimal, RuleError, Scanner, Sentinels, TokenValue};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RulesetError {
    #[error("failed to read rule file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rule file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown preset '{0}' (available: {available})", available = PRESET_NAMES.join(", "))]
    UnknownPreset(String),

    #[error("'{0}' is not a single character")]
    InvalidChar(String),

    #[error("unsupported value for '{text}': {value}")]
    UnsupportedValue { text: String, value: String },

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// A validated rule file with its interned token kinds.
#[derive(Debug, Clone)]
pub struct Ruleset {
    config: RuleConfig,
    interner: StringInterner,
    sentinels: Sentinels<InternedString>,
}

impl Ruleset {
    /// Validate a parsed rule file. Every rule is registered once against an
    /// empty input so that conflicts are reported here rather than later.
    pub fn from_config(config: RuleConfig) -> Result<Self, RulesetError> {
        let interner = StringInterner::new();
        let names = config.sentinels.clone().unwrap_or_default();
        let sentinels = Sentinels {
            end: interner.intern(&names.end),
            unknown: interner.intern(&names.unknown),
            integer: interner.intern(&names.integer),
            decimal: interner.intern(&names.decimal),
            string: interner.intern(&names.string),
        };
        let ruleset = Self {
            config,
            interner,
            sentinels,
        };
        ruleset.build_scanner(std::io::empty())?;
        debug!(kinds = ruleset.interner.len(), "rule set validated");
        Ok(ruleset)
    }

    pub fn from_json_str(content: &str) -> Result<Self, RulesetError> {
        Self::from_config(parse_rules(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RulesetError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading rule file");
        let content = std::fs::read_to_string(path).map_err(|source| RulesetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Load one of the built-in rule sets by name.
    pub fn preset(name: &str) -> Result<Self, RulesetError> {
        let content =
            preset::lookup(name).ok_or_else(|| RulesetError::UnknownPreset(name.to_string()))?;
        Self::from_json_str(content)
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn case_mode(&self) -> CaseMode {
        CaseMode::from_ignore_case(self.config.case_insensitive.unwrap_or(false))
    }

    pub fn sentinels(&self) -> &Sentinels<InternedString> {
        &self.sentinels
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// The name of a token kind.
    pub fn kind_name(&self, kind: InternedString) -> &str {
        self.interner.resolve(kind)
    }

    /// Look up a kind by name, if any rule uses it.
    pub fn kind(&self, name: &str) -> Option<InternedString> {
        self.interner.get(name)
    }

    /// Create a scanner over `reader` with every rule applied.
    pub fn build_scanner<R: Read>(
        &self,
        reader: R,
    ) -> Result<Scanner<InternedString, R>, RulesetError> {
        let mut scanner = Scanner::new(reader, self.sentinels.clone(), self.case_mode());
        self.apply(&mut scanner)?;
        Ok(scanner)
    }

    /// Register every rule and toggle on an existing scanner.
    pub fn apply<R: Read>(&self, scanner: &mut Scanner<InternedString, R>) -> Result<(), RulesetError> {
        let config = &self.config;

        if let Some(allow) = config.allow_string {
            scanner.set_allow_string(allow);
        }
        if let Some(allow) = config.allow_number {
            scanner.set_allow_number(allow);
        }
        if let Some(enabled) = config.break_on_ignore {
            scanner.set_break_on_ignore_in_keyword(enabled);
        }
        if let Some(enabled) = config.break_on_single_char {
            scanner.set_break_on_single_char_in_keyword(enabled);
        }
        if let Some(chars) = &config.ignore_chars {
            scanner.set_ignore_chars(chars.chars());
        }
        if let Some(chars) = &config.keyword_break_chars {
            scanner.set_keyword_break_chars(chars.chars());
        }
        if let Some(chars) = &config.string_start_chars {
            scanner.set_string_start_chars(chars.chars());
        }

        for (key, kind) in config.chars.iter().flatten() {
            scanner.add_char(single_char(key)?, self.interner.intern(kind))?;
        }
        for (key, kind) in config.tail_chars.iter().flatten() {
            scanner.add_tail_char(single_char(key)?, self.interner.intern(kind))?;
        }
        for entry in config.symbols.iter().flatten() {
            let value = fixed_value(entry)?;
            scanner.add_symbol(&entry.text, self.interner.intern(&entry.kind), value)?;
        }
        for entry in config.keywords.iter().flatten() {
            let value = fixed_value(entry)?;
            scanner.add_keyword(&entry.text, self.interner.intern(&entry.kind), value)?;
        }
        for block in config.blocks.iter().flatten() {
            scanner.add_block(self.interner.intern(&block.kind), &block.start, &block.end)?;
        }
        Ok(())
    }
}

fn single_char(key: &str) -> Result<char, RulesetError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(RulesetError::InvalidChar(key.to_string())),
    }
}

/// Convert a JSON payload into a token value. Whole numbers become integers,
/// other numbers decimals, booleans their text.
fn fixed_value(entry: &FixedEntry) -> Result<TokenValue, RulesetError> {
    use serde_json::Value;

    let unsupported = || RulesetError::UnsupportedValue {
        text: entry.text.clone(),
        value: entry.value.to_string(),
    };
    match &entry.value {
        Value::Null => Ok(TokenValue::None),
        Value::Bool(b) => Ok(TokenValue::Str(b.to_string())),
        Value::String(s) => Ok(TokenValue::Str(s.clone())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(TokenValue::Integer(i));
            }
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map(TokenValue::Decimal)
                .map_err(|_| unsupported())
        }
        Value::Array(_) | Value::Object(_) => Err(unsupported()),
    }
}
