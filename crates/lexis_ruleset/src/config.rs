//! The JSON rule file schema.
//!
//! Every field is optional; an empty object describes a scanner with the
//! library defaults and no rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A rule file, matching the `*.json` rule schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleConfig {
    // -- Comparison and toggles --
    pub case_insensitive: Option<bool>,
    pub allow_string: Option<bool>,
    pub allow_number: Option<bool>,
    pub break_on_ignore: Option<bool>,
    pub break_on_single_char: Option<bool>,

    // -- Character sets, each given as a string of characters --
    pub ignore_chars: Option<String>,
    pub keyword_break_chars: Option<String>,
    pub string_start_chars: Option<String>,

    // -- Token kinds --
    pub sentinels: Option<SentinelNames>,
    /// Single-character tokens, keyed by the character.
    pub chars: Option<BTreeMap<String, String>>,
    /// Characters claimed only after number and string dispatch.
    pub tail_chars: Option<BTreeMap<String, String>>,
    /// Literal symbols, matched in the listed order.
    pub symbols: Option<Vec<FixedEntry>>,
    pub keywords: Option<Vec<FixedEntry>>,
    pub blocks: Option<Vec<BlockEntry>>,
}

/// Kind names for the tokens the engine produces on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SentinelNames {
    pub end: String,
    pub unknown: String,
    pub integer: String,
    pub decimal: String,
    pub string: String,
}

impl Default for SentinelNames {
    fn default() -> Self {
        Self {
            end: "End".to_string(),
            unknown: "Unknown".to_string(),
            integer: "Integer".to_string(),
            decimal: "Decimal".to_string(),
            string: "String".to_string(),
        }
    }
}

/// A symbol or keyword. `value` is the fixed payload its tokens carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixedEntry {
    pub text: String,
    pub kind: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockEntry {
    pub kind: String,
    pub start: String,
    pub end: String,
}

/// Parse a rule file from a string.
pub fn parse_rules(content: &str) -> Result<RuleConfig, serde_json::Error> {
    serde_json::from_str(content)
}
