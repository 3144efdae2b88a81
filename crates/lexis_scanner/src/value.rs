//! Token payloads and their explicit coercions.
//!
//! A token carries the parsed value of its lexeme. Callers that want a value
//! in another shape ask for it explicitly: the `to_*_or` accessors fall back
//! to a caller-supplied default, the `TryFrom` impls report the mismatch.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The parsed value carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TokenValue {
    /// No value (end of input, most symbols and keywords).
    #[default]
    None,
    Integer(i64),
    Decimal(Decimal),
    /// Block content, string bodies, and raw lexemes of unknown tokens.
    Str(String),
    /// Single- and tail-character tokens.
    Char(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("cannot convert {value} value to {target}")]
    Incompatible {
        target: &'static str,
        value: &'static str,
    },
}

impl TokenValue {
    /// A short name for the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            TokenValue::None => "empty",
            TokenValue::Integer(_) => "integer",
            TokenValue::Decimal(_) => "decimal",
            TokenValue::Str(_) => "string",
            TokenValue::Char(_) => "char",
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, TokenValue::None)
    }

    /// Borrow the text of a `Str` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenValue::Str(s) => Some(s),
            _ => None,
        }
    }

    // ========================================================================
    // Fallible views
    // ========================================================================

    fn as_i64(&self) -> Option<i64> {
        match self {
            TokenValue::Integer(i) => Some(*i),
            TokenValue::Decimal(d) => d.round().to_i64(),
            TokenValue::Str(s) => s.trim().parse().ok(),
            TokenValue::Char(c) => Some(*c as i64),
            TokenValue::None => None,
        }
    }

    fn as_u64(&self) -> Option<u64> {
        match self {
            TokenValue::Integer(i) => u64::try_from(*i).ok(),
            TokenValue::Decimal(d) => d.round().to_u64(),
            TokenValue::Str(s) => s.trim().parse().ok(),
            TokenValue::Char(c) => Some(*c as u64),
            TokenValue::None => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            TokenValue::Integer(i) => Some(*i as f64),
            TokenValue::Decimal(d) => d.to_f64(),
            TokenValue::Str(s) => s.trim().parse().ok(),
            TokenValue::Char(_) | TokenValue::None => None,
        }
    }

    fn as_decimal(&self) -> Option<Decimal> {
        match self {
            TokenValue::Integer(i) => Some(Decimal::from(*i)),
            TokenValue::Decimal(d) => Some(*d),
            TokenValue::Str(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .ok()
            }
            TokenValue::Char(_) | TokenValue::None => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            TokenValue::Integer(i) => Some(*i != 0),
            TokenValue::Decimal(d) => Some(!d.is_zero()),
            TokenValue::Str(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            TokenValue::Char(_) | TokenValue::None => None,
        }
    }

    fn as_char(&self) -> Option<char> {
        match self {
            TokenValue::Char(c) => Some(*c),
            TokenValue::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            TokenValue::Integer(i) => u32::try_from(*i).ok().and_then(char::from_u32),
            TokenValue::Decimal(_) | TokenValue::None => None,
        }
    }

    // ========================================================================
    // Coercions with defaults
    // ========================================================================

    /// Integer view of the value. Decimals round half to even; text must be
    /// an integer literal; chars yield their code point.
    pub fn to_i64_or(&self, default: i64) -> i64 {
        self.as_i64().unwrap_or(default)
    }

    pub fn to_i32_or(&self, default: i32) -> i32 {
        self.as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(default)
    }

    pub fn to_u64_or(&self, default: u64) -> u64 {
        self.as_u64().unwrap_or(default)
    }

    pub fn to_u32_or(&self, default: u32) -> u32 {
        self.as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(default)
    }

    pub fn to_u8_or(&self, default: u8) -> u8 {
        self.as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .unwrap_or(default)
    }

    pub fn to_f64_or(&self, default: f64) -> f64 {
        self.as_f64().unwrap_or(default)
    }

    pub fn to_decimal_or(&self, default: Decimal) -> Decimal {
        self.as_decimal().unwrap_or(default)
    }

    /// Numbers are true when non-zero; text must spell `true` or `false`.
    pub fn to_bool_or(&self, default: bool) -> bool {
        self.as_bool().unwrap_or(default)
    }

    pub fn to_char_or(&self, default: char) -> char {
        self.as_char().unwrap_or(default)
    }

    /// Text form of the value; `None` yields the default.
    pub fn to_string_or(&self, default: &str) -> String {
        match self {
            TokenValue::None => default.to_string(),
            TokenValue::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn incompatible(&self, target: &'static str) -> ValueError {
        ValueError::Incompatible {
            target,
            value: self.type_name(),
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::None => Ok(()),
            TokenValue::Integer(i) => write!(f, "{}", i),
            TokenValue::Decimal(d) => write!(f, "{}", d),
            TokenValue::Str(s) => f.write_str(s),
            TokenValue::Char(c) => write!(f, "{}", c),
        }
    }
}

macro_rules! impl_try_from_value {
    ($target:ty, $name:literal, $view:ident) => {
        impl TryFrom<&TokenValue> for $target {
            type Error = ValueError;

            fn try_from(value: &TokenValue) -> Result<Self, Self::Error> {
                value.$view().ok_or_else(|| value.incompatible($name))
            }
        }
    };
}

impl_try_from_value!(i64, "i64", as_i64);
impl_try_from_value!(f64, "f64", as_f64);
impl_try_from_value!(Decimal, "decimal", as_decimal);
impl_try_from_value!(bool, "bool", as_bool);
impl_try_from_value!(char, "char", as_char);

impl TryFrom<&TokenValue> for String {
    type Error = ValueError;

    fn try_from(value: &TokenValue) -> Result<Self, Self::Error> {
        match value {
            TokenValue::None => Err(value.incompatible("string")),
            other => Ok(other.to_string_or("")),
        }
    }
}

impl From<i64> for TokenValue {
    fn from(value: i64) -> Self {
        TokenValue::Integer(value)
    }
}

impl From<Decimal> for TokenValue {
    fn from(value: Decimal) -> Self {
        TokenValue::Decimal(value)
    }
}

impl From<char> for TokenValue {
    fn from(value: char) -> Self {
        TokenValue::Char(value)
    }
}

impl From<String> for TokenValue {
    fn from(value: String) -> Self {
        TokenValue::Str(value)
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        TokenValue::Str(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn test_integer_coercions() {
        let v = TokenValue::Integer(300);
        assert_eq!(v.to_i64_or(0), 300);
        assert_eq!(v.to_i32_or(0), 300);
        assert_eq!(v.to_u8_or(7), 7);
        assert_eq!(v.to_f64_or(0.0), 300.0);
        assert_eq!(v.to_decimal_or(Decimal::ZERO), dec("300"));
        assert!(v.to_bool_or(false));
        assert_eq!(TokenValue::Integer(-1).to_u64_or(9), 9);
    }

    #[test]
    fn test_decimal_rounds_half_to_even() {
        assert_eq!(TokenValue::Decimal(dec("2.5")).to_i64_or(0), 2);
        assert_eq!(TokenValue::Decimal(dec("3.5")).to_i64_or(0), 4);
        assert_eq!(TokenValue::Decimal(dec("12.5")).to_f64_or(0.0), 12.5);
    }

    #[test]
    fn test_text_coercions() {
        let v = TokenValue::from(" 42 ");
        assert_eq!(v.to_i64_or(0), 42);
        assert_eq!(v.to_u32_or(0), 42);
        assert_eq!(TokenValue::from("1.5").to_i64_or(-1), -1);
        assert_eq!(TokenValue::from("1.5").to_decimal_or(Decimal::ZERO), dec("1.5"));
        assert_eq!(TokenValue::from("1e3").to_decimal_or(Decimal::ZERO), dec("1000"));
        assert!(TokenValue::from("TRUE").to_bool_or(false));
        assert!(!TokenValue::from("false").to_bool_or(true));
        assert!(TokenValue::from("maybe").to_bool_or(true));
        assert_eq!(TokenValue::from("x").to_char_or('?'), 'x');
        assert_eq!(TokenValue::from("xy").to_char_or('?'), '?');
    }

    #[test]
    fn test_char_coercions() {
        let v = TokenValue::Char('A');
        assert_eq!(v.to_i64_or(0), 65);
        assert_eq!(v.to_char_or('?'), 'A');
        assert_eq!(v.to_string_or(""), "A");
        assert_eq!(TokenValue::Integer(97).to_char_or('?'), 'a');
    }

    #[test]
    fn test_none_uses_defaults() {
        let v = TokenValue::None;
        assert_eq!(v.to_i64_or(5), 5);
        assert_eq!(v.to_string_or("nil"), "nil");
        assert_eq!(v.as_str(), None);
        assert_eq!(v.to_string(), "");
        assert!(v.is_none());
    }

    #[test]
    fn test_try_from() {
        let v = TokenValue::Integer(3);
        assert_eq!(i64::try_from(&v), Ok(3));
        assert_eq!(String::try_from(&v), Ok("3".to_string()));
        assert_eq!(
            char::try_from(&TokenValue::Decimal(dec("1.5"))),
            Err(ValueError::Incompatible {
                target: "char",
                value: "decimal"
            })
        );
        let err = String::try_from(&TokenValue::None).unwrap_err();
        assert_eq!(err.to_string(), "cannot convert empty value to string");
    }
}
