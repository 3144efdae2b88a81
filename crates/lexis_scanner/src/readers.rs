//! Sub-scanners for blocks, quoted strings, numeric literals and bare words.
//!
//! Readers consume from a cursor and never fail on malformed input: they
//! return whatever they accumulated and let the engine classify it.

use crate::char_codes::{is_digit, is_exponent_marker, is_sign, BACKSLASH, DOT};
use crate::cursor::CharCursor;
use crate::error::ScanError;
use crate::matcher::try_match_any;
use crate::rules::RuleRegistry;
use lexis_core::CaseMode;
use rust_decimal::Decimal;
use std::io::Read;
use std::str::FromStr;

/// Consume characters until one of `ends` matches or input runs out.
///
/// Returns the content before the terminator and whether a terminator was
/// found. The terminator itself is consumed only when `consume_end` is set.
pub fn read_to<R: Read>(
    cursor: &mut CharCursor<R>,
    ends: &[&str],
    case: CaseMode,
    consume_end: bool,
) -> Result<(String, bool), ScanError> {
    let mut content = String::new();
    while cursor.peek()?.is_some() {
        if try_match_any(cursor, ends, case, consume_end)?.is_some() {
            return Ok((content, true));
        }
        if let Some(ch) = cursor.read()? {
            content.push(ch);
        }
    }
    Ok((content, false))
}

/// Read a quoted string body. The opening quote must already be consumed.
///
/// A backslash and the character after it are copied through verbatim, so
/// an escaped quote does not close the string.
pub fn read_string<R: Read>(
    cursor: &mut CharCursor<R>,
    quote: char,
) -> Result<(String, bool), ScanError> {
    let mut body = String::new();
    while let Some(ch) = cursor.peek()? {
        cursor.read()?;
        if ch == quote {
            return Ok((body, true));
        }
        body.push(ch);
        if ch == BACKSLASH {
            match cursor.read()? {
                Some(escaped) => body.push(escaped),
                None => break,
            }
        }
    }
    Ok((body, false))
}

/// The raw text of a numeric literal and what it contained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberLexeme {
    pub text: String,
    pub is_decimal: bool,
    pub is_scientific: bool,
}

/// Accumulate a numeric literal in a single left-to-right pass.
///
/// A sign is accepted only first or right after the exponent marker; a
/// decimal point at most once and never after the exponent; an exponent
/// marker at most once and only after a digit since the last sign or point.
/// The first character that breaks these rules is left unconsumed.
pub fn read_number<R: Read>(cursor: &mut CharCursor<R>) -> Result<NumberLexeme, ScanError> {
    let mut text = String::new();
    let mut len = 0usize;
    let mut is_decimal = false;
    let mut is_scientific = false;
    // Where a sign may appear, and where the digits of the current part begin.
    let mut sign_at = 0usize;
    let mut digits_from = 1usize;

    while let Some(ch) = cursor.peek()? {
        if is_sign(ch) {
            if len != sign_at {
                break;
            }
            digits_from = len + 2;
        } else if ch == DOT {
            if is_decimal || is_scientific {
                break;
            }
            is_decimal = true;
            digits_from = len + 2;
        } else if is_exponent_marker(ch) {
            if is_scientific || len < digits_from {
                break;
            }
            is_scientific = true;
            sign_at = len + 1;
        } else if !is_digit(ch) {
            break;
        }
        text.push(ch);
        len += 1;
        cursor.read()?;
    }

    Ok(NumberLexeme {
        text,
        is_decimal,
        is_scientific,
    })
}

/// Parse a plain or scientific decimal lexeme.
///
/// Accepts an optional sign, a mantissa with at most one point (digits may be
/// missing on one side of it), and an optional exponent with its own sign.
/// Returns `None` when the text is not a number or does not fit.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (mantissa, exponent) = match rest.find(is_exponent_marker) {
        Some(at) => (&rest[..at], Some(&rest[at + 1..])),
        None => (rest, None),
    };
    if !mantissa.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    let mantissa = if mantissa.starts_with(DOT) {
        format!("0{}", mantissa)
    } else if mantissa.ends_with(DOT) {
        format!("{}0", mantissa)
    } else {
        mantissa.to_string()
    };
    let mut value = Decimal::from_str(&mantissa).ok()?;

    if let Some(exponent) = exponent {
        let exponent: i32 = exponent.parse().ok()?;
        let ten = Decimal::TEN;
        for _ in 0..exponent.unsigned_abs() {
            if value.is_zero() {
                break;
            }
            value = if exponent > 0 {
                value.checked_mul(ten)?
            } else {
                value.checked_div(ten)?
            };
        }
        value = value.normalize();
    }

    Some(if negative { -value } else { value })
}

/// Read a bare word: everything up to the first word-breaking character.
pub fn read_word<K, R: Read>(
    cursor: &mut CharCursor<R>,
    rules: &RuleRegistry<K>,
) -> Result<String, ScanError> {
    let mut word = String::new();
    while let Some(ch) = cursor.peek()? {
        if rules.breaks_word(ch) {
            break;
        }
        word.push(ch);
        cursor.read()?;
    }
    Ok(word)
}
