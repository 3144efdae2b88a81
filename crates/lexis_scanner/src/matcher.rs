//! Multi-character lookahead matching with rollback.

use crate::cursor::CharCursor;
use crate::error::ScanError;
use lexis_core::CaseMode;
use std::io::Read;

/// Check whether `text` starts at the cursor's position.
///
/// Characters needed for the comparison are pulled into the cursor's
/// lookahead buffer. On a mismatch nothing is consumed and the buffered
/// characters stay buffered. On a match the characters are consumed only
/// when `consume` is set. Empty text never matches.
pub fn try_match<R: Read>(
    cursor: &mut CharCursor<R>,
    text: &str,
    case: CaseMode,
    consume: bool,
) -> Result<bool, ScanError> {
    if text.is_empty() {
        return Ok(false);
    }
    for (index, expected) in text.chars().enumerate() {
        match cursor.peek_nth(index)? {
            Some(actual) if case.eq_char(actual, expected) => {}
            _ => return Ok(false),
        }
    }
    if consume {
        for _ in text.chars() {
            cursor.read()?;
        }
    }
    Ok(true)
}

/// Try each candidate in order and return the index of the first match.
pub fn try_match_any<R: Read>(
    cursor: &mut CharCursor<R>,
    candidates: &[&str],
    case: CaseMode,
    consume: bool,
) -> Result<Option<usize>, ScanError> {
    for (index, text) in candidates.iter().enumerate() {
        if try_match(cursor, text, case, consume)? {
            return Ok(Some(index));
        }
    }
    Ok(None)
}
