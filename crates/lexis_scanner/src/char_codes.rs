//! Character constants and classification helpers used by the scanner.

pub const SPACE: char = ' ';
pub const TAB: char = '\t';
pub const LINE_FEED: char = '\n';
pub const CARRIAGE_RETURN: char = '\r';

pub const SINGLE_QUOTE: char = '\'';
pub const DOUBLE_QUOTE: char = '"';
pub const BACKSLASH: char = '\\';

pub const PLUS: char = '+';
pub const MINUS: char = '-';
pub const DOT: char = '.';
pub const E_LOWER: char = 'e';
pub const E_UPPER: char = 'E';

/// Characters skipped between tokens unless reconfigured.
pub const DEFAULT_IGNORE_CHARS: [char; 4] = [SPACE, TAB, CARRIAGE_RETURN, LINE_FEED];

/// Characters that open (and close) a quoted string unless reconfigured.
pub const DEFAULT_STRING_START_CHARS: [char; 2] = [SINGLE_QUOTE, DOUBLE_QUOTE];

/// Check if a character is a decimal digit.
#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub fn is_sign(ch: char) -> bool {
    ch == PLUS || ch == MINUS
}

#[inline]
pub fn is_exponent_marker(ch: char) -> bool {
    ch == E_LOWER || ch == E_UPPER
}

/// Number of bytes in a UTF-8 sequence starting with `lead`, or 0 if `lead`
/// cannot start a sequence.
#[inline]
pub fn utf8_sequence_length(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}
