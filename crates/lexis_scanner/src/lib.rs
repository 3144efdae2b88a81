//! lexis_scanner: A rule-configurable lexical scanner.
//!
//! A `Scanner` reads characters from any `std::io::Read` source and
//! classifies them using rules registered at runtime:
//! - delimited blocks (comments and similar)
//! - literal symbols and keywords with fixed values
//! - single-character and tail-character tokens
//! - quoted strings with backslash pass-through
//! - integer, decimal and scientific numeric literals
//!
//! Input is decoded incrementally and never materialized in full.

mod char_codes;
pub mod cursor;
mod error;
pub mod matcher;
pub mod readers;
mod rules;
mod scanner;
mod token;
mod value;

pub use cursor::CharCursor;
pub use error::{RuleError, ScanError};
pub use lexis_core::CaseMode;
pub use rules::{BlockRule, FixedRule, RuleRegistry};
pub use rust_decimal::Decimal;
pub use scanner::{Scanner, Sentinels};
pub use token::{Token, TokenFlags};
pub use value::{TokenValue, ValueError};
