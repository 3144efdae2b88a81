//! lexis_core: Core utilities shared by the lexis crates.
//!
//! Provides the case-comparison policy, source positions and spans, the
//! insertion-ordered map used by rule tables, and string interning for
//! token kinds defined at runtime.

pub mod case;
pub mod collections;
pub mod intern;
pub mod text;

// Re-export commonly used types
pub use case::CaseMode;
pub use collections::{FxHashMap, FxHashSet, OrderedMap};
pub use intern::{InternedString, StringInterner};
pub use text::{SourcePosition, TextPos, TextSpan};
