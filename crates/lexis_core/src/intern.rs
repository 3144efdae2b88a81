//! String interning for token kinds.
//!
//! Rule files name their token kinds with strings. Interning them gives the
//! scanner a `Copy` kind type with O(1) comparison.

use lasso::{Key, Spur, ThreadedRodeo};
use std::fmt;
use std::sync::Arc;

/// A token kind handle. Only meaningful together with the interner that
/// produced it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct InternedString(Spur);

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0.into_usize())
    }
}

/// Shared kind-name table. Clones share storage, so a ruleset and the
/// scanners built from it resolve the same handles.
#[derive(Clone)]
pub struct StringInterner {
    rodeo: Arc<ThreadedRodeo>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self {
            rodeo: Arc::new(ThreadedRodeo::new()),
        }
    }

    pub fn intern(&self, name: &str) -> InternedString {
        InternedString(self.rodeo.get_or_intern(name))
    }

    /// The handle for `name` if it was interned before.
    pub fn get(&self, name: &str) -> Option<InternedString> {
        self.rodeo.get(name).map(InternedString)
    }

    pub fn resolve(&self, kind: InternedString) -> &str {
        self.rodeo.resolve(&kind.0)
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.rodeo.strings())
            .finish()
    }
}
