//! Case-comparison policy.
//!
//! Every rule table and the matcher share one `CaseMode`. Keys are stored in
//! folded form and every lookup folds its probe the same way, so the
//! comparison rule lives in exactly one place.

use std::borrow::Cow;

/// How characters are compared when matching rules against input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseMode {
    /// Characters must match exactly.
    #[default]
    Sensitive,
    /// Characters match if their simple uppercase mappings are equal.
    Insensitive,
}

impl CaseMode {
    /// Build a case mode from an "ignore case" flag.
    #[inline]
    pub fn from_ignore_case(ignore_case: bool) -> Self {
        if ignore_case {
            CaseMode::Insensitive
        } else {
            CaseMode::Sensitive
        }
    }

    #[inline]
    pub fn is_insensitive(self) -> bool {
        self == CaseMode::Insensitive
    }

    /// Fold a character to its comparison form.
    ///
    /// Characters whose uppercase mapping expands to several characters
    /// (`ß` → `SS`) are left as they are.
    #[inline]
    pub fn fold_char(self, ch: char) -> char {
        match self {
            CaseMode::Sensitive => ch,
            CaseMode::Insensitive => {
                let mut upper = ch.to_uppercase();
                match (upper.next(), upper.next()) {
                    (Some(single), None) => single,
                    _ => ch,
                }
            }
        }
    }

    /// Fold every character of a string.
    pub fn fold_str(self, text: &str) -> Cow<'_, str> {
        match self {
            CaseMode::Sensitive => Cow::Borrowed(text),
            CaseMode::Insensitive => Cow::Owned(text.chars().map(|c| self.fold_char(c)).collect()),
        }
    }

    #[inline]
    pub fn eq_char(self, a: char, b: char) -> bool {
        a == b || self.fold_char(a) == self.fold_char(b)
    }

    pub fn eq_str(self, a: &str, b: &str) -> bool {
        let mut lhs = a.chars();
        let mut rhs = b.chars();
        loop {
            match (lhs.next(), rhs.next()) {
                (Some(x), Some(y)) if self.eq_char(x, y) => continue,
                (None, None) => return true,
                _ => return false,
            }
        }
    }
}
