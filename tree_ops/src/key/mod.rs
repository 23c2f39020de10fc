//! Operator-key grammar.
//!
//! Every key in a layer may carry an operator marker in front of its base
//! name. The codec turns raw key strings into [`KeyDescriptor`] values and
//! back again:
//!
//! ```text
//! key    := "()" anything                  ; literal escape
//!         | "#"? marker? base_key
//! marker := "<<*" | "<*" | "*>>" | "*>"    ; combine before/after
//!         | "<+" | "+>"                    ; concat before/after
//!         | "+" | "*"                      ; add / multiply
//!         | "(" "#"? name ")"              ; registered custom operator
//! ```
//!
//! Parsing never fails. Anything that does not match a marker, including a
//! custom name that has not been registered, is a plain key.

mod encode;
mod parse;

use std::fmt;

pub use parse::parse_key;

/// Prefix that suppresses operator parsing for the rest of the key.
pub const LITERAL_ESCAPE: &str = "()";

/// Prefix marking a key whose value is an ordered operand collection.
pub const FOREACH_MARKER: char = '#';

/// Operator carried by a key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum OperatorKind {
    /// Plain key: the last operand overwrites the existing value.
    Assign,
    /// `+key`: numeric addition.
    Add,
    /// `*key`: numeric multiplication, applied before additions.
    Multiply,
    /// `<+key`: prepend array operands.
    ConcatBefore,
    /// `+>key`: append array operands.
    ConcatAfter,
    /// `<*key`, `<<*key`, …: merge a patch tree beneath the current value.
    CombineBefore(u32),
    /// `*>key`, `*>>key`, …: merge a patch tree above the current value.
    CombineAfter(u32),
    /// `(name)key`: operator registered at runtime.
    Custom(String),
}

impl OperatorKind {
    /// Whether this operator merges patch trees structurally.
    #[must_use]
    pub const fn is_combine(&self) -> bool {
        matches!(self, Self::CombineBefore(_) | Self::CombineAfter(_))
    }

    /// Whether this is the plain overwrite operator.
    #[must_use]
    pub const fn is_assign(&self) -> bool {
        matches!(self, Self::Assign)
    }
}

/// Structured view of a raw key string.
///
/// The descriptor is derived from the key, never stored in the tree. Two
/// keys contribute to the same collection when both their operator and base
/// key agree; the foreach flag and literal escape do not take part in that
/// identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyDescriptor {
    base_key: String,
    operator: OperatorKind,
    foreach: bool,
    literal: bool,
}

impl KeyDescriptor {
    /// Build a descriptor for `operator` applied to `base_key`.
    #[must_use]
    pub fn new(operator: OperatorKind, base_key: impl Into<String>) -> Self {
        Self {
            base_key: base_key.into(),
            operator,
            foreach: false,
            literal: false,
        }
    }

    /// Build a plain (assign) descriptor.
    #[must_use]
    pub fn plain(base_key: impl Into<String>) -> Self {
        Self::new(OperatorKind::Assign, base_key)
    }

    pub(crate) fn literal(base_key: impl Into<String>, foreach: bool) -> Self {
        Self {
            literal: true,
            ..Self::plain(base_key).with_foreach(foreach)
        }
    }

    /// Returns a copy with the foreach flag set to `foreach`.
    #[must_use]
    pub fn with_foreach(self, foreach: bool) -> Self {
        Self { foreach, ..self }
    }

    /// The key identity other layers must match to collide.
    #[must_use]
    pub fn base_key(&self) -> &str {
        &self.base_key
    }

    /// Operator carried by the key.
    #[must_use]
    pub const fn operator(&self) -> &OperatorKind {
        &self.operator
    }

    /// Whether the value is an ordered collection of operands.
    #[must_use]
    pub const fn is_foreach(&self) -> bool {
        self.foreach
    }

    /// Whether the raw key carried the `()` literal escape.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        self.literal
    }

    /// Whether the key is a plain, non-collection key.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        self.operator.is_assign() && !self.foreach
    }

    /// Whether a combine operator targets the enclosing tree itself.
    #[must_use]
    pub fn targets_root(&self) -> bool {
        self.operator.is_combine() && self.base_key.is_empty()
    }

    /// Split the descriptor into its operator and base key.
    #[must_use]
    pub fn into_parts(self) -> (OperatorKind, String) {
        (self.operator, self.base_key)
    }
}

impl fmt::Display for KeyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
