//! Ordered operand collections.
//!
//! An [`OperandList`] gathers every operand contributed to one
//! operator/base-key pair, in layer order. It is kept distinct from JSON
//! arrays so an array-valued operand is never confused with a collection of
//! operands.

use std::ops::Deref;

use serde_json::Value;

/// Ordered operands for a single operator at a single base key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperandList(Vec<Value>);

impl OperandList {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Operands carried by a key: foreach keys spread their array, other keys
    /// contribute their value as a single operand.
    pub(crate) fn from_key_value(value: &Value, foreach: bool) -> Self {
        match value {
            Value::Array(items) if foreach => Self(items.clone()),
            other => Self(vec![other.clone()]),
        }
    }

    /// Append an operand.
    pub fn push(&mut self, operand: Value) {
        self.0.push(operand);
    }

    /// Append every operand of `other`, keeping order.
    pub fn append(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Drop all operands, marking them as consumed.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Keep only the first `len` operands.
    pub fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    /// Replace every operand with a single equivalent operand.
    pub fn replace_with(&mut self, operand: Value) {
        self.0.clear();
        self.0.push(operand);
    }

    /// Consume the list, returning the operands.
    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }
}

impl Deref for OperandList {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Value>> for OperandList {
    fn from(operands: Vec<Value>) -> Self {
        Self(operands)
    }
}

impl FromIterator<Value> for OperandList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for OperandList {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a OperandList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
