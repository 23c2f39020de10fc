//! Operator registry and the priority calculus.
//!
//! Built-in operators are always available. Custom operators are registered
//! by name on an [`OperatorRegistry`] and become usable through the
//! `(name)key` / `(#name)key` syntax. The registry is plain data owned by the
//! caller, so independent engines never observe each other's registrations.

mod builtin;
mod number;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{TreeOpsError, TreeOpsResult};
use crate::key::{FOREACH_MARKER, OperatorKind};
use crate::operand::OperandList;

pub use number::number_value;

/// Priority anchoring every center operator.
pub const CENTER_PRIORITY: i64 = 0;

/// Distance between successive combine levels.
pub const COMBINE_PRIORITY_STEP: i64 = 1000;

/// Reduce function of a custom operator.
///
/// Receives the value accumulated so far (if any) and the operands
/// contributed to the key. It returns the new accumulated value and may
/// consume operands by truncating the list; whatever it leaves behind stays
/// in the reduced tree under the operator key.
pub type ReduceFn = Arc<dyn Fn(Option<Value>, &mut OperandList) -> Option<Value> + Send + Sync>;

/// A user-defined operator.
#[derive(Clone)]
pub struct CustomOperator {
    priority: i64,
    reduce: ReduceFn,
}

impl CustomOperator {
    /// Create an operator applied at `priority` with `reduce`.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::Value;
    /// use tree_ops::{CustomOperator, number_value};
    ///
    /// // `(max)key`: keep the largest of the existing value and the operands.
    /// let max = CustomOperator::new(10, |existing, operands| {
    ///     let best = existing
    ///         .iter()
    ///         .chain(operands.iter())
    ///         .filter_map(Value::as_f64)
    ///         .reduce(f64::max);
    ///     operands.clear();
    ///     best.map(number_value).or(existing)
    /// });
    /// assert_eq!(max.priority(), 10);
    /// ```
    pub fn new<F>(priority: i64, reduce: F) -> Self
    where
        F: Fn(Option<Value>, &mut OperandList) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            priority,
            reduce: Arc::new(reduce),
        }
    }

    /// Priority relative to [`CENTER_PRIORITY`].
    #[must_use]
    pub const fn priority(&self) -> i64 {
        self.priority
    }

    /// Run the reduce function.
    pub fn apply(&self, existing: Option<Value>, operands: &mut OperandList) -> Option<Value> {
        (self.reduce)(existing, operands)
    }
}

impl fmt::Debug for CustomOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomOperator")
            .field("priority", &self.priority)
            .field("reduce", &"<fn>")
            .finish()
    }
}

/// Position of an operator in the application order at one key.
///
/// The rank only separates the built-in center operators from each other:
/// multiplication before addition before concatenation. Every other
/// operator has rank zero and is placed by priority and declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ApplyOrder {
    priority: i64,
    rank: u8,
}

impl ApplyOrder {
    pub(crate) const fn priority(self) -> i64 {
        self.priority
    }

    pub(crate) const fn rank(self) -> u8 {
        self.rank
    }
}

/// Table of custom operators.
#[derive(Clone, Debug, Default)]
pub struct OperatorRegistry {
    custom: HashMap<String, CustomOperator>,
}

impl OperatorRegistry {
    /// Create a registry holding only the built-in operators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the operator `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeOpsError::InvalidOperatorName`] when `name` cannot be
    /// written inside a `(name)` marker.
    pub fn register(&mut self, name: impl Into<String>, operator: CustomOperator) -> TreeOpsResult<()> {
        let name = name.into();
        validate_name(&name)?;
        if self.custom.insert(name.clone(), operator).is_some() {
            tracing::debug!(name = %name, "replaced custom operator");
        } else {
            tracing::debug!(name = %name, "registered custom operator");
        }
        Ok(())
    }

    /// Register several operators at once.
    ///
    /// Nothing is registered unless every name is valid.
    ///
    /// # Errors
    ///
    /// Returns the invalid-name error, aggregated when several names are
    /// rejected.
    pub fn extend<I, N>(&mut self, operators: I) -> TreeOpsResult<()>
    where
        I: IntoIterator<Item = (N, CustomOperator)>,
        N: Into<String>,
    {
        let operators: Vec<(String, CustomOperator)> = operators
            .into_iter()
            .map(|(name, operator)| (name.into(), operator))
            .collect();
        let errors = operators
            .iter()
            .filter_map(|(name, _)| validate_name(name).err());
        if let Some(err) = TreeOpsError::try_aggregate(errors) {
            return Err(err);
        }
        for (name, operator) in operators {
            self.register(name, operator)?;
        }
        Ok(())
    }

    /// Whether `name` is a registered custom operator.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.custom.contains_key(name)
    }

    /// Look up a custom operator.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CustomOperator> {
        self.custom.get(name)
    }

    /// Numeric priority of `kind`.
    ///
    /// Combine operators sit at `±1000·level`; every other built-in sits at
    /// the center. Unknown custom names fall back to the center.
    #[must_use]
    pub fn priority(&self, kind: &OperatorKind) -> i64 {
        match kind {
            OperatorKind::CombineBefore(level) => -COMBINE_PRIORITY_STEP * i64::from(*level),
            OperatorKind::CombineAfter(level) => COMBINE_PRIORITY_STEP * i64::from(*level),
            OperatorKind::Custom(name) => self
                .get(name)
                .map_or(CENTER_PRIORITY, CustomOperator::priority),
            _ => CENTER_PRIORITY,
        }
    }

    pub(crate) fn apply_order(&self, kind: &OperatorKind) -> ApplyOrder {
        let rank = match kind {
            OperatorKind::Multiply => 1,
            OperatorKind::Add => 2,
            OperatorKind::ConcatBefore => 3,
            OperatorKind::ConcatAfter => 4,
            OperatorKind::Assign
            | OperatorKind::CombineBefore(_)
            | OperatorKind::CombineAfter(_)
            | OperatorKind::Custom(_) => 0,
        };
        ApplyOrder {
            priority: self.priority(kind),
            rank,
        }
    }

    /// Apply a center operator. Combine operators are structural and are
    /// handled by the reducer, so they leave `existing` untouched here.
    pub(crate) fn apply(
        &self,
        kind: &OperatorKind,
        existing: Option<Value>,
        operands: &mut OperandList,
    ) -> Option<Value> {
        match kind {
            OperatorKind::Assign => builtin::assign(existing, operands),
            OperatorKind::Add => builtin::add(existing, operands),
            OperatorKind::Multiply => builtin::multiply(existing, operands),
            OperatorKind::ConcatBefore => builtin::concat_before(existing, operands),
            OperatorKind::ConcatAfter => builtin::concat_after(existing, operands),
            OperatorKind::Custom(name) => match self.get(name) {
                Some(operator) => operator.apply(existing, operands),
                None => existing,
            },
            OperatorKind::CombineBefore(_) | OperatorKind::CombineAfter(_) => existing,
        }
    }
}

fn validate_name(name: &str) -> TreeOpsResult<()> {
    let reason = if name.is_empty() {
        "name must not be empty"
    } else if name.contains(['(', ')']) {
        "name must not contain parentheses"
    } else if name.contains(FOREACH_MARKER) {
        "name must not contain '#'"
    } else {
        return Ok(());
    };
    Err(TreeOpsError::InvalidOperatorName {
        name: name.to_owned(),
        reason,
    })
}

#[cfg(test)]
mod tests;
