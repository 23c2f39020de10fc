//! Several [`TreeOpsError`]s reported together.

use std::{error::Error, fmt};

use super::TreeOpsError;

/// Every error found in one pass over layers or operator names, in input
/// order.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tree_ops::{TreeOps, TreeOpsError};
///
/// let err = TreeOps::new()
///     .reduce_values(&[json!([1]), json!("text")])
///     .expect_err("neither layer is a tree");
/// let TreeOpsError::Aggregate(agg) = err else {
///     panic!("two failures are aggregated");
/// };
/// assert_eq!(agg.errors().len(), 2);
/// ```
#[derive(Debug)]
pub struct AggregatedErrors {
    errors: Vec<TreeOpsError>,
}

impl AggregatedErrors {
    /// The collected errors.
    #[must_use]
    pub fn errors(&self) -> &[TreeOpsError] {
        &self.errors
    }
}

impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = self.errors.iter();
        if let Some(first) = lines.next() {
            write!(f, "  - {first}")?;
        }
        lines.try_for_each(|err| write!(f, "\n  - {err}"))
    }
}

impl Error for AggregatedErrors {}

impl TreeOpsError {
    /// Combine the errors of one pass into a single error.
    ///
    /// Returns `None` when there are none and the error itself when there is
    /// exactly one; anything more becomes [`Self::Aggregate`].
    #[must_use]
    pub fn try_aggregate<I>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let mut errors: Vec<Self> = errors.into_iter().collect();
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Aggregate(Box::new(AggregatedErrors { errors }))),
        }
    }
}
