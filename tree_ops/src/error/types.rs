//! Primary error enum for operator registration and layer validation.

use thiserror::Error;

use super::AggregatedErrors;

/// Convenience alias for results produced by this crate.
pub type TreeOpsResult<T> = Result<T, TreeOpsError>;

/// Errors that can occur while configuring the engine or validating layers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TreeOpsError {
    /// A custom operator name cannot be expressed in the `(name)key` syntax.
    #[error("invalid operator name '{name}': {reason}")]
    InvalidOperatorName {
        /// Name supplied at registration.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// A layer handed over as an untyped value was not a tree.
    #[error("layer {layer} is not a tree (found {found})")]
    NotATree {
        /// Label or position of the offending layer.
        layer: String,
        /// JSON type name of the value that was supplied instead.
        found: &'static str,
    },

    /// Several errors were found in one pass.
    #[error("{count} errors:\n{errs}", count = .0.errors().len(), errs = .0)]
    Aggregate(Box<AggregatedErrors>),
}
