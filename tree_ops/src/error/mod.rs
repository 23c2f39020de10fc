//! Error types surfaced by the tree-ops engine.
//!
//! Stacking and reduction never fail; errors only arise at the edges, when an
//! operator registration is malformed or an untyped layer is not a tree.

mod aggregate;
mod constructors;
mod types;

pub use aggregate::AggregatedErrors;
pub use types::{TreeOpsError, TreeOpsResult};
