//! Builders for [`Tree`] fixtures.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use tree_ops_test_helpers::tree::tree;
//!
//! let layer = tree(json!({"+hp": 1}));
//! assert_eq!(layer.len(), 1);
//! ```

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

/// An ordered JSON object, the shape of every layer.
pub type Tree = Map<String, Value>;

/// Unwraps a `json!` object literal into a tree.
///
/// # Panics
///
/// Panics when `value` is not a JSON object; fixtures are expected to be
/// written as object literals.
#[must_use]
#[track_caller]
pub fn tree(value: Value) -> Tree {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture is not a JSON object: {other}"),
    }
}

/// Parses JSON text into a tree, keeping key order.
///
/// # Errors
///
/// Returns an error when `text` is not valid JSON or is not an object.
pub fn parse_tree(text: &str) -> Result<Tree> {
    let value: Value =
        serde_json::from_str(text.trim()).with_context(|| format!("parse JSON fixture: {text}"))?;
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("expected a JSON object, found {other}"),
    }
}
