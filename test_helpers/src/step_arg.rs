//! Decoding of placeholder captures in `.feature` steps.
//!
//! Step text wraps JSON in single quotes (`a layer '{"+hp": 1}'`) and names
//! in double quotes (`the operator "pow"`), so a capture arrives with its
//! delimiters still attached.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use tree_ops_test_helpers::step_arg::{json, name};
//!
//! assert_eq!(name(r#" "pow" "#), "pow");
//! assert_eq!(json(r#"'{"+hp": 1}'"#)?, json!({"+hp": 1}));
//! # Ok::<_, anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use serde_json::Value;

const DELIMITERS: [char; 2] = ['\'', '"'];

/// The capture without surrounding whitespace or its quote delimiters.
///
/// Only a matching pair is removed, so `'a"` is returned as written.
#[must_use]
pub fn name(capture: &str) -> &str {
    let trimmed = capture.trim();
    DELIMITERS
        .iter()
        .find_map(|quote| trimmed.strip_prefix(*quote)?.strip_suffix(*quote))
        .unwrap_or(trimmed)
}

/// Parses a quoted JSON capture, keeping key order.
///
/// # Errors
///
/// Returns an error naming the capture when it is not valid JSON.
pub fn json(capture: &str) -> Result<Value> {
    let text = name(capture);
    serde_json::from_str(text).with_context(|| format!("step argument is not JSON: {text}"))
}
