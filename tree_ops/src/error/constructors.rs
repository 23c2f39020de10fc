//! Constructors for `TreeOpsError`.

use serde_json::Value;

use super::TreeOpsError;

impl TreeOpsError {
    /// Construct a [`TreeOpsError::NotATree`] describing `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use tree_ops::TreeOpsError;
    /// let e = TreeOpsError::not_a_tree("armour", &json!([1, 2]));
    /// assert!(matches!(e, TreeOpsError::NotATree { found: "array", .. }));
    /// ```
    #[must_use]
    pub fn not_a_tree(layer: impl Into<String>, value: &Value) -> Self {
        Self::NotATree {
            layer: layer.into(),
            found: value_kind(value),
        }
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "tree",
    }
}
