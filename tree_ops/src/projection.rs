//! Projection of annotated trees onto plain trees.

use serde_json::Value;

use crate::Tree;
use crate::key::parse_key;
use crate::operators::OperatorRegistry;

/// Strip every operator-bearing key from `tree` without applying it.
///
/// Plain keys are kept with their literal escape removed; nested trees are
/// projected recursively. Foreach collections, including plain ones such as
/// `#hp`, are pending operations and are dropped.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tree_ops::{OperatorRegistry, project_tree};
///
/// let layer = json!({"hp": 8, "+hp": 2, "()*.kfg": "*.gz", "stats": {"*speed": 2, "speed": 3}});
/// let tree = layer.as_object().expect("layer is a tree");
/// let plain = project_tree(tree, &OperatorRegistry::new());
/// assert_eq!(
///     serde_json::Value::Object(plain),
///     json!({"hp": 8, "*.kfg": "*.gz", "stats": {"speed": 3}})
/// );
/// ```
#[must_use]
pub fn project_tree(tree: &Tree, registry: &OperatorRegistry) -> Tree {
    tree.iter()
        .filter_map(|(raw, value)| {
            let key = parse_key(raw, registry);
            if !key.is_plain() {
                return None;
            }
            let value = match value {
                Value::Object(inner) => Value::Object(project_tree(inner, registry)),
                other => other.clone(),
            };
            let (_, base_key) = key.into_parts();
            Some((base_key, value))
        })
        .collect()
}
