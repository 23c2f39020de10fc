//! Operator-key overlays for layered JSON-like trees.
//!
//! A layer is a JSON object whose keys may carry operator markers: `+hp`
//! adds to `hp`, `*defense` multiplies it, `*>stats` merges a patch tree on
//! top of `stats`, and so on. [`stack`] combines several layers into one
//! annotated tree without applying anything; [`reduce`] applies every
//! operator and yields a plain tree.
//!
//! ```rust
//! use serde_json::{Value, json};
//! use tree_ops::{Tree, reduce};
//!
//! fn tree(value: Value) -> Tree {
//!     match value {
//!         Value::Object(map) => map,
//!         _ => Tree::new(),
//!     }
//! }
//!
//! let creature = tree(json!({"hp": 8, "defense": 3, "+defense": 3}));
//! let amulet = tree(json!({"+defense": 1, "+hp": 1}));
//! let reduced = reduce([&creature, &amulet]);
//! assert_eq!(Value::Object(reduced), json!({"hp": 9, "defense": 7}));
//! ```
//!
//! The free functions use the built-in operators only. Custom operators are
//! registered on a [`TreeOps`] engine and are visible to that engine alone.

mod engine;
mod error;
mod key;
mod layer;
mod operand;
mod operators;
mod projection;
mod reduce;
mod stack;

pub use engine::TreeOps;
pub use error::{AggregatedErrors, TreeOpsError, TreeOpsResult};
pub use key::{FOREACH_MARKER, KeyDescriptor, LITERAL_ESCAPE, OperatorKind, parse_key};
pub use layer::{Layer, LayerComposer, LayerComposition};
pub use operand::OperandList;
pub use operators::{
    CENTER_PRIORITY, COMBINE_PRIORITY_STEP, CustomOperator, OperatorRegistry, ReduceFn,
    number_value,
};
pub use projection::project_tree;
pub use reduce::reduce_tree;
pub use stack::stack_layers;

/// A layer or result: an ordered JSON object.
pub type Tree = serde_json::Map<String, serde_json::Value>;

/// Stack `layers` with the built-in operators.
#[must_use]
pub fn stack<'t, I>(layers: I) -> Tree
where
    I: IntoIterator<Item = &'t Tree>,
{
    stack_layers(layers, &OperatorRegistry::new())
}

/// Stack and reduce `layers` with the built-in operators.
#[must_use]
pub fn reduce<'t, I>(layers: I) -> Tree
where
    I: IntoIterator<Item = &'t Tree>,
{
    TreeOps::new().reduce(layers)
}

/// Drop every operator key of `tree` without applying it.
#[must_use]
pub fn to_object(tree: &Tree) -> Tree {
    project_tree(tree, &OperatorRegistry::new())
}

/// Reduce `layers`, then drop leftover operator keys and literal escapes.
#[must_use]
pub fn reduce_to_object<'t, I>(layers: I) -> Tree
where
    I: IntoIterator<Item = &'t Tree>,
{
    TreeOps::new().reduce_to_object(layers)
}
