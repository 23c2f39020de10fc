//! Stacking: combine layers into one annotated tree without applying any
//! operator.
//!
//! Contributions are grouped by operator and base key. A pair seen once keeps
//! its original key and value; a pair contributed more than once becomes a
//! foreach collection (`#+hp`, `#hp`, `(#pow)a`, …) holding every operand in
//! layer order. Plain and operator keys on the same base key never collide
//! with each other: they are kept side by side for the reducer.

use indexmap::IndexMap;
use serde_json::Value;

use crate::Tree;
use crate::key::{KeyDescriptor, OperatorKind, parse_key};
use crate::operand::OperandList;
use crate::operators::OperatorRegistry;

/// How plain tree values meeting at the same key are treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StackMode {
    /// Colliding plain trees become a foreach collection like any value.
    Shallow,
    /// Colliding plain trees are stacked recursively; combine operators
    /// merge patches this way.
    Deep,
}

/// Stack `layers` (leftmost first) into one annotated tree.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tree_ops::{OperatorRegistry, Tree, stack_layers};
///
/// let tree = |value: serde_json::Value| -> Tree {
///     value.as_object().cloned().unwrap_or_default()
/// };
/// let layers = [tree(json!({"+hp": 1})), tree(json!({"+hp": 2})), tree(json!({"+hp": 3}))];
/// let stacked = stack_layers(&layers, &OperatorRegistry::new());
/// assert_eq!(serde_json::Value::Object(stacked), json!({"#+hp": [1, 2, 3]}));
/// ```
#[must_use]
pub fn stack_layers<'t, I>(layers: I, registry: &OperatorRegistry) -> Tree
where
    I: IntoIterator<Item = &'t Tree>,
{
    stack_with(layers, registry, StackMode::Shallow)
}

pub(crate) fn stack_with<'t, I>(layers: I, registry: &OperatorRegistry, mode: StackMode) -> Tree
where
    I: IntoIterator<Item = &'t Tree>,
{
    let mut accumulator = Accumulator::default();
    let mut count = 0_usize;
    for layer in layers {
        count += 1;
        for (raw, value) in layer {
            accumulator.contribute(raw, value, registry, mode);
        }
    }
    let tree = accumulator.into_tree(registry);
    tracing::trace!(layers = count, keys = tree.len(), ?mode, "stacked layers");
    tree
}

/// Slots keyed by operator and base key, in first-seen order.
#[derive(Default)]
struct Accumulator {
    slots: IndexMap<(OperatorKind, String), Slot>,
}

struct Slot {
    assign: bool,
    state: SlotState,
}

enum SlotState {
    /// Contributed once: emitted verbatim.
    Single {
        raw_key: String,
        value: Value,
        foreach: bool,
    },
    /// Contributed several times: emitted as a foreach collection.
    Collection(OperandList),
}

impl Accumulator {
    fn contribute(&mut self, raw: &str, value: &Value, registry: &OperatorRegistry, mode: StackMode) {
        let key = parse_key(raw, registry);
        let foreach = key.is_foreach();
        let identity = key.into_parts();

        if let Some(slot) = self.slots.get_mut(&identity) {
            slot.absorb(value, foreach, registry, mode);
            return;
        }
        let assign = identity.0.is_assign();
        self.slots.insert(
            identity,
            Slot {
                assign,
                state: SlotState::Single {
                    raw_key: raw.to_owned(),
                    value: value.clone(),
                    foreach,
                },
            },
        );
    }

    fn into_tree(self, registry: &OperatorRegistry) -> Tree {
        let mut tree = Tree::new();
        for ((operator, base_key), slot) in self.slots {
            match slot.state {
                SlotState::Single { raw_key, value, .. } => {
                    tree.insert(raw_key, value);
                }
                SlotState::Collection(operands) => {
                    let key = KeyDescriptor::new(operator, base_key).with_foreach(true);
                    tree.insert(key.encode_with(registry), Value::Array(operands.into_vec()));
                }
            }
        }
        tree
    }
}

impl Slot {
    fn absorb(&mut self, value: &Value, foreach: bool, registry: &OperatorRegistry, mode: StackMode) {
        let incoming = OperandList::from_key_value(value, foreach);
        match &mut self.state {
            SlotState::Single {
                value: Value::Object(current),
                foreach: false,
                ..
            } if mode == StackMode::Deep && self.assign && !foreach => {
                if let Value::Object(patch) = value {
                    let merged = stack_with([&*current, patch], registry, mode);
                    *current = merged;
                } else {
                    let mut operands = OperandList::from(vec![Value::Object(std::mem::take(current))]);
                    operands.append(incoming);
                    self.state = SlotState::Collection(operands);
                }
            }
            SlotState::Single {
                value: current,
                foreach: current_foreach,
                ..
            } => {
                let mut operands = OperandList::from_key_value(current, *current_foreach);
                operands.append(incoming);
                self.state = SlotState::Collection(operands);
            }
            SlotState::Collection(operands) => operands.append(incoming),
        }
    }
}
