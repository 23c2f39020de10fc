//! Reduction: apply every operator of an annotated tree and produce a plain
//! tree.
//!
//! Each level is processed per base key:
//!
//! 1. The plain value, if any, seeds the fold and is reduced when it is a
//!    tree.
//! 2. Combine-before patches are laid beneath it, from the center outwards
//!    (`<*` before `<<*`).
//! 3. Every other entry runs in ascending priority: built-in center
//!    operators at the center (multiplication before addition), combine-after
//!    patches at `1000·level`, custom operators at their registered priority.
//!    Ties are broken by declaration order.
//!
//! Root-targeted combine operators (`*>`, `<*`, … with an empty base key)
//! run last, once every child key of the level is fully reduced.

mod combine;

use indexmap::IndexMap;
use serde_json::Value;

use crate::Tree;
use crate::key::{KeyDescriptor, OperatorKind, parse_key};
use crate::operand::OperandList;
use crate::operators::{ApplyOrder, OperatorRegistry};

/// Reduce an annotated tree into a plain tree.
///
/// Operands an operator could not consume (for example `+magic` with no
/// `magic` value to add to) remain in the output under their operator key.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tree_ops::{OperatorRegistry, reduce_tree};
///
/// let layer = json!({"defense": 3, "*defense": 2, "#+defense": [1, 3], "+magic": 1});
/// let tree = layer.as_object().expect("layer is a tree");
/// let reduced = reduce_tree(tree, &OperatorRegistry::new());
/// assert_eq!(
///     serde_json::Value::Object(reduced),
///     json!({"defense": 10, "+magic": 1})
/// );
/// ```
#[must_use]
pub fn reduce_tree(tree: &Tree, registry: &OperatorRegistry) -> Tree {
    let Level {
        targets,
        root_combine,
    } = Level::collect(tree, registry);

    let mut reduced = Tree::new();
    for (base_key, target) in targets {
        target.reduce_into(&base_key, &mut reduced, registry);
    }

    if root_combine.is_empty() {
        reduced
    } else {
        combine::apply_to_root(reduced, root_combine, registry)
    }
}

/// One operator and its operands at a single base key.
struct Entry {
    operator: OperatorKind,
    operands: OperandList,
    order: ApplyOrder,
    position: usize,
}

/// Every entry targeting one base key.
#[derive(Default)]
struct Target {
    entries: Vec<Entry>,
}

#[derive(Default)]
struct Level {
    targets: IndexMap<String, Target>,
    root_combine: Vec<Entry>,
}

impl Level {
    fn collect(tree: &Tree, registry: &OperatorRegistry) -> Self {
        let mut level = Self::default();
        for (position, (raw, value)) in tree.iter().enumerate() {
            let key = parse_key(raw, registry);
            let operands = OperandList::from_key_value(value, key.is_foreach());
            let targets_root = key.targets_root();
            let (operator, base_key) = key.into_parts();

            let bucket = if targets_root {
                &mut level.root_combine
            } else {
                &mut level.targets.entry(base_key).or_default().entries
            };
            push_entry(bucket, operator, operands, position, registry);
        }
        level
    }
}

/// Add operands to the bucket, joining an existing entry for the same
/// operator so `+a` and `#+a` in one tree form a single collection.
fn push_entry(
    bucket: &mut Vec<Entry>,
    operator: OperatorKind,
    operands: OperandList,
    position: usize,
    registry: &OperatorRegistry,
) {
    if let Some(entry) = bucket.iter_mut().find(|entry| entry.operator == operator) {
        entry.operands.append(operands);
        return;
    }
    bucket.push(Entry {
        order: registry.apply_order(&operator),
        operator,
        operands,
        position,
    });
}

/// Entries of one target split by the phase that applies them.
struct Phases {
    plain: Option<Entry>,
    before: Vec<Entry>,
    ordered: Vec<Entry>,
}

impl Target {
    fn into_phases(self) -> Phases {
        let mut phases = Phases {
            plain: None,
            before: Vec::new(),
            ordered: Vec::new(),
        };
        for entry in self.entries {
            match entry.operator {
                OperatorKind::Assign => phases.plain = Some(entry),
                OperatorKind::CombineBefore(_) => phases.before.push(entry),
                _ => phases.ordered.push(entry),
            }
        }
        phases
    }

    fn reduce_into(self, base_key: &str, reduced: &mut Tree, registry: &OperatorRegistry) {
        let Phases {
            plain,
            before,
            mut ordered,
        } = self.into_phases();

        let mut value = plain.and_then(|mut entry| {
            registry.apply(&entry.operator, None, &mut entry.operands)
        });
        value = reduce_value(value, registry);
        value = combine::apply_to_value(value, before, registry);

        sort_by_application(&mut ordered);
        let mut residue = Vec::new();
        let mut unreduced = false;
        for mut entry in ordered {
            if entry.operator.is_combine() {
                if unreduced {
                    value = reduce_value(value, registry);
                    unreduced = false;
                }
                value = combine::apply_entry(value, entry, registry);
            } else {
                value = registry.apply(&entry.operator, value, &mut entry.operands);
                unreduced = true;
                residue.push(entry);
            }
        }
        if unreduced {
            value = reduce_value(value, registry);
        }

        if let Some(value) = value {
            reduced.insert(KeyDescriptor::plain(base_key).encode_with(registry), value);
        }
        for entry in residue {
            emit_residue(reduced, entry, base_key, registry);
        }
    }
}

/// Order entries by priority. The built-in center operators form one block
/// placed by its first declaration, inside which multiplication precedes
/// addition; every other tie falls back to declaration order.
fn sort_by_application(entries: &mut [Entry]) {
    let builtin_block = entries
        .iter()
        .filter(|entry| is_builtin_center(&entry.operator))
        .map(|entry| entry.position)
        .min()
        .unwrap_or(0);
    entries.sort_by_key(|entry| {
        let anchor = if is_builtin_center(&entry.operator) {
            builtin_block
        } else {
            entry.position
        };
        (entry.order.priority(), anchor, entry.order.rank(), entry.position)
    });
}

const fn is_builtin_center(operator: &OperatorKind) -> bool {
    matches!(
        operator,
        OperatorKind::Add
            | OperatorKind::Multiply
            | OperatorKind::ConcatBefore
            | OperatorKind::ConcatAfter
    )
}

fn reduce_value(value: Option<Value>, registry: &OperatorRegistry) -> Option<Value> {
    match value {
        Some(Value::Object(inner)) => Some(Value::Object(reduce_tree(&inner, registry))),
        other => other,
    }
}

/// Keep unconsumed operands under their operator key.
fn emit_residue(reduced: &mut Tree, entry: Entry, base_key: &str, registry: &OperatorRegistry) {
    let (foreach, value) = match <[Value; 1]>::try_from(entry.operands.into_vec()) {
        Ok([single]) => (false, single),
        Err(operands) if operands.is_empty() => return,
        Err(operands) => (true, Value::Array(operands)),
    };
    let key = KeyDescriptor::new(entry.operator, base_key).with_foreach(foreach);
    tracing::trace!(key = %key, "keeping unconsumed operands");
    reduced.insert(key.encode_with(registry), value);
}
