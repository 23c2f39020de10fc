//! Structural merging for the combine operators.
//!
//! A combine-after patch is stacked above the current value, a combine-before
//! patch beneath it; the result is reduced again so operator keys from either
//! side still apply. Before patches run from the center outwards, `<*`
//! before `<<*`; after patches are placed by priority like any other entry.

use serde_json::Value;

use crate::Tree;
use crate::key::OperatorKind;
use crate::operators::OperatorRegistry;
use crate::stack::{StackMode, stack_with};

use super::{Entry, reduce_tree};

#[derive(Clone, Copy)]
enum Side {
    Before,
    After,
}

fn side_of(operator: &OperatorKind) -> Side {
    match operator {
        OperatorKind::CombineBefore(_) => Side::Before,
        _ => Side::After,
    }
}

/// Sort key placing entries from the center outwards.
fn distance(entry: &Entry) -> (u8, u32, usize) {
    match entry.operator {
        OperatorKind::CombineBefore(level) => (0, level, entry.position),
        OperatorKind::CombineAfter(level) => (1, level, entry.position),
        _ => (2, 0, entry.position),
    }
}

/// Stack `upper` over `lower` with deep tree merging, then reduce.
fn merge_trees(lower: &Tree, upper: &Tree, registry: &OperatorRegistry) -> Tree {
    reduce_tree(
        &stack_with([lower, upper], registry, StackMode::Deep),
        registry,
    )
}

/// Apply combine entries targeting one key, from the center outwards.
pub(super) fn apply_to_value(
    value: Option<Value>,
    mut entries: Vec<Entry>,
    registry: &OperatorRegistry,
) -> Option<Value> {
    entries.sort_by_key(distance);
    entries
        .into_iter()
        .fold(value, |current, entry| apply_entry(current, entry, registry))
}

/// Apply every patch of one combine entry in operand order.
pub(super) fn apply_entry(
    value: Option<Value>,
    entry: Entry,
    registry: &OperatorRegistry,
) -> Option<Value> {
    let side = side_of(&entry.operator);
    entry.operands.into_iter().fold(value, |accumulated, patch| {
        Some(combine(side, accumulated, patch, registry))
    })
}

fn combine(side: Side, current: Option<Value>, patch: Value, registry: &OperatorRegistry) -> Value {
    match (side, current, patch) {
        (Side::After, Some(Value::Object(base)), Value::Object(patch)) => {
            Value::Object(merge_trees(&base, &patch, registry))
        }
        (Side::Before, Some(Value::Object(base)), Value::Object(patch)) => {
            Value::Object(merge_trees(&patch, &base, registry))
        }
        // Mismatched shapes: the side with precedence simply wins.
        (Side::Before, Some(current), _) => current,
        (_, _, Value::Object(patch)) => Value::Object(reduce_tree(&patch, registry)),
        (_, _, patch) => patch,
    }
}

/// Apply combine entries with an empty base key to the level itself.
///
/// Patches that are not trees cannot replace the level and are skipped.
pub(super) fn apply_to_root(mut tree: Tree, mut entries: Vec<Entry>, registry: &OperatorRegistry) -> Tree {
    entries.sort_by_key(distance);
    for entry in entries {
        let side = side_of(&entry.operator);
        for patch in entry.operands {
            let Value::Object(patch) = patch else {
                tracing::trace!(?patch, "skipping non-tree patch targeting the root");
                continue;
            };
            tree = match side {
                Side::Before => merge_trees(&patch, &tree, registry),
                Side::After => merge_trees(&tree, &patch, registry),
            };
        }
    }
    tree
}
