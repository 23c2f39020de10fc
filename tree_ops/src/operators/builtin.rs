//! Reduce functions for the built-in center operators.
//!
//! Every function receives the value accumulated so far and the operands
//! contributed to the key. Operands of the wrong type are skipped. When there
//! is nothing valid to apply them to, the arithmetic and concatenation
//! operators fold their operands into one equivalent operand and leave it in
//! the list, so it survives reduction as residue.

use serde_json::Value;

use crate::operand::OperandList;

use super::number::Numeric;

/// Plain keys: the last operand wins.
pub(crate) fn assign(existing: Option<Value>, operands: &mut OperandList) -> Option<Value> {
    let last = operands.last().cloned();
    operands.clear();
    last.or(existing)
}

pub(crate) fn add(existing: Option<Value>, operands: &mut OperandList) -> Option<Value> {
    fold_numeric(existing, operands, Numeric::ZERO, Numeric::add)
}

pub(crate) fn multiply(existing: Option<Value>, operands: &mut OperandList) -> Option<Value> {
    fold_numeric(existing, operands, Numeric::ONE, Numeric::mul)
}

fn fold_numeric(
    existing: Option<Value>,
    operands: &mut OperandList,
    identity: Numeric,
    combine: fn(Numeric, Numeric) -> Numeric,
) -> Option<Value> {
    let numbers: Vec<Numeric> = operands.iter().filter_map(numeric_operand).collect();
    if numbers.is_empty() {
        operands.clear();
        return existing;
    }
    let operand = numbers.into_iter().fold(identity, combine);

    match existing.as_ref().and_then(Numeric::from_value) {
        Some(current) => {
            operands.clear();
            Some(combine(current, operand).into_value())
        }
        None => {
            operands.replace_with(operand.into_value());
            existing
        }
    }
}

fn numeric_operand(operand: &Value) -> Option<Numeric> {
    let numeric = Numeric::from_value(operand);
    if numeric.is_none() {
        tracing::trace!(?operand, "skipping non-numeric operand");
    }
    numeric
}

/// `+>`: each operand array is appended in turn.
pub(crate) fn concat_after(existing: Option<Value>, operands: &mut OperandList) -> Option<Value> {
    let tail = flatten_arrays(operands.iter());
    concat(existing, operands, tail, |mut current, tail| {
        current.extend(tail);
        current
    })
}

/// `<+`: each operand array is prepended in turn, so later layers end up
/// in front.
pub(crate) fn concat_before(existing: Option<Value>, operands: &mut OperandList) -> Option<Value> {
    let head = flatten_arrays(operands.iter().rev());
    concat(existing, operands, head, |current, mut head| {
        head.extend(current);
        head
    })
}

fn concat(
    existing: Option<Value>,
    operands: &mut OperandList,
    joined: Option<Vec<Value>>,
    splice: fn(Vec<Value>, Vec<Value>) -> Vec<Value>,
) -> Option<Value> {
    let Some(joined) = joined else {
        operands.clear();
        return existing;
    };
    match existing {
        Some(Value::Array(current)) => {
            operands.clear();
            Some(Value::Array(splice(current, joined)))
        }
        other => {
            operands.replace_with(Value::Array(joined));
            other
        }
    }
}

/// Concatenate every array operand, or `None` when no operand is an array.
fn flatten_arrays<'v, I>(operands: I) -> Option<Vec<Value>>
where
    I: Iterator<Item = &'v Value>,
{
    let mut any = false;
    let mut joined = Vec::new();
    for operand in operands {
        if let Value::Array(items) = operand {
            any = true;
            joined.extend(items.iter().cloned());
        } else {
            tracing::trace!(?operand, "skipping non-array concatenation operand");
        }
    }
    any.then_some(joined)
}
