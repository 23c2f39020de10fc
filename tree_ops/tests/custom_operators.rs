//! Custom operators registered on an engine.

use anyhow::{Result, ensure};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use test_helpers::tree::tree;
use tree_ops::{CustomOperator, OperandList, TreeOps, TreeOpsError, number_value};

/// `(pow)key`: raise the existing value to the product of the operands, or
/// fold the operands into one when there is nothing to raise.
fn pow(existing: Option<Value>, operands: &mut OperandList) -> Option<Value> {
    let exponent = operands
        .iter()
        .filter_map(Value::as_i64)
        .fold(1_i64, i64::saturating_mul);
    let base = existing.as_ref().and_then(Value::as_i64);
    match base.zip(i32::try_from(exponent).ok()) {
        Some((base, exponent)) => {
            operands.clear();
            #[expect(clippy::cast_precision_loss, reason = "test values are small")]
            let base = base as f64;
            Some(number_value(base.powi(exponent)))
        }
        None => {
            operands.replace_with(json!(exponent));
            existing
        }
    }
}

#[fixture]
fn engine() -> TreeOps {
    let mut ops = TreeOps::new();
    ops.extend_operators([("pow", CustomOperator::new(100, pow))])
        .expect("pow is a valid operator name");
    ops
}

#[rstest]
fn pow_applies_after_the_center_operators(engine: TreeOps) {
    let layer = tree(json!({"a": 3, "b": 5, "+b": 2, "(pow)a": 2}));
    assert_eq!(Value::Object(engine.reduce([&layer])), json!({"a": 9, "b": 7}));
}

#[rstest]
fn pow_operands_chain_across_layers(engine: TreeOps) {
    let base = tree(json!({"a": 3, "b": 5, "(pow)a": 2}));
    let mods = tree(json!({"(pow)a": 3}));
    assert_eq!(
        Value::Object(engine.stack([&base, &mods])),
        json!({"a": 3, "b": 5, "(#pow)a": [2, 3]})
    );
    assert_eq!(
        Value::Object(engine.reduce([&base, &mods])),
        json!({"a": 729, "b": 5})
    );
}

#[rstest]
fn unconsumed_pow_operands_are_kept(engine: TreeOps) {
    let layer = tree(json!({"#(pow)z": [2, 3]}));
    assert_eq!(Value::Object(engine.reduce([&layer])), json!({"(pow)z": 6}));
    assert!(engine.reduce_to_object([&layer]).is_empty());
}

fn consuming(priority: i64, map: fn(i64) -> i64) -> CustomOperator {
    CustomOperator::new(priority, move |existing, operands| {
        operands.clear();
        existing.and_then(|v| v.as_i64()).map(|v| json!(map(v)))
    })
}

#[rstest]
#[case::below_the_center(json!({"a": 3, "+a": 1, "(double)a": true}), json!({"a": 7}))]
#[case::above_the_center(json!({"a": 3, "+a": 1, "(negate)a": true}), json!({"a": -4}))]
fn priority_places_custom_operators_around_built_ins(
    #[case] layer: Value,
    #[case] expected: Value,
) -> Result<()> {
    let mut ops = TreeOps::new();
    ops.register_operator("double", consuming(-1, |v| v * 2))?;
    ops.register_operator("negate", consuming(1, |v| -v))?;

    let result = Value::Object(ops.reduce([&tree(layer)]));
    ensure!(result == expected, "unexpected {result}");
    Ok(())
}

#[test]
fn custom_operators_beyond_a_combine_level_see_the_patch() -> Result<()> {
    let mut ops = TreeOps::new();
    ops.register_operator("tag", CustomOperator::new(2000, |existing, operands| {
        operands.clear();
        match existing {
            Some(Value::Object(mut inner)) => {
                inner.insert("tagged".to_owned(), json!(true));
                Some(Value::Object(inner))
            }
            other => other,
        }
    }))?;
    let layer = tree(json!({"s": {"a": 1}, "*>s": {"tagged": false}, "(tag)s": true}));
    let result = Value::Object(ops.reduce([&layer]));
    ensure!(result == json!({"s": {"a": 1, "tagged": true}}), "unexpected {result}");
    Ok(())
}

#[test]
fn equal_priorities_follow_declaration_order() -> Result<()> {
    let mut ops = TreeOps::new();
    ops.register_operator("negate", consuming(0, |v| -v))?;

    let negate_first = tree(json!({"a": 3, "(negate)a": true, "+a": 1}));
    let add_first = tree(json!({"a": 3, "+a": 1, "(negate)a": true}));
    let first = Value::Object(ops.reduce([&negate_first]));
    let second = Value::Object(ops.reduce([&add_first]));
    ensure!(first == json!({"a": -2}), "unexpected {first}");
    ensure!(second == json!({"a": -4}), "unexpected {second}");
    Ok(())
}

#[test]
fn registries_are_not_shared_between_engines() {
    let layer = tree(json!({"a": 3, "(pow)a": 2}));
    assert_eq!(
        Value::Object(TreeOps::new().reduce([&layer])),
        json!({"a": 3, "(pow)a": 2})
    );
    assert_eq!(Value::Object(tree_ops::reduce([&layer])), json!({"a": 3, "(pow)a": 2}));
}

#[test]
fn invalid_names_are_rejected() {
    let mut ops = TreeOps::new();
    let err = ops
        .register_operator("(pow)", CustomOperator::new(0, pow))
        .expect_err("parentheses are not allowed");
    assert!(matches!(err, TreeOpsError::InvalidOperatorName { ref name, .. } if name == "(pow)"));
    assert!(!ops.registry().contains("(pow)"));
}
