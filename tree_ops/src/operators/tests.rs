//! Unit tests for the registry and the built-in reduce functions.

use rstest::rstest;
use serde_json::{Value, json};

use super::{CENTER_PRIORITY, COMBINE_PRIORITY_STEP, CustomOperator, OperatorRegistry};
use crate::TreeOpsError;
use crate::key::OperatorKind;
use crate::operand::OperandList;

fn apply(kind: &OperatorKind, existing: Option<Value>, operands: Value) -> (Option<Value>, Vec<Value>) {
    let registry = OperatorRegistry::new();
    let mut operands = OperandList::from_key_value(&operands, true);
    let value = registry.apply(kind, existing, &mut operands);
    (value, operands.into_vec())
}

fn identity() -> CustomOperator {
    CustomOperator::new(7, |existing, _| existing)
}

#[rstest]
#[case::add(OperatorKind::Add, json!(3), json!([1, 2]), json!(6))]
#[case::multiply(OperatorKind::Multiply, json!(3), json!([2, 2]), json!(12))]
#[case::float_product_is_integral(OperatorKind::Multiply, json!(5), json!([1.2]), json!(6))]
#[case::float_sum(OperatorKind::Add, json!(1), json!([0.5]), json!(1.5))]
#[case::skips_strings(OperatorKind::Add, json!(1), json!(["x", 2]), json!(3))]
#[case::assign_takes_last(OperatorKind::Assign, json!(1), json!([2, 3]), json!(3))]
#[case::concat_after(OperatorKind::ConcatAfter, json!([1]), json!([[2], [3, 4]]), json!([1, 2, 3, 4]))]
#[case::concat_before(OperatorKind::ConcatBefore, json!([1]), json!([[2], [3]]), json!([3, 2, 1]))]
fn builtins_consume_their_operands(
    #[case] kind: OperatorKind,
    #[case] existing: Value,
    #[case] operands: Value,
    #[case] expected: Value,
) {
    let (value, left) = apply(&kind, Some(existing), operands);
    assert_eq!(value, Some(expected));
    assert!(left.is_empty(), "operands left behind: {left:?}");
}

#[rstest]
#[case::add_without_target(OperatorKind::Add, None, json!([1, 2]), json!(3))]
#[case::multiply_non_numeric(OperatorKind::Multiply, Some(json!("x")), json!([2, 3]), json!(6))]
#[case::concat_without_array(OperatorKind::ConcatAfter, Some(json!(1)), json!([[1], [2]]), json!([1, 2]))]
fn unusable_targets_leave_one_folded_operand(
    #[case] kind: OperatorKind,
    #[case] existing: Option<Value>,
    #[case] operands: Value,
    #[case] residue: Value,
) {
    let (value, left) = apply(&kind, existing.clone(), operands);
    assert_eq!(value, existing);
    assert_eq!(left, [residue]);
}

#[test]
fn integer_overflow_falls_back_to_floats() {
    let (value, _) = apply(&OperatorKind::Multiply, Some(json!(i64::MAX)), json!([2]));
    let product = value.and_then(|v| v.as_f64()).expect("numeric result");
    assert!(product > 1.8e19);
}

#[test]
fn assign_without_operands_keeps_the_existing_value() {
    let (value, _) = apply(&OperatorKind::Assign, Some(json!(4)), json!([]));
    assert_eq!(value, Some(json!(4)));
}

#[rstest]
#[case(OperatorKind::CombineBefore(2), -2 * COMBINE_PRIORITY_STEP)]
#[case(OperatorKind::CombineAfter(1), COMBINE_PRIORITY_STEP)]
#[case(OperatorKind::Add, CENTER_PRIORITY)]
#[case(OperatorKind::Custom("missing".to_owned()), CENTER_PRIORITY)]
#[case(OperatorKind::Custom("keep".to_owned()), 7)]
fn priorities_follow_the_level_scheme(#[case] kind: OperatorKind, #[case] expected: i64) {
    let mut registry = OperatorRegistry::new();
    registry.register("keep", identity()).expect("valid name");
    assert_eq!(registry.priority(&kind), expected);
}

#[test]
fn multiplication_ranks_before_addition_at_equal_priority() {
    let registry = OperatorRegistry::new();
    let multiply = registry.apply_order(&OperatorKind::Multiply);
    let add = registry.apply_order(&OperatorKind::Add);
    assert_eq!(multiply.priority(), add.priority());
    assert!(multiply.rank() < add.rank());
}

#[test]
fn custom_operators_carry_no_fixed_rank() {
    let mut registry = OperatorRegistry::new();
    registry.register("keep", CustomOperator::new(0, |existing, _| existing)).expect("valid name");
    let custom = registry.apply_order(&OperatorKind::Custom("keep".to_owned()));
    assert_eq!(custom.priority(), CENTER_PRIORITY);
    assert_eq!(custom.rank(), 0);
}

#[rstest]
#[case("")]
#[case("po(w")]
#[case("pow)")]
#[case("#pow")]
fn rejects_unwritable_names(#[case] name: &str) {
    let mut registry = OperatorRegistry::new();
    let err = registry.register(name, identity()).expect_err("name is invalid");
    assert!(matches!(err, TreeOpsError::InvalidOperatorName { .. }));
    assert!(!registry.contains(name));
}

#[test]
fn extend_registers_nothing_when_any_name_is_invalid() {
    let mut registry = OperatorRegistry::new();
    let err = registry
        .extend([("ok", identity()), ("", identity()), ("a#b", identity())])
        .expect_err("two names are invalid");
    assert!(matches!(err, TreeOpsError::Aggregate(ref agg) if agg.errors().len() == 2));
    assert!(!registry.contains("ok"));
}

#[test]
fn register_replaces_existing_operator() {
    let mut registry = OperatorRegistry::new();
    registry.register("keep", identity()).expect("valid name");
    registry
        .register("keep", CustomOperator::new(-5, |existing, _| existing))
        .expect("valid name");
    assert_eq!(registry.get("keep").map(CustomOperator::priority), Some(-5));
}

#[test]
fn custom_operators_receive_existing_value_and_operands() {
    let mut registry = OperatorRegistry::new();
    registry
        .register(
            "count",
            CustomOperator::new(0, |_, operands| {
                let count = operands.len();
                operands.clear();
                Some(json!(count))
            }),
        )
        .expect("valid name");
    let mut operands = OperandList::from(vec![json!(1), json!("a"), json!(null)]);
    let value = registry.apply(&OperatorKind::Custom("count".to_owned()), None, &mut operands);
    assert_eq!(value, Some(json!(3)));
    assert!(operands.is_empty());
}
