//! Step definitions for layer reduction scenarios.

use anyhow::{Result, anyhow, ensure};
use rstest_bdd_macros::{given, then, when};
use serde_json::Value;
use test_helpers::step_arg;
use tree_ops::{CustomOperator, LayerComposer, TreeOps, TreeOpsError, number_value};

use crate::fixtures::TreeOpsContext;

fn engine(tree_ops_context: &TreeOpsContext) -> TreeOps {
    tree_ops_context.engine.get().unwrap_or_default()
}

fn layers(tree_ops_context: &TreeOpsContext) -> Result<Vec<Value>> {
    let layers = tree_ops_context.layers.get().unwrap_or_default();
    ensure!(!layers.is_empty(), "no layers were given");
    Ok(layers)
}

/// `(pow)key`: raise the existing value to the product of the operands.
fn pow_operator(priority: i64) -> CustomOperator {
    CustomOperator::new(priority, |existing, operands| {
        let exponent: f64 = operands.iter().filter_map(Value::as_f64).product();
        match existing.as_ref().and_then(Value::as_f64) {
            Some(base) => {
                operands.clear();
                Some(number_value(base.powf(exponent)))
            }
            None => {
                operands.replace_with(number_value(exponent));
                existing
            }
        }
    })
}

#[given("a layer {layer}")]
fn push_layer(tree_ops_context: &TreeOpsContext, layer: String) -> Result<()> {
    let value = step_arg::json(&layer)?;
    let mut layers = tree_ops_context.layers.take().unwrap_or_default();
    layers.push(value);
    tree_ops_context.layers.set(layers);
    Ok(())
}

#[given("the operator {name} is registered with priority {priority}")]
fn register_pow(tree_ops_context: &TreeOpsContext, name: String, priority: i64) -> Result<()> {
    let mut ops = engine(tree_ops_context);
    ops.register_operator(step_arg::name(&name), pow_operator(priority))
        .map_err(|err| anyhow!(err))?;
    tree_ops_context.engine.set(ops);
    Ok(())
}

#[when("the layers are stacked")]
fn stack_layers(tree_ops_context: &TreeOpsContext) -> Result<()> {
    let outcome = engine(tree_ops_context).stack_values(&layers(tree_ops_context)?);
    tree_ops_context.outcome.set(outcome);
    Ok(())
}

#[when("the layers are reduced")]
fn reduce_layers(tree_ops_context: &TreeOpsContext) -> Result<()> {
    let outcome = engine(tree_ops_context).reduce_values(&layers(tree_ops_context)?);
    tree_ops_context.outcome.set(outcome);
    Ok(())
}

#[when("the layers are reduced to a plain object")]
fn reduce_layers_to_object(tree_ops_context: &TreeOpsContext) -> Result<()> {
    let mut composer = LayerComposer::new();
    for layer in layers(tree_ops_context)? {
        composer.push_value(layer);
    }
    let outcome = composer.finish().reduce_to_object(&engine(tree_ops_context));
    tree_ops_context.outcome.set(outcome);
    Ok(())
}

#[then("the result is {expected}")]
fn result_is(tree_ops_context: &TreeOpsContext, expected: String) -> Result<()> {
    let expected = step_arg::json(&expected)?;
    let tree = tree_ops_context
        .outcome
        .take()
        .ok_or_else(|| anyhow!("no operation was run"))?
        .map_err(|err| anyhow!(err))?;
    let actual = Value::Object(tree);
    ensure!(actual == expected, "unexpected result {actual}; expected {expected}");
    Ok(())
}

#[then("the failure names layer {label}")]
fn failure_names_layer(tree_ops_context: &TreeOpsContext, label: String) -> Result<()> {
    let label = step_arg::name(&label);
    let outcome = tree_ops_context
        .outcome
        .take()
        .ok_or_else(|| anyhow!("no operation was run"))?;
    match outcome {
        Err(TreeOpsError::NotATree { layer, .. }) => {
            ensure!(layer == label, "unexpected layer {layer:?}; expected {label:?}");
            Ok(())
        }
        Err(other) => Err(anyhow!("unexpected error: {other}")),
        Ok(tree) => Err(anyhow!("expected a failure, got {}", Value::Object(tree))),
    }
}
