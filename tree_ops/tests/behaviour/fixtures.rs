//! Shared fixtures for the behavioural scenarios.

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::Value;
use tree_ops::{Tree, TreeOps, TreeOpsResult};

/// Scenario state threading layers, the engine, and the outcome between
/// steps.
#[derive(Debug, Default, ScenarioState)]
pub struct TreeOpsContext {
    pub layers: Slot<Vec<Value>>,
    pub engine: Slot<TreeOps>,
    pub outcome: Slot<TreeOpsResult<Tree>>,
}

/// Creates an empty context for each scenario.
#[fixture]
pub fn tree_ops_context() -> TreeOpsContext {
    TreeOpsContext::default()
}
