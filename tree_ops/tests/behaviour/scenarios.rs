//! Binds the feature files to the step registry.

use crate::fixtures::{TreeOpsContext, tree_ops_context};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/layer_reduction.feature",
    fixtures = [tree_ops_context: TreeOpsContext]
);
scenarios!(
    "tests/features/custom_operators.feature",
    fixtures = [tree_ops_context: TreeOpsContext]
);
