//! The [`TreeOps`] engine context.
//!
//! An engine owns the operator registry used for every parse, so custom
//! operators are scoped to the engine that registered them.

use serde_json::Value;

use crate::Tree;
use crate::error::{TreeOpsError, TreeOpsResult};
use crate::key::{KeyDescriptor, OperatorKind, parse_key};
use crate::operators::{CustomOperator, OperatorRegistry};
use crate::projection::project_tree;
use crate::reduce::reduce_tree;
use crate::stack::stack_layers;

/// Stacks and reduces layered trees with a fixed operator registry.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tree_ops::TreeOps;
///
/// let ops = TreeOps::new();
/// let creature = json!({"hp": 8, "defense": 3, "+defense": 3});
/// let amulet = json!({"+defense": 1, "+hp": 1});
///
/// let reduced = ops.reduce_values(&[creature, amulet])?;
/// assert_eq!(serde_json::Value::Object(reduced), json!({"hp": 9, "defense": 7}));
/// # Ok::<_, tree_ops::TreeOpsError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct TreeOps {
    registry: OperatorRegistry,
}

impl TreeOps {
    /// Create an engine with only the built-in operators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine around an existing registry.
    #[must_use]
    pub const fn with_registry(registry: OperatorRegistry) -> Self {
        Self { registry }
    }

    /// The registry consulted when parsing keys.
    #[must_use]
    pub const fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    /// Register a single custom operator.
    ///
    /// # Errors
    ///
    /// Returns [`TreeOpsError::InvalidOperatorName`] for names that cannot
    /// appear inside a `(name)` marker.
    pub fn register_operator(
        &mut self,
        name: impl Into<String>,
        operator: CustomOperator,
    ) -> TreeOpsResult<()> {
        self.registry.register(name, operator)
    }

    /// Register several custom operators; registrations are append or
    /// overwrite only.
    ///
    /// # Errors
    ///
    /// Returns the invalid-name error(s); nothing is registered in that case.
    pub fn extend_operators<I, N>(&mut self, operators: I) -> TreeOpsResult<()>
    where
        I: IntoIterator<Item = (N, CustomOperator)>,
        N: Into<String>,
    {
        self.registry.extend(operators)
    }

    /// Parse a raw key against this engine's registry.
    #[must_use]
    pub fn parse_key(&self, raw: &str) -> KeyDescriptor {
        parse_key(raw, &self.registry)
    }

    /// Encode `key` in canonical form.
    #[must_use]
    pub fn encode_key(&self, key: &KeyDescriptor) -> String {
        let encoded = key.encode_with(&self.registry);
        if let OperatorKind::Custom(name) = key.operator()
            && !self.registry.contains(name)
        {
            tracing::trace!(key = %encoded, name = %name, "encoded key names an unregistered operator");
        }
        encoded
    }

    /// Stack layers into one annotated tree.
    #[must_use]
    pub fn stack<'t, I>(&self, layers: I) -> Tree
    where
        I: IntoIterator<Item = &'t Tree>,
    {
        stack_layers(layers, &self.registry)
    }

    /// Stack then reduce layers into a plain tree.
    ///
    /// Reducing already stacked input is idempotent with stacking first:
    /// `reduce([stack([a, b])]) == reduce([a, b])`.
    #[must_use]
    pub fn reduce<'t, I>(&self, layers: I) -> Tree
    where
        I: IntoIterator<Item = &'t Tree>,
    {
        let stacked = self.stack(layers);
        let reduced = reduce_tree(&stacked, &self.registry);
        tracing::debug!(
            stacked_keys = stacked.len(),
            reduced_keys = reduced.len(),
            "reduced layers"
        );
        reduced
    }

    /// Drop every operator key of `tree` without applying it.
    #[must_use]
    pub fn to_object(&self, tree: &Tree) -> Tree {
        project_tree(tree, &self.registry)
    }

    /// Reduce layers, then drop leftover operator keys and literal escapes.
    #[must_use]
    pub fn reduce_to_object<'t, I>(&self, layers: I) -> Tree
    where
        I: IntoIterator<Item = &'t Tree>,
    {
        self.to_object(&self.reduce(layers))
    }

    /// Stack untyped layers.
    ///
    /// # Errors
    ///
    /// Returns [`TreeOpsError::NotATree`] (aggregated when several layers are
    /// affected) if a layer is not a JSON object.
    pub fn stack_values(&self, layers: &[Value]) -> TreeOpsResult<Tree> {
        let trees = trees_of(layers)?;
        Ok(self.stack(trees))
    }

    /// Reduce untyped layers.
    ///
    /// # Errors
    ///
    /// Returns [`TreeOpsError::NotATree`] (aggregated when several layers are
    /// affected) if a layer is not a JSON object.
    pub fn reduce_values(&self, layers: &[Value]) -> TreeOpsResult<Tree> {
        let trees = trees_of(layers)?;
        Ok(self.reduce(trees))
    }
}

fn trees_of(layers: &[Value]) -> TreeOpsResult<Vec<&Tree>> {
    let mut trees = Vec::with_capacity(layers.len());
    let mut errors = Vec::new();
    for (position, layer) in layers.iter().enumerate() {
        match layer {
            Value::Object(tree) => trees.push(tree),
            other => errors.push(TreeOpsError::not_a_tree(position.to_string(), other)),
        }
    }
    TreeOpsError::try_aggregate(errors).map_or(Ok(trees), Err)
}
