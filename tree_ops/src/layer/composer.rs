//! Layer composition helpers.

use serde_json::Value;

use crate::Tree;
use crate::engine::TreeOps;
use crate::error::{TreeOpsError, TreeOpsResult};

use super::Layer;

/// Builder that accumulates [`Layer`] instances in precedence order.
///
/// Untyped values pushed through [`LayerComposer::push_value`] are validated
/// on the way in; failures are recorded rather than aborting the
/// composition, so every bad layer is reported at once.
///
/// ```rust
/// use serde_json::json;
/// use tree_ops::{LayerComposer, TreeOps};
///
/// let mut composer = LayerComposer::new();
/// composer.push_value(json!({"hp": 8, "defense": 3}));
/// composer.push_value(json!({"*defense": 2, "+defense": 1}));
///
/// let reduced = composer.finish().reduce(&TreeOps::new())?;
/// assert_eq!(serde_json::Value::Object(reduced), json!({"hp": 8, "defense": 7}));
/// # Ok::<_, tree_ops::TreeOpsError>(())
/// ```
#[derive(Debug, Default)]
pub struct LayerComposer {
    layers: Vec<Layer<'static>>,
    errors: Vec<TreeOpsError>,
}

impl LayerComposer {
    /// Create an empty composer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            layers: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Create a composer with preallocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            layers: Vec::with_capacity(capacity),
            errors: Vec::new(),
        }
    }

    /// Push a tree layer.
    pub fn push_tree(&mut self, tree: Tree) {
        self.push_layer(Layer::owned(tree));
    }

    /// Push an untyped layer, labelled with its position.
    pub fn push_value(&mut self, value: Value) {
        let label = self.next_position().to_string();
        self.push_labelled_value(label, value);
    }

    /// Push an untyped layer under `label`.
    pub fn push_labelled_value(&mut self, label: impl Into<String>, value: Value) {
        match Layer::from_value(value, label) {
            Ok(layer) => self.push_layer(layer),
            Err(err) => {
                tracing::debug!(error = %err, "rejected layer");
                self.errors.push(err);
            }
        }
    }

    /// Push an arbitrary layer.
    pub fn push_layer(&mut self, layer: Layer<'static>) {
        self.layers.push(layer);
    }

    const fn next_position(&self) -> usize {
        self.layers.len() + self.errors.len()
    }

    /// Consume the composer and return the accepted layers, discarding any
    /// recorded errors.
    #[must_use]
    pub fn layers(self) -> Vec<Layer<'static>> {
        self.layers
    }

    /// Consume the composer, keeping layers and recorded errors together.
    #[must_use]
    pub fn finish(self) -> LayerComposition {
        LayerComposition::new(self.layers, self.errors)
    }
}

impl IntoIterator for LayerComposer {
    type Item = Layer<'static>;
    type IntoIter = std::vec::IntoIter<Layer<'static>>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.into_iter()
    }
}

/// Result of composing layers alongside any collected errors.
#[derive(Debug)]
pub struct LayerComposition {
    layers: Vec<Layer<'static>>,
    errors: Vec<TreeOpsError>,
}

impl LayerComposition {
    /// Create a new composition from `layers` and `errors`.
    #[must_use]
    pub const fn new(layers: Vec<Layer<'static>>, errors: Vec<TreeOpsError>) -> Self {
        Self { layers, errors }
    }

    /// Decompose the composition into its constituent parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Layer<'static>>, Vec<TreeOpsError>) {
        (self.layers, self.errors)
    }

    /// Indicates whether any errors were captured while composing layers.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consume the composition and run `apply` over the layers.
    ///
    /// # Errors
    ///
    /// Returns the recorded composition errors (aggregated when there are
    /// several); `apply` is not called in that case.
    pub fn into_result<T, F>(self, apply: F) -> TreeOpsResult<T>
    where
        F: FnOnce(Vec<Layer<'static>>) -> T,
    {
        let (layers, errors) = self.into_parts();
        match TreeOpsError::try_aggregate(errors) {
            Some(err) => Err(err),
            None => Ok(apply(layers)),
        }
    }

    /// Stack the composed layers with `ops`.
    ///
    /// # Errors
    ///
    /// Returns the recorded composition errors.
    pub fn stack(self, ops: &TreeOps) -> TreeOpsResult<Tree> {
        self.into_result(|layers| ops.stack(layers.iter().map(Layer::tree)))
    }

    /// Reduce the composed layers with `ops`.
    ///
    /// # Errors
    ///
    /// Returns the recorded composition errors.
    pub fn reduce(self, ops: &TreeOps) -> TreeOpsResult<Tree> {
        self.into_result(|layers| ops.reduce(layers.iter().map(Layer::tree)))
    }

    /// Reduce the composed layers and strip leftover operator keys.
    ///
    /// # Errors
    ///
    /// Returns the recorded composition errors.
    pub fn reduce_to_object(self, ops: &TreeOps) -> TreeOpsResult<Tree> {
        self.into_result(|layers| ops.reduce_to_object(layers.iter().map(Layer::tree)))
    }
}
