//! Labelled layers and the composer that orders them.
//!
//! Layers are carried as [`Tree`] values so tests and callers can compose
//! deterministic inputs without a file front-end. A label is optional and
//! only used to name the layer in errors and logs.

mod composer;

use std::borrow::Cow;

use serde_json::Value;

use crate::Tree;
use crate::error::{TreeOpsError, TreeOpsResult};

pub use composer::{LayerComposer, LayerComposition};

/// One input tree in a stack or reduce call.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer<'a> {
    label: Option<String>,
    tree: Cow<'a, Tree>,
}

impl<'a> Layer<'a> {
    /// Construct a layer from a borrowed or owned tree.
    #[must_use]
    pub const fn new(tree: Cow<'a, Tree>) -> Self {
        Self { label: None, tree }
    }

    /// Construct a layer borrowing `tree`.
    #[must_use]
    pub const fn borrowed(tree: &'a Tree) -> Self {
        Self::new(Cow::Borrowed(tree))
    }

    /// Attach a label used in diagnostics.
    #[must_use]
    pub fn with_label(self, label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..self
        }
    }

    /// Returns the label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the layer's tree.
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Returns an owned tree representing the layer.
    #[must_use]
    pub fn into_tree(self) -> Tree {
        self.tree.into_owned()
    }

    /// Convert this layer into a `'static` owned variant.
    #[must_use]
    pub fn into_owned(self) -> Layer<'static> {
        Layer {
            label: self.label,
            tree: Cow::Owned(self.tree.into_owned()),
        }
    }
}

impl Layer<'static> {
    /// Construct a layer owning `tree`.
    #[must_use]
    pub const fn owned(tree: Tree) -> Self {
        Self::new(Cow::Owned(tree))
    }

    /// Construct a layer from an untyped value.
    ///
    /// # Errors
    ///
    /// Returns [`TreeOpsError::NotATree`] when `value` is not a JSON object.
    pub fn from_value(value: Value, label: impl Into<String>) -> TreeOpsResult<Self> {
        match value {
            Value::Object(tree) => Ok(Self::owned(tree).with_label(label)),
            other => Err(TreeOpsError::not_a_tree(label, &other)),
        }
    }
}

impl From<Tree> for Layer<'static> {
    fn from(tree: Tree) -> Self {
        Self::owned(tree)
    }
}

impl<'a> From<&'a Tree> for Layer<'a> {
    fn from(tree: &'a Tree) -> Self {
        Self::borrowed(tree)
    }
}
