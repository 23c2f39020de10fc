//! `rstest-bdd` behavioural suite for `tree_ops`.
//!
//! Fixtures live in [`fixtures`], step definitions under [`steps`], and
//! [`scenarios`] binds the `.feature` files to them.

mod fixtures;
mod scenarios;
mod steps;
