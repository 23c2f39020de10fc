//! Test helpers shared across crates.
//!
//! This crate provides tree constructors for JSON fixtures and decoding of
//! quoted placeholder captures for behavioural step definitions.

pub mod step_arg;
pub mod tree;
