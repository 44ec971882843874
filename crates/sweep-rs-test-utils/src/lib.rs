//! Test helpers shared across sweep-rs crates.

pub mod configs;
pub mod schemas;

pub use configs::leaf_values;
pub use schemas::{
    discriminated_registry, experiment_registry, nested_registry, registry_with, union_registry,
};
