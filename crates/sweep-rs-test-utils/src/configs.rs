//! Helpers for inspecting lists of configs in tests.

use sweep_rs_core::nested::get_leaf;
use sweep_rs_core::{Config, Value};

/// Leaf at `path` of every config, in order. Panics when a config lacks it.
pub fn leaf_values(configs: &[Config], path: &str) -> Vec<Value> {
    configs
        .iter()
        .map(|config| get_leaf(config, path).expect("leaf").clone())
        .collect()
}
