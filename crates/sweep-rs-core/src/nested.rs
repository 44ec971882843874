//! Path-addressed operations on nested configs.
//!
//! Configs are converted to and from flat `(path, value)` items. Building a
//! config from items rejects duplicate paths and any path that is a prefix of
//! another, so two partial configs can never silently overwrite each other.

use crate::error::{SweepError, conflict, key_not_found, type_mismatch};
use crate::path::{IntoPath, Path};
use crate::value::{Config, Value};

/// A node resolved by [`get`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    /// A sub-config (or the whole config for the root path).
    Branch(&'a Config),
    /// A leaf value.
    Leaf(&'a Value),
}

/// Build a config holding a single `value` at `path`.
pub fn at(path: impl IntoPath, value: impl Into<Value>) -> Result<Config, SweepError> {
    let path = path.into_path(false)?;
    from_items([(path, value.into())])
}

/// Build a nested config from `(path, value)` items.
pub fn from_items(
    items: impl IntoIterator<Item = (Path, Value)>,
) -> Result<Config, SweepError> {
    let mut result = Config::new();

    for (full_path, value) in items {
        let Some((key, parents)) = full_path.split_last() else {
            return Err(SweepError::InvalidPath(
                "cannot assign a value to the empty path".to_string(),
            ));
        };

        let mut node = &mut result;
        for (depth, part) in parents.iter().enumerate() {
            node = match node
                .entry(part.clone())
                .or_insert_with(|| Value::Map(Config::new()))
            {
                Value::Map(child) => child,
                existing => {
                    return Err(conflict(
                        &full_path.prefix(depth + 1),
                        format!(
                            "both a value ({existing}) and child nodes are defined, so these \
                             configs would overwrite each other"
                        ),
                    ));
                }
            };
        }

        match node.get(key) {
            Some(Value::Map(_)) => {
                return Err(conflict(
                    &full_path,
                    format!(
                        "both a value ({value}) and child nodes are defined, so these configs \
                         would overwrite each other"
                    ),
                ));
            }
            Some(existing) => {
                return Err(conflict(
                    &full_path,
                    format!("conflicting values assigned: {existing} and {value}"),
                ));
            }
            None => {
                node.insert(key.clone(), value);
            }
        }
    }

    Ok(result)
}

/// Leaves of `config` with their full paths, depth first in key order.
pub fn items(config: &Config) -> Vec<(Path, &Value)> {
    let mut out = Vec::new();
    collect_items(config, &Path::root(), &mut out);
    out
}

fn collect_items<'a>(config: &'a Config, prefix: &Path, out: &mut Vec<(Path, &'a Value)>) {
    for (key, value) in config {
        let path = prefix.join(key.as_str());
        match value {
            Value::Map(child) => collect_items(child, &path, out),
            leaf => out.push((path, leaf)),
        }
    }
}

/// Owned variant of [`items`].
pub fn into_items(config: Config) -> Vec<(Path, Value)> {
    let mut out = Vec::new();
    collect_owned(config, &Path::root(), &mut out);
    out
}

fn collect_owned(config: Config, prefix: &Path, out: &mut Vec<(Path, Value)>) {
    for (key, value) in config {
        let path = prefix.join(key);
        match value {
            Value::Map(child) => collect_owned(child, &path, out),
            leaf => out.push((path, leaf)),
        }
    }
}

/// Resolve the node at `path`.
///
/// With `leaf = Some(true)` the node must be a leaf, with `Some(false)` a
/// mapping. The empty path resolves to the whole config.
pub fn get(
    config: &Config,
    path: impl IntoPath,
    leaf: Option<bool>,
) -> Result<Node<'_>, SweepError> {
    let path = path.into_path(false)?;
    let mut node = Node::Branch(config);

    for key in &path {
        let Node::Branch(map) = node else {
            return Err(key_not_found(&path));
        };
        node = match map.get(key) {
            Some(Value::Map(child)) => Node::Branch(child),
            Some(value) => Node::Leaf(value),
            None => return Err(key_not_found(&path)),
        };
    }

    match (leaf, node) {
        (Some(true), Node::Branch(_)) => Err(type_mismatch(
            &path,
            "expected a leaf, but got a mapping",
        )),
        (Some(false), Node::Leaf(value)) => Err(type_mismatch(
            &path,
            format!("expected a mapping, but got {}", value.kind()),
        )),
        _ => Ok(node),
    }
}

/// Resolve the sub-config at `path`.
pub fn get_config(config: &Config, path: impl IntoPath) -> Result<&Config, SweepError> {
    match get(config, path, Some(false))? {
        Node::Branch(child) => Ok(child),
        Node::Leaf(_) => Err(SweepError::InvalidArguments(
            "resolved a leaf where a mapping was required".to_string(),
        )),
    }
}

/// Resolve the leaf value at `path`.
pub fn get_leaf(config: &Config, path: impl IntoPath) -> Result<&Value, SweepError> {
    match get(config, path, Some(true))? {
        Node::Leaf(value) => Ok(value),
        Node::Branch(_) => Err(SweepError::InvalidArguments(
            "resolved a mapping where a leaf was required".to_string(),
        )),
    }
}

/// Copy of `config` with the existing entry at `path` replaced by `value`.
pub fn replace(
    config: &Config,
    path: impl IntoPath,
    value: impl Into<Value>,
) -> Result<Config, SweepError> {
    let mut copy = config.clone();
    replace_mut(&mut copy, path, value)?;
    Ok(copy)
}

/// Replace the existing entry at `path` in place.
pub fn replace_mut(
    config: &mut Config,
    path: impl IntoPath,
    value: impl Into<Value>,
) -> Result<(), SweepError> {
    let path = path.into_path(false)?;
    let (parent, key) = parent_mut(config, &path)?;
    match parent.get_mut(key) {
        Some(slot) => {
            *slot = value.into();
            Ok(())
        }
        None => Err(key_not_found(&path)),
    }
}

/// Copy of `config` without the entry at `path`.
pub fn drop(config: &Config, path: impl IntoPath) -> Result<Config, SweepError> {
    let mut copy = config.clone();
    drop_mut(&mut copy, path)?;
    Ok(copy)
}

/// Remove the entry at `path` in place.
pub fn drop_mut(config: &mut Config, path: impl IntoPath) -> Result<(), SweepError> {
    let path = path.into_path(false)?;
    let (parent, key) = parent_mut(config, &path)?;
    match parent.shift_remove(key) {
        Some(_) => Ok(()),
        None => Err(key_not_found(&path)),
    }
}

/// Walk to the mapping that owns the final key of `path`.
fn parent_mut<'a, 'p>(
    config: &'a mut Config,
    path: &'p Path,
) -> Result<(&'a mut Config, &'p String), SweepError> {
    let Some((key, parents)) = path.split_last() else {
        return Err(SweepError::InvalidPath(
            "the empty path does not address a single entry".to_string(),
        ));
    };

    let mut node = config;
    for (depth, part) in parents.iter().enumerate() {
        node = match node.get_mut(part) {
            Some(Value::Map(child)) => child,
            Some(other) => {
                return Err(type_mismatch(
                    &path.prefix(depth + 1),
                    format!("expected a mapping, got {other}"),
                ));
            }
            None => return Err(key_not_found(&path.prefix(depth + 1))),
        };
    }
    Ok((node, key))
}

/// Merge configs in argument order.
///
/// Without `overwrite`, any duplicate or overlapping path is a conflict.
/// With `overwrite`, later values silently replace earlier ones, turning
/// leaves into mappings (and back) as needed.
pub fn merge<'a>(
    configs: impl IntoIterator<Item = &'a Config>,
    overwrite: bool,
) -> Result<Config, SweepError> {
    if !overwrite {
        return from_items(
            configs
                .into_iter()
                .flat_map(items)
                .map(|(path, value)| (path, value.clone())),
        );
    }

    let mut result = Config::new();
    for config in configs {
        for (path, value) in items(config) {
            insert_overwrite(&mut result, &path, value.clone());
        }
    }
    Ok(result)
}

fn insert_overwrite(config: &mut Config, path: &Path, value: Value) {
    let Some((key, parents)) = path.split_last() else {
        return;
    };

    let mut node = config;
    for part in parents {
        if !matches!(node.get(part), Some(Value::Map(_))) {
            node.insert(part.clone(), Value::Map(Config::new()));
        }
        let Some(Value::Map(child)) = node.get_mut(part) else {
            return;
        };
        node = child;
    }
    node.insert(key.clone(), value);
}

/// Copy of `config` without leaves equal to `target`.
///
/// Mappings left empty by the pruning are removed as well.
pub fn prune(config: &Config, target: &Value) -> Config {
    let mut pruned = Config::new();
    for (key, value) in config {
        match value {
            Value::Map(child) => {
                let child = prune(child, target);
                if !child.is_empty() {
                    pruned.insert(key.clone(), Value::Map(child));
                }
            }
            leaf if leaf == target => {}
            leaf => {
                pruned.insert(key.clone(), leaf.clone());
            }
        }
    }
    pruned
}
