//! Combinators over lists of partial configs.
//!
//! Everything is built on [`combine`]: a combiner turns the inputs into
//! tuples of configs that are merged, a chainer flattens them into a single
//! sequence.

use crate::error::SweepError;
use crate::nested::{from_items, merge};
use crate::path::IntoPath;
use crate::value::{Config, Value};
use std::collections::VecDeque;

/// Produces tuples of configs; each tuple is merged into one config.
pub type Combiner = dyn Fn(Vec<Vec<Config>>) -> Result<Vec<Vec<Config>>, SweepError>;

/// Flattens the inputs into one sequence of configs.
pub type Chainer = dyn Fn(Vec<Vec<Config>>) -> Vec<Value>;

/// Combine config lists with exactly one of `combiner` or `chainer`.
pub fn combine(
    configs: Vec<Vec<Config>>,
    combiner: Option<&Combiner>,
    chainer: Option<&Chainer>,
) -> Result<Vec<Config>, SweepError> {
    match (combiner, chainer) {
        (Some(combiner), None) => combiner(configs)?
            .iter()
            .map(|combo| merge(combo, false))
            .collect(),
        (None, Some(chainer)) => chainer(configs)
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Map(config) => Ok(config),
                other => Err(SweepError::InvalidChainResult {
                    index,
                    kind: other.kind().to_string(),
                }),
            })
            .collect(),
        (Some(_), Some(_)) => Err(SweepError::InvalidArguments(
            "only one of combiner or chainer may be provided".to_string(),
        )),
        (None, None) => Err(SweepError::InvalidArguments(
            "one of combiner or chainer must be provided".to_string(),
        )),
    }
}

/// Cartesian product; the rightmost input varies fastest.
pub fn cartesian(inputs: Vec<Vec<Config>>) -> Result<Vec<Vec<Config>>, SweepError> {
    let mut combos: Vec<Vec<Config>> = vec![Vec::new()];
    for input in inputs {
        let mut next = Vec::with_capacity(combos.len() * input.len());
        for prefix in &combos {
            for item in &input {
                let mut combo = prefix.clone();
                combo.push(item.clone());
                next.push(combo);
            }
        }
        combos = next;
    }
    Ok(combos)
}

/// Element-wise tuples; all inputs must have the same length.
pub fn strict_zip(inputs: Vec<Vec<Config>>) -> Result<Vec<Vec<Config>>, SweepError> {
    let Some(expected) = inputs.first().map(Vec::len) else {
        return Ok(Vec::new());
    };
    if let Some((index, input)) = inputs
        .iter()
        .enumerate()
        .find(|(_, input)| input.len() != expected)
    {
        return Err(SweepError::LengthMismatch {
            index,
            expected,
            found: input.len(),
        });
    }

    let mut iters: Vec<_> = inputs.into_iter().map(Vec::into_iter).collect();
    let mut combos = Vec::with_capacity(expected);
    for _ in 0..expected {
        combos.push(iters.iter_mut().filter_map(|iter| iter.next()).collect());
    }
    Ok(combos)
}

/// All inputs one after the other.
pub fn sequential(inputs: Vec<Vec<Config>>) -> Vec<Value> {
    inputs.into_iter().flatten().map(Value::Map).collect()
}

/// One item from each input in turn, skipping exhausted inputs.
pub fn round_robin(inputs: Vec<Vec<Config>>) -> Vec<Value> {
    let mut queues: VecDeque<_> = inputs.into_iter().map(Vec::into_iter).collect();
    let mut out = Vec::new();
    while let Some(mut queue) = queues.pop_front() {
        if let Some(item) = queue.next() {
            out.push(Value::Map(item));
            queues.push_back(queue);
        }
    }
    out
}

/// Every combination of the inputs.
///
/// ```
/// use sweep_rs_core::{field, product};
///
/// let configs = product([
///     field("a", [1, 2], true).unwrap(),
///     field("b", [3, 4], true).unwrap(),
/// ])
/// .unwrap();
/// assert_eq!(configs.len(), 4);
/// ```
pub fn product(configs: impl IntoIterator<Item = Vec<Config>>) -> Result<Vec<Config>, SweepError> {
    combine(configs.into_iter().collect(), Some(&cartesian), None)
}

/// Element-wise combination of equally long inputs.
pub fn zip(configs: impl IntoIterator<Item = Vec<Config>>) -> Result<Vec<Config>, SweepError> {
    combine(configs.into_iter().collect(), Some(&strict_zip), None)
}

/// Concatenation of the inputs.
pub fn chain(configs: impl IntoIterator<Item = Vec<Config>>) -> Result<Vec<Config>, SweepError> {
    combine(configs.into_iter().collect(), None, Some(&sequential))
}

/// Interleaving of the inputs.
pub fn roundrobin(
    configs: impl IntoIterator<Item = Vec<Config>>,
) -> Result<Vec<Config>, SweepError> {
    combine(configs.into_iter().collect(), None, Some(&round_robin))
}

/// One single-leaf config per value, all at `path`.
///
/// With `check`, every value must be hashable or a schema instance so that
/// configs cannot share mutable state.
pub fn field<V: Into<Value>>(
    path: impl IntoPath,
    values: impl IntoIterator<Item = V>,
    check: bool,
) -> Result<Vec<Config>, SweepError> {
    let path = path.into_path(true)?;
    values
        .into_iter()
        .map(Into::into)
        .map(|value: Value| {
            if check && !(value.is_hashable() || matches!(value, Value::Instance(_))) {
                return Err(SweepError::UnhashableValue {
                    value: value.to_string(),
                    kind: value.kind().to_string(),
                });
            }
            from_items([(path.clone(), value)])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use pretty_assertions::assert_eq;

    fn a_b() -> (Vec<Config>, Vec<Config>) {
        (
            field("a", [1, 2], true).expect("a"),
            field("b", [3, 4], true).expect("b"),
        )
    }

    #[test]
    fn field_builds_single_leaf_configs() {
        let configs = field("a.b", [1, 2], true).expect("field");
        assert_eq!(
            configs,
            vec![
                config! { "a" => config! { "b" => 1 } },
                config! { "a" => config! { "b" => 2 } },
            ]
        );
        let empty: Vec<Value> = Vec::new();
        assert!(field("a", empty, true).expect("empty").is_empty());
    }

    #[test]
    fn field_rejects_unhashable_values_when_checking() {
        let values = vec![Value::List(vec![Value::Int(1)])];
        assert!(matches!(
            field("a", values.clone(), true),
            Err(SweepError::UnhashableValue { .. })
        ));
        assert_eq!(field("a", values, false).expect("unchecked").len(), 1);
    }

    #[test]
    fn field_validates_sequence_keys() {
        assert!(matches!(
            field(["a", "0b"], [1], true),
            Err(SweepError::InvalidPath(_))
        ));
    }

    #[test]
    fn product_varies_rightmost_fastest() {
        let (a, b) = a_b();
        assert_eq!(
            product([a, b]).expect("product"),
            vec![
                config! { "a" => 1, "b" => 3 },
                config! { "a" => 1, "b" => 4 },
                config! { "a" => 2, "b" => 3 },
                config! { "a" => 2, "b" => 4 },
            ]
        );
    }

    #[test]
    fn product_of_nothing_is_one_empty_config() {
        assert_eq!(product(Vec::<Vec<Config>>::new()).expect("empty"), vec![Config::new()]);
    }

    #[test]
    fn product_detects_overlapping_fields() {
        let a = field("a", [1], true).expect("a");
        let nested = field("a.b", [2], true).expect("a.b");
        assert!(matches!(
            product([a, nested]),
            Err(SweepError::Conflict { .. })
        ));
    }

    #[test]
    fn zip_pairs_elements() {
        let (a, b) = a_b();
        assert_eq!(
            zip([a, b]).expect("zip"),
            vec![config! { "a" => 1, "b" => 3 }, config! { "a" => 2, "b" => 4 }]
        );
    }

    #[test]
    fn zip_requires_equal_lengths() {
        let a = field("a", [1, 2, 3], true).expect("a");
        let b = field("b", [3, 4], true).expect("b");
        assert!(matches!(
            zip([a, b]),
            Err(SweepError::LengthMismatch {
                index: 1,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn chain_concatenates() {
        let (a, b) = a_b();
        assert_eq!(
            chain([a, b]).expect("chain"),
            vec![
                config! { "a" => 1 },
                config! { "a" => 2 },
                config! { "b" => 3 },
                config! { "b" => 4 },
            ]
        );
    }

    #[test]
    fn roundrobin_interleaves_uneven_inputs() {
        let a = field("a", [1, 2, 3], true).expect("a");
        let b = field("b", [3, 4], true).expect("b");
        assert_eq!(
            roundrobin([a, b]).expect("roundrobin"),
            vec![
                config! { "a" => 1 },
                config! { "b" => 3 },
                config! { "a" => 2 },
                config! { "b" => 4 },
                config! { "a" => 3 },
            ]
        );
    }

    #[test]
    fn combine_requires_exactly_one_strategy() {
        let (a, b) = a_b();
        assert!(matches!(
            combine(vec![a.clone(), b.clone()], None, None),
            Err(SweepError::InvalidArguments(_))
        ));
        assert!(matches!(
            combine(vec![a, b], Some(&cartesian), Some(&sequential)),
            Err(SweepError::InvalidArguments(_))
        ));
    }

    #[test]
    fn combine_rejects_chainers_yielding_non_configs() {
        let bad = |inputs: Vec<Vec<Config>>| -> Vec<Value> {
            inputs.into_iter().flatten().map(|_| Value::Int(1)).collect()
        };
        let (a, _) = a_b();
        assert!(matches!(
            combine(vec![a], None, Some(&bad)),
            Err(SweepError::InvalidChainResult { index: 0, .. })
        ));
    }

    #[test]
    fn combine_accepts_custom_combiners() {
        let reversed_pairs = |inputs: Vec<Vec<Config>>| -> Result<Vec<Vec<Config>>, SweepError> {
            let mut combos = strict_zip(inputs)?;
            combos.reverse();
            Ok(combos)
        };
        let (a, b) = a_b();
        assert_eq!(
            combine(vec![a, b], Some(&reversed_pairs), None).expect("custom"),
            vec![config! { "a" => 2, "b" => 4 }, config! { "a" => 1, "b" => 3 }]
        );
    }
}
