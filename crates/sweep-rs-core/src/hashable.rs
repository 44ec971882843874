//! Hashable projections of configs, values and instances.
//!
//! Sets and mappings are projected onto ordered collections so that two
//! equal configs always produce equal keys regardless of insertion order.

use crate::error::SweepError;
use crate::schema::Instance;
use crate::value::{Config, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Equality- and hash-preserving key for a config item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashKey {
    Null,
    Bool(bool),
    Int(i64),
    /// Bit pattern of a float with a fractional part (or out of int range).
    Float(u64),
    Str(String),
    Default,
    Tuple(Vec<HashKey>),
    List(Vec<HashKey>),
    Set(BTreeSet<HashKey>),
    Map(BTreeMap<String, HashKey>),
    Instance {
        schema: String,
        fields: Vec<(String, HashKey)>,
    },
}

impl HashKey {
    /// Project a value, freezing mutable containers.
    pub fn of(value: &Value) -> Result<Self, SweepError> {
        Ok(match value {
            Value::Null => HashKey::Null,
            Value::Bool(flag) => HashKey::Bool(*flag),
            Value::Int(number) => HashKey::Int(*number),
            Value::Float(number) => float_key(*number),
            Value::Str(text) => HashKey::Str(text.clone()),
            Value::Default => HashKey::Default,
            Value::Tuple(items) => HashKey::Tuple(frozen(items)?),
            Value::List(items) => HashKey::List(frozen(items)?),
            Value::Set(items) => HashKey::Set(frozen(items)?.into_iter().collect()),
            Value::Map(config) => HashKey::of_config(config)?,
            Value::Instance(instance) => HashKey::of_instance(instance)?,
        })
    }

    /// Project a config onto an order-independent key.
    pub fn of_config(config: &Config) -> Result<Self, SweepError> {
        let mut entries = BTreeMap::new();
        for (key, value) in config {
            entries.insert(key.clone(), HashKey::of(value)?);
        }
        Ok(HashKey::Map(entries))
    }

    /// Project an instance onto its schema name and field values.
    pub fn of_instance(instance: &Instance) -> Result<Self, SweepError> {
        let fields = instance
            .fields()
            .map(|(name, value)| Ok((name.to_string(), HashKey::of(value)?)))
            .collect::<Result<Vec<_>, SweepError>>()?;
        Ok(HashKey::Instance {
            schema: instance.schema_name().to_string(),
            fields,
        })
    }
}

/// Whole floats share the key of the equal int, so `1` and `1.0` collide.
fn float_key(number: f64) -> HashKey {
    if number.fract() == 0.0 && number >= i64::MIN as f64 && number < i64::MAX as f64 {
        HashKey::Int(number as i64)
    } else {
        HashKey::Float(number.to_bits())
    }
}

/// Elements of a sequence or set; each must itself be hashable.
fn frozen(items: &[Value]) -> Result<Vec<HashKey>, SweepError> {
    items
        .iter()
        .map(|item| match item {
            Value::Map(_) | Value::List(_) | Value::Set(_) => {
                Err(SweepError::UnhashableType(item.kind().to_string()))
            }
            other => HashKey::of(other),
        })
        .collect()
}

/// Items that can be checked for uniqueness.
pub trait AsHashable {
    /// Hashable projection of the item.
    fn as_hashable(&self) -> Result<HashKey, SweepError>;

    /// Rendering used in duplicate reports.
    fn describe(&self) -> String;
}

impl AsHashable for Config {
    fn as_hashable(&self) -> Result<HashKey, SweepError> {
        HashKey::of_config(self)
    }

    fn describe(&self) -> String {
        crate::value::display_config(self).to_string()
    }
}

impl AsHashable for Instance {
    fn as_hashable(&self) -> Result<HashKey, SweepError> {
        HashKey::of_instance(self)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl AsHashable for Value {
    fn as_hashable(&self) -> Result<HashKey, SweepError> {
        HashKey::of(self)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

/// Hashable projection of a config, instance or value.
pub fn as_hashable<T: AsHashable + ?Sized>(item: &T) -> Result<HashKey, SweepError> {
    item.as_hashable()
}
