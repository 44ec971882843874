//! Validated schema instances.

use super::validate::{FieldCtx, Mode, validate};
use super::{Schema, SchemaRegistry};
use crate::check::{UnhashablePolicy, check_model};
use crate::error::{SweepError, invalid_field, key_not_found, type_mismatch};
use crate::path::{IntoPath, Path};
use crate::value::{Config, Value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// A constructed, validated object of a schema.
///
/// Cloning copies every field value, so clones never share state.
#[derive(Clone)]
pub struct Instance {
    schema: Arc<Schema>,
    registry: SchemaRegistry,
    values: IndexMap<String, Value>,
}

impl Instance {
    pub(crate) fn new(
        schema: Arc<Schema>,
        registry: SchemaRegistry,
        values: IndexMap<String, Value>,
    ) -> Self {
        Self {
            schema,
            registry,
            values,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn schema_name(&self) -> &str {
        self.schema.name()
    }

    /// Registry this instance resolves nested schemas against.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Value of a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Value at a possibly nested path, descending through sub-instances
    /// and mappings.
    pub fn get_path(&self, path: impl IntoPath) -> Result<&Value, SweepError> {
        let path = path.into_path(false)?;
        let Some((first, rest)) = path.keys().split_first() else {
            return Err(SweepError::InvalidPath(
                "the empty path does not address a field".to_string(),
            ));
        };

        let mut current = self.values.get(first).ok_or_else(|| key_not_found(&path))?;
        for key in rest {
            current = match current {
                Value::Instance(instance) => instance.values.get(key),
                Value::Map(config) => config.get(key),
                _ => None,
            }
            .ok_or_else(|| key_not_found(&path))?;
        }
        Ok(current)
    }

    /// Field names and values in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Assign `value` to the field at `path`.
    ///
    /// Nested paths descend through sub-instances. The value is validated
    /// against the declared field type when the owning schema validates on
    /// assignment.
    pub fn set(&mut self, path: impl IntoPath, value: impl Into<Value>) -> Result<(), SweepError> {
        let path = path.into_path(false)?;
        self.set_at(&path, 0, value.into())
    }

    fn set_at(&mut self, path: &Path, depth: usize, value: Value) -> Result<(), SweepError> {
        let keys = path.keys();
        let Some(key) = keys.get(depth) else {
            return Err(SweepError::InvalidPath(
                "the empty path does not address a field".to_string(),
            ));
        };

        let Some(field) = self.schema.field(key) else {
            return Err(invalid_field(
                self.schema.name(),
                &path.prefix(depth + 1),
                "object has no such field",
            ));
        };

        if depth + 1 < keys.len() {
            return match self.values.get_mut(key) {
                Some(Value::Instance(child)) => child.set_at(path, depth + 1, value),
                Some(other) => Err(type_mismatch(
                    &path.prefix(depth + 1),
                    format!("expected a nested instance, got {}", other.kind()),
                )),
                None => Err(key_not_found(&path.prefix(depth + 1))),
            };
        }

        let value = if self.schema.validate_assignment() {
            let field_path = path.prefix(depth + 1);
            let ctx = FieldCtx {
                registry: &self.registry,
                schema: self.schema.name(),
                path: &field_path,
            };
            validate(&ctx, &field.ty, value, Mode::Lax)?
        } else {
            value
        };
        self.values.insert(key.clone(), value);
        Ok(())
    }

    /// Plain nested config of the field values; sub-instances become
    /// mappings.
    pub fn to_config(&self) -> Config {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), plain(value)))
            .collect()
    }

    /// Run [`check_model`] on this instance's schema.
    pub fn check(&self, policy: UnhashablePolicy) -> Result<Vec<String>, SweepError> {
        check_model(&self.registry, self.schema.name(), policy)
    }
}

fn plain(value: &Value) -> Value {
    match value {
        Value::Instance(instance) => Value::Map(instance.to_config()),
        Value::Map(config) => Value::Map(
            config
                .iter()
                .map(|(key, value)| (key.clone(), plain(value)))
                .collect(),
        ),
        Value::Tuple(items) => Value::Tuple(items.iter().map(plain).collect()),
        Value::List(items) => Value::List(items.iter().map(plain).collect()),
        Value::Set(items) => Value::Set(items.iter().map(plain).collect()),
        other => other.clone(),
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.values == other.values
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.schema.name())?;
        for (idx, (name, value)) in self.values.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
