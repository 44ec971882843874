//! Name-keyed schema registry and instance construction.

use super::validate::{FieldCtx, Mode, validate};
use super::{Instance, Schema, union};
use crate::error::{SweepError, invalid_field};
use crate::path::Path;
use crate::value::{Config, Value};
use indexmap::IndexMap;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Shared registry of schemas, resolved by name.
#[derive(Clone, Default)]
pub struct SchemaRegistry {
    schemas: Arc<RwLock<HashMap<String, Arc<Schema>>>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its name.
    pub fn register(&self, schema: Schema) -> Result<Arc<Schema>, SweepError> {
        let mut schemas = self.schemas.write();
        if schemas.contains_key(schema.name()) {
            return Err(SweepError::DuplicateSchema(schema.name().to_string()));
        }
        let schema = Arc::new(schema);
        schemas.insert(schema.name().to_string(), schema.clone());
        debug!(
            "registered schema (name={}, fields={})",
            schema.name(),
            schema.fields().len()
        );
        Ok(schema)
    }

    /// Fetch a registered schema by name.
    pub fn get(&self, name: &str) -> Result<Arc<Schema>, SweepError> {
        self.schemas
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| SweepError::UnknownSchema(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.read().contains_key(name)
    }

    /// Registered schema names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Construct and validate an instance of `name` from raw data.
    pub fn construct(&self, name: &str, data: Config) -> Result<Instance, SweepError> {
        self.construct_at(name, data, &Path::root())
    }

    /// Construct an instance nested at `path` (used in error messages).
    pub(crate) fn construct_at(
        &self,
        name: &str,
        mut data: Config,
        path: &Path,
    ) -> Result<Instance, SweepError> {
        let schema = self.get(name)?;

        let unknown: Vec<String> = data
            .keys()
            .filter(|key| schema.field(key).is_none())
            .cloned()
            .collect();
        for key in unknown {
            if schema.forbid_unknown() {
                return Err(invalid_field(
                    name,
                    &path.join(key.as_str()),
                    "extra inputs are not permitted",
                ));
            }
            debug!("ignoring unknown field (schema={name}, field={key})");
            data.shift_remove(&key);
        }

        // Defaults go through the union guard like caller input.
        for field in schema.fields() {
            if !data.get(&field.name).is_none_or(Value::is_default) {
                continue;
            }
            if let Some(default) = &field.default {
                data.insert(field.name.clone(), default.clone());
            }
        }

        union::guard(self, &schema, &mut data, path)?;

        let mut values = IndexMap::with_capacity(schema.fields().len());
        for field in schema.fields() {
            let field_path = path.join(field.name.as_str());
            let value = match data.shift_remove(&field.name) {
                Some(value) if !value.is_default() => value,
                _ => match &field.default {
                    Some(default) => default.clone(),
                    None => return Err(invalid_field(name, &field_path, "field required")),
                },
            };
            let ctx = FieldCtx {
                registry: self,
                schema: name,
                path: &field_path,
            };
            values.insert(field.name.clone(), validate(&ctx, &field.ty, value, Mode::Lax)?);
        }

        Ok(Instance::new(schema, self.clone(), values))
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("schemas", &self.names())
            .finish()
    }
}
