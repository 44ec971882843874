//! Rejects raw mappings that could construct more than one union member.

use super::{FieldType, Schema, SchemaRegistry};
use crate::error::{SweepError, path_label};
use crate::path::Path;
use crate::value::{Config, Value};
use log::debug;

/// Resolve raw mappings assigned to plain (non-discriminated) union fields.
///
/// Each model member is tried on its own copy of the mapping. Two or more
/// successes are an [`SweepError::AmbiguousUnion`]; a single success replaces
/// the mapping with the constructed instance. Without any success the input is
/// left for ordinary union resolution.
pub(crate) fn guard(
    registry: &SchemaRegistry,
    schema: &Schema,
    data: &mut Config,
    path: &Path,
) -> Result<(), SweepError> {
    for field in schema.fields() {
        let FieldType::Union {
            members,
            discriminator: None,
        } = &field.ty
        else {
            continue;
        };
        let Some(Value::Map(raw)) = data.get(&field.name) else {
            continue;
        };
        let raw = raw.clone();
        let field_path = path.join(field.name.as_str());

        let mut matches = Vec::new();
        for member in members {
            let FieldType::Model(name) = member else {
                continue;
            };
            if let Ok(instance) = registry.construct_at(name, raw.clone(), &field_path) {
                matches.push(instance);
            }
        }

        if matches.len() > 1 {
            return Err(SweepError::AmbiguousUnion {
                path: path_label(&field_path),
                candidates: matches
                    .iter()
                    .map(|instance| instance.schema_name().to_string())
                    .collect(),
            });
        }
        if let Some(instance) = matches.pop() {
            debug!(
                "resolved union member (path={}, schema={})",
                path_label(&field_path),
                instance.schema_name()
            );
            data.insert(field.name.clone(), Value::Instance(instance));
        }
    }
    Ok(())
}
