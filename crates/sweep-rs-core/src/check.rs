//! Recursive strictness check over a schema graph.

use crate::error::{SweepError, path_label};
use crate::path::Path;
use crate::schema::{FieldType, Schema, SchemaRegistry};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// What to do when a field is declared with a non-hashable type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnhashablePolicy {
    /// Log a warning and report it to the caller.
    #[default]
    Warn,
    Ignore,
    /// Fail with [`SweepError::NonHashableField`].
    Raise,
}

impl UnhashablePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnhashablePolicy::Warn => "warn",
            UnhashablePolicy::Ignore => "ignore",
            UnhashablePolicy::Raise => "raise",
        }
    }
}

impl fmt::Display for UnhashablePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnhashablePolicy {
    type Err = SweepError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "warn" => Ok(UnhashablePolicy::Warn),
            "ignore" => Ok(UnhashablePolicy::Ignore),
            "raise" => Ok(UnhashablePolicy::Raise),
            other => Err(SweepError::InvalidArguments(format!(
                "unhashable policy must be one of warn, ignore or raise, got '{other}'"
            ))),
        }
    }
}

/// Check that `schema` and every schema reachable from it are strict.
///
/// Each schema must forbid unknown fields, validate on assignment and reject
/// arbitrary types. Fields declared as lists, sets or maps are handled by
/// `policy`; the warnings emitted under [`UnhashablePolicy::Warn`] are
/// returned. Shared and cyclic references are visited once.
pub fn check_model(
    registry: &SchemaRegistry,
    schema: &str,
    policy: UnhashablePolicy,
) -> Result<Vec<String>, SweepError> {
    let mut pending = vec![(Path::root(), FieldType::model(schema))];
    let mut checked: HashSet<String> = HashSet::new();
    let mut warnings = Vec::new();

    while let Some((path, ty)) = pending.pop() {
        match ty {
            FieldType::Model(name) => {
                if checked.contains(&name) {
                    continue;
                }
                let schema = registry.get(&name)?;
                check_schema_config(&schema, &path)?;
                checked.insert(name);
                for field in schema.fields() {
                    pending.push((path.join(field.name.as_str()), field.ty.clone()));
                }
            }
            FieldType::Union { members, .. } => {
                pending.extend(members.into_iter().map(|member| (path.clone(), member)));
            }
            FieldType::Tuple(inner) => pending.push((path, *inner)),
            FieldType::List(_) | FieldType::Set(_) | FieldType::Map(_) => {
                if let Some(message) = apply_policy(&path, &ty, policy)? {
                    warnings.push(message);
                }
                if let FieldType::List(inner) | FieldType::Set(inner) | FieldType::Map(inner) = ty
                {
                    pending.push((path, *inner));
                }
            }
            _ => {}
        }
    }

    debug!(
        "checked schema graph (root={schema}, schemas={}, warnings={})",
        checked.len(),
        warnings.len()
    );
    Ok(warnings)
}

fn check_schema_config(schema: &Schema, path: &Path) -> Result<(), SweepError> {
    let reason = if !schema.forbid_unknown() {
        "unknown fields must be forbidden, otherwise typos in field names are silently ignored"
    } else if !schema.validate_assignment() {
        "assignments must be validated, otherwise field types are not verified"
    } else if schema.arbitrary_types() {
        "arbitrary types must not be allowed; build configs from basic types only"
    } else {
        return Ok(());
    };
    Err(SweepError::SchemaConfig {
        schema: schema.name().to_string(),
        path: path_label(path),
        reason: reason.to_string(),
    })
}

fn apply_policy(
    path: &Path,
    ty: &FieldType,
    policy: UnhashablePolicy,
) -> Result<Option<String>, SweepError> {
    let err = SweepError::NonHashableField {
        path: path_label(path),
        type_name: ty.type_name(),
    };
    match policy {
        UnhashablePolicy::Ignore => Ok(None),
        UnhashablePolicy::Raise => Err(err),
        UnhashablePolicy::Warn => {
            let message = err.to_string();
            warn!("{message}");
            Ok(Some(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn register(registry: &SchemaRegistry, builder: crate::schema::SchemaBuilder) {
        registry
            .register(builder.build().expect("schema"))
            .expect("register");
    }

    #[test]
    fn strict_schemas_pass() {
        let registry = SchemaRegistry::new();
        register(
            &registry,
            Schema::builder("Sub").field_with_default("x", FieldType::Int, 1),
        );
        register(
            &registry,
            Schema::builder("Model")
                .field("sub", FieldType::optional(FieldType::model("Sub")))
                .field_with_default("name", FieldType::Str, "a"),
        );
        let warnings =
            check_model(&registry, "Model", UnhashablePolicy::Raise).expect("strict model");
        assert!(warnings.is_empty());
    }

    #[test]
    fn nested_lenient_schema_is_reported_with_path() {
        let registry = SchemaRegistry::new();
        register(
            &registry,
            Schema::builder("Loose")
                .field_with_default("x", FieldType::Int, 1)
                .forbid_unknown(false),
        );
        register(
            &registry,
            Schema::builder("Outer").field("inner", FieldType::model("Loose")),
        );
        let err = check_model(&registry, "Outer", UnhashablePolicy::Warn).unwrap_err();
        match err {
            SweepError::SchemaConfig { schema, path, .. } => {
                assert_eq!(schema, "Loose");
                assert_eq!(path, "inner");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn assignment_and_arbitrary_types_are_required_settings() {
        let registry = SchemaRegistry::new();
        register(
            &registry,
            Schema::builder("NoAssign").validate_assignment(false),
        );
        register(&registry, Schema::builder("Arbitrary").arbitrary_types(true));
        for name in ["NoAssign", "Arbitrary"] {
            assert!(matches!(
                check_model(&registry, name, UnhashablePolicy::Ignore),
                Err(SweepError::SchemaConfig { path, .. }) if path == "root"
            ));
        }
    }

    #[test]
    fn cyclic_references_terminate() {
        let registry = SchemaRegistry::new();
        register(
            &registry,
            Schema::builder("Node")
                .field("value", FieldType::Int)
                .field_with_default(
                    "next",
                    FieldType::optional(FieldType::model("Node")),
                    crate::Value::Null,
                ),
        );
        assert!(check_model(&registry, "Node", UnhashablePolicy::Raise).is_ok());
    }

    #[test]
    fn unhashable_policy_controls_container_fields() {
        let registry = SchemaRegistry::new();
        register(
            &registry,
            Schema::builder("Sub").field("tags", FieldType::list(FieldType::Str)),
        );
        register(
            &registry,
            Schema::builder("Model").field("sub", FieldType::model("Sub")),
        );

        let ignored = check_model(&registry, "Model", UnhashablePolicy::Ignore).expect("ignore");
        assert!(ignored.is_empty());

        let warned = check_model(&registry, "Model", UnhashablePolicy::Warn).expect("warn");
        assert_eq!(warned.len(), 1);
        assert!(warned[0].contains("list[str]"));
        assert!(warned[0].contains("sub.tags"));

        let raised = check_model(&registry, "Model", UnhashablePolicy::Raise);
        assert!(matches!(
            raised,
            Err(SweepError::NonHashableField { path, .. }) if path == "sub.tags"
        ));
    }

    #[test]
    fn unknown_schema_is_an_error() {
        let registry = SchemaRegistry::new();
        assert!(matches!(
            check_model(&registry, "Nope", UnhashablePolicy::Warn),
            Err(SweepError::UnknownSchema(_))
        ));
    }

    #[test]
    fn policy_parses_from_strings() {
        assert_eq!(
            "raise".parse::<UnhashablePolicy>().expect("raise"),
            UnhashablePolicy::Raise
        );
        assert!("loud".parse::<UnhashablePolicy>().is_err());
        assert_eq!(UnhashablePolicy::default(), UnhashablePolicy::Warn);
        assert_eq!(UnhashablePolicy::Ignore.to_string(), "ignore");
    }
}
