//! Field value validation against declared types.

use super::{FieldType, SchemaRegistry};
use crate::error::{SweepError, invalid_field};
use crate::path::Path;
use crate::value::{Config, Value};

/// How strictly a value must match its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// No coercion at all.
    Exact,
    /// `int` widens to `float`, tuples and lists interchange, sequences
    /// collect into sets.
    Lax,
}

/// Validation context: the schema owning the field and the field path.
pub(crate) struct FieldCtx<'a> {
    pub(crate) registry: &'a SchemaRegistry,
    pub(crate) schema: &'a str,
    pub(crate) path: &'a Path,
}

impl FieldCtx<'_> {
    fn error(&self, message: impl Into<String>) -> SweepError {
        invalid_field(self.schema, self.path, message)
    }

    fn mismatch(&self, ty: &FieldType, value: &Value) -> SweepError {
        self.error(format!("expected {ty}, got {} ({value})", value.kind()))
    }
}

/// Validate `value` against `ty`, returning the (possibly coerced) value.
pub(crate) fn validate(
    ctx: &FieldCtx<'_>,
    ty: &FieldType,
    value: Value,
    mode: Mode,
) -> Result<Value, SweepError> {
    match (ty, value) {
        (FieldType::Any | FieldType::Opaque(_), value) => Ok(value),
        (FieldType::None, Value::Null) => Ok(Value::Null),
        (FieldType::Bool, Value::Bool(flag)) => Ok(Value::Bool(flag)),
        (FieldType::Int, Value::Int(number)) => Ok(Value::Int(number)),
        (FieldType::Float, Value::Float(number)) => Ok(Value::Float(number)),
        (FieldType::Float, Value::Int(number)) if mode == Mode::Lax => {
            Ok(Value::Float(number as f64))
        }
        (FieldType::Str, Value::Str(text)) => Ok(Value::Str(text)),
        (FieldType::Literal(expected), value) => {
            if &value == expected {
                Ok(value)
            } else {
                Err(ctx.error(format!("expected {expected}, got {value}")))
            }
        }
        (FieldType::Tuple(inner), Value::Tuple(items)) => {
            Ok(Value::Tuple(validate_items(ctx, inner, items, mode)?))
        }
        (FieldType::Tuple(inner), Value::List(items)) if mode == Mode::Lax => {
            Ok(Value::Tuple(validate_items(ctx, inner, items, mode)?))
        }
        (FieldType::List(inner), Value::List(items)) => {
            Ok(Value::List(validate_items(ctx, inner, items, mode)?))
        }
        (FieldType::List(inner), Value::Tuple(items)) if mode == Mode::Lax => {
            Ok(Value::List(validate_items(ctx, inner, items, mode)?))
        }
        (FieldType::Set(inner), Value::Set(items)) => {
            Ok(Value::set(validate_items(ctx, inner, items, mode)?))
        }
        (FieldType::Set(inner), Value::List(items) | Value::Tuple(items))
            if mode == Mode::Lax =>
        {
            Ok(Value::set(validate_items(ctx, inner, items, mode)?))
        }
        (FieldType::Map(inner), Value::Map(entries)) => {
            let mut validated = Config::new();
            for (key, entry) in entries {
                validated.insert(key, validate(ctx, inner, entry, mode)?);
            }
            Ok(Value::Map(validated))
        }
        (FieldType::Model(name), Value::Instance(instance)) => {
            if instance.schema_name() == name {
                Ok(Value::Instance(instance))
            } else {
                Err(ctx.error(format!(
                    "expected an instance of {name}, got {}",
                    instance.schema_name()
                )))
            }
        }
        (FieldType::Model(name), Value::Map(data)) => Ok(Value::Instance(
            ctx.registry.construct_at(name, data, ctx.path)?,
        )),
        (
            FieldType::Union {
                members,
                discriminator: Some(tag),
            },
            value,
        ) => validate_discriminated(ctx, members, tag, value),
        (FieldType::Union { members, .. }, value) => validate_union(ctx, ty, members, value),
        (ty, value) => Err(ctx.mismatch(ty, &value)),
    }
}

fn validate_items(
    ctx: &FieldCtx<'_>,
    inner: &FieldType,
    items: Vec<Value>,
    mode: Mode,
) -> Result<Vec<Value>, SweepError> {
    items
        .into_iter()
        .map(|item| validate(ctx, inner, item, mode))
        .collect()
}

/// Try members left to right, first without coercion and then with it.
fn validate_union(
    ctx: &FieldCtx<'_>,
    ty: &FieldType,
    members: &[FieldType],
    value: Value,
) -> Result<Value, SweepError> {
    for mode in [Mode::Exact, Mode::Lax] {
        for member in members {
            if let Ok(validated) = validate(ctx, member, value.clone(), mode) {
                return Ok(validated);
            }
        }
    }
    Err(ctx.mismatch(ty, &value))
}

/// Pick the model member whose discriminator literal equals the input's tag.
fn validate_discriminated(
    ctx: &FieldCtx<'_>,
    members: &[FieldType],
    tag_field: &str,
    value: Value,
) -> Result<Value, SweepError> {
    let tag = match &value {
        Value::Instance(instance) => instance.get(tag_field).cloned(),
        Value::Map(data) => data.get(tag_field).cloned(),
        other => {
            return Err(ctx.error(format!(
                "discriminated union expects a mapping or instance, got {}",
                other.kind()
            )));
        }
    };
    let Some(tag) = tag else {
        return Err(ctx.error(format!(
            "unable to extract tag using discriminator '{tag_field}'"
        )));
    };

    for member in members {
        let FieldType::Model(name) = member else {
            continue;
        };
        let schema = ctx.registry.get(name)?;
        let selects = schema.field(tag_field).is_some_and(|field| {
            matches!(&field.ty, FieldType::Literal(literal) if *literal == tag)
        });
        if selects {
            return validate(ctx, member, value, Mode::Lax);
        }
    }

    Err(ctx.error(format!(
        "input tag {tag} found using '{tag_field}' does not match any of the expected tags"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use pretty_assertions::assert_eq;

    fn check(ty: &FieldType, value: Value, mode: Mode) -> Result<Value, SweepError> {
        let registry = SchemaRegistry::new();
        let path = Path::root().join("x");
        let ctx = FieldCtx {
            registry: &registry,
            schema: "Test",
            path: &path,
        };
        validate(&ctx, ty, value, mode)
    }

    #[test]
    fn ints_widen_to_floats_only_in_lax_mode() {
        assert_eq!(
            check(&FieldType::Float, Value::Int(2), Mode::Lax).expect("lax"),
            Value::Float(2.0)
        );
        assert!(check(&FieldType::Float, Value::Int(2), Mode::Exact).is_err());
        assert!(check(&FieldType::Int, Value::Float(2.0), Mode::Lax).is_err());
    }

    #[test]
    fn unions_prefer_exact_matches() {
        let ty = FieldType::union([FieldType::Float, FieldType::Int]);
        assert_eq!(
            check(&ty, Value::Int(3), Mode::Lax).expect("int"),
            Value::Int(3)
        );
        assert_eq!(
            check(&ty, Value::Float(3.5), Mode::Lax).expect("float"),
            Value::Float(3.5)
        );
    }

    #[test]
    fn sequences_coerce_between_kinds() {
        let tuple = FieldType::tuple(FieldType::Int);
        let list = vec![Value::Int(1), Value::Int(2)];
        assert_eq!(
            check(&tuple, Value::List(list.clone()), Mode::Lax).expect("tuple"),
            Value::Tuple(list.clone())
        );

        let set = FieldType::set(FieldType::Int);
        let coerced = check(&set, Value::List(vec![Value::Int(1), Value::Int(1)]), Mode::Lax)
            .expect("set");
        assert_eq!(coerced, Value::Set(vec![Value::Int(1)]));
    }

    #[test]
    fn literals_and_mismatches_report_field() {
        assert!(check(&FieldType::literal("a"), Value::from("a"), Mode::Lax).is_ok());
        let err = check(&FieldType::Str, Value::Int(1), Mode::Lax).unwrap_err();
        match err {
            SweepError::Validation { schema, path, .. } => {
                assert_eq!(schema, "Test");
                assert_eq!(path, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn discriminated_unions_select_by_tag() {
        let registry = SchemaRegistry::new();
        for (name, tag) in [("Cat", "cat"), ("Dog", "dog")] {
            let schema = Schema::builder(name)
                .field_with_default("kind", FieldType::literal(tag), tag)
                .field_with_default("age", FieldType::Int, 1)
                .build()
                .expect("schema");
            registry.register(schema).expect("register");
        }
        let ty = FieldType::discriminated(
            "kind",
            [FieldType::model("Cat"), FieldType::model("Dog")],
        );
        let path = Path::root().join("pet");
        let ctx = FieldCtx {
            registry: &registry,
            schema: "Owner",
            path: &path,
        };

        let data = crate::config! { "kind" => "dog", "age" => 3 };
        let pet = validate(&ctx, &ty, Value::Map(data), Mode::Lax).expect("dog");
        let pet = pet.as_instance().expect("instance");
        assert_eq!(pet.schema_name(), "Dog");
        assert_eq!(pet.get("age"), Some(&Value::Int(3)));

        let missing = crate::config! { "age" => 3 };
        assert!(validate(&ctx, &ty, Value::Map(missing), Mode::Lax).is_err());
        let unknown = crate::config! { "kind" => "fish" };
        assert!(validate(&ctx, &ty, Value::Map(unknown), Mode::Lax).is_err());
    }
}
