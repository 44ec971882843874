//! Conversion between sweep values and JSON values.

use crate::IoError;
use serde_json::{Map, Number, Value as JsonValue};
use sweep_rs_core::{Config, Instance, Path, Value};

/// Convert a value to JSON. Sequences and sets become arrays, instances
/// become objects in field order.
pub fn to_json(value: &Value) -> Result<JsonValue, IoError> {
    value_to_json(value, &Path::root())
}

/// Convert a config to a JSON object.
pub fn config_to_json(config: &Config) -> Result<JsonValue, IoError> {
    config_to_object(config.iter(), &Path::root())
}

/// Convert an instance to a JSON object.
pub fn instance_to_json(instance: &Instance) -> Result<JsonValue, IoError> {
    config_to_object(instance.fields(), &Path::root())
}

fn value_to_json(value: &Value, path: &Path) -> Result<JsonValue, IoError> {
    Ok(match value {
        Value::Null => JsonValue::Null,
        Value::Bool(flag) => JsonValue::Bool(*flag),
        Value::Int(number) => JsonValue::Number(Number::from(*number)),
        Value::Float(number) => match Number::from_f64(*number) {
            Some(number) => JsonValue::Number(number),
            None => {
                return Err(IoError::Unrepresentable {
                    path: label(path),
                    message: format!("non-finite float {number}"),
                });
            }
        },
        Value::Str(text) => JsonValue::String(text.clone()),
        Value::Tuple(items) | Value::List(items) | Value::Set(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| value_to_json(item, path))
                .collect::<Result<_, _>>()?,
        ),
        Value::Map(config) => config_to_object(config.iter(), path)?,
        Value::Instance(instance) => config_to_object(instance.fields(), path)?,
        Value::Default => {
            return Err(IoError::Unrepresentable {
                path: label(path),
                message: "the DefaultValue placeholder has no serialized form".to_string(),
            });
        }
    })
}

fn config_to_object<'a, K: AsRef<str> + 'a>(
    entries: impl Iterator<Item = (K, &'a Value)>,
    path: &Path,
) -> Result<JsonValue, IoError> {
    let mut object = Map::new();
    for (key, value) in entries {
        let key = key.as_ref();
        object.insert(key.to_string(), value_to_json(value, &path.join(key))?);
    }
    Ok(JsonValue::Object(object))
}

fn label(path: &Path) -> String {
    if path.is_empty() {
        "root".to_string()
    } else {
        path.to_string()
    }
}

/// Convert JSON to a value. Arrays become lists and objects become maps;
/// schema validation coerces lists into tuples or sets where declared.
pub fn from_json(value: JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(flag) => Value::Bool(flag),
        JsonValue::Number(number) => match number.as_i64() {
            Some(int) => Value::Int(int),
            None => Value::Float(number.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(text) => Value::Str(text),
        JsonValue::Array(items) => Value::List(items.into_iter().map(from_json).collect()),
        JsonValue::Object(object) => Value::Map(object_to_config(object)),
    }
}

/// Convert a JSON object to a config.
pub fn config_from_json(value: JsonValue) -> Result<Config, IoError> {
    match value {
        JsonValue::Object(object) => Ok(object_to_config(object)),
        other => Err(IoError::Unrepresentable {
            path: "root".to_string(),
            message: format!("expected an object, got {other}"),
        }),
    }
}

fn object_to_config(object: Map<String, JsonValue>) -> Config {
    object
        .into_iter()
        .map(|(key, value)| (key, from_json(value)))
        .collect()
}
