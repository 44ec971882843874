//! Field-level differences between two instances.

use crate::error::{SweepError, type_mismatch};
use crate::nested::from_items;
use crate::path::Path;
use crate::schema::Instance;
use crate::value::{Config, Value};

/// Nested config of `(left, right)` tuples for every field that differs.
///
/// Sub-instances of the same schema are compared field by field; anything
/// else is compared as a whole.
pub fn model_diff(left: &Instance, right: &Instance) -> Result<Config, SweepError> {
    model_diff_by(left, right, |a, b| a == b)
}

/// [`model_diff`] with a custom equality on leaf values.
pub fn model_diff_by(
    left: &Instance,
    right: &Instance,
    compare: impl Fn(&Value, &Value) -> bool,
) -> Result<Config, SweepError> {
    if left.schema_name() != right.schema_name() {
        return Err(type_mismatch(
            &Path::root(),
            format!(
                "cannot diff instances of different schemas: {} and {}",
                left.schema_name(),
                right.schema_name()
            ),
        ));
    }

    let mut items = Vec::new();
    collect(left, right, &Path::root(), &compare, &mut items);
    from_items(items)
}

fn collect(
    left: &Instance,
    right: &Instance,
    prefix: &Path,
    compare: &impl Fn(&Value, &Value) -> bool,
    out: &mut Vec<(Path, Value)>,
) {
    for (name, value) in left.fields() {
        let path = prefix.join(name);
        let Some(other) = right.get(name) else {
            out.push((path, Value::Tuple(vec![value.clone(), Value::Null])));
            continue;
        };
        match (value, other) {
            (Value::Instance(a), Value::Instance(b)) if a.schema_name() == b.schema_name() => {
                collect(a, b, &path, compare, out);
            }
            (a, b) if !compare(a, b) => {
                out.push((path, Value::Tuple(vec![a.clone(), b.clone()])));
            }
            _ => {}
        }
    }
}
