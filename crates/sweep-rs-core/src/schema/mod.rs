//! Reflective schema model: typed field descriptors, a name-keyed registry
//! and validated instances.

mod instance;
mod registry;
mod union;
mod validate;

pub use instance::Instance;
pub use registry::SchemaRegistry;

use crate::error::SweepError;
use crate::path::is_valid_key;
use crate::value::Value;
use std::collections::HashSet;
use std::fmt;

/// Declared type of a schema field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Any,
    None,
    Bool,
    Int,
    Float,
    Str,
    /// Exactly the given value.
    Literal(Value),
    /// Immutable homogeneous sequence.
    Tuple(Box<FieldType>),
    List(Box<FieldType>),
    Set(Box<FieldType>),
    /// String-keyed mapping with values of the inner type.
    Map(Box<FieldType>),
    /// Reference to a registered schema by name.
    Model(String),
    Union {
        members: Vec<FieldType>,
        /// Field whose literal value selects the member model.
        discriminator: Option<String>,
    },
    /// Host type the validator cannot inspect; only legal with
    /// `arbitrary_types` enabled.
    Opaque(String),
}

impl FieldType {
    pub fn model(name: impl Into<String>) -> Self {
        FieldType::Model(name.into())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        FieldType::Literal(value.into())
    }

    pub fn tuple(inner: FieldType) -> Self {
        FieldType::Tuple(Box::new(inner))
    }

    pub fn list(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }

    pub fn set(inner: FieldType) -> Self {
        FieldType::Set(Box::new(inner))
    }

    pub fn map(inner: FieldType) -> Self {
        FieldType::Map(Box::new(inner))
    }

    /// Union of `members`; nested plain unions are flattened.
    pub fn union(members: impl IntoIterator<Item = FieldType>) -> Self {
        let mut flat = Vec::new();
        for member in members {
            match member {
                FieldType::Union {
                    members: inner,
                    discriminator: None,
                } => flat.extend(inner),
                other => flat.push(other),
            }
        }
        FieldType::Union {
            members: flat,
            discriminator: None,
        }
    }

    /// Union of models selected by the literal value of `discriminator`.
    pub fn discriminated(
        discriminator: impl Into<String>,
        members: impl IntoIterator<Item = FieldType>,
    ) -> Self {
        FieldType::Union {
            members: members.into_iter().collect(),
            discriminator: Some(discriminator.into()),
        }
    }

    /// `inner | None`.
    pub fn optional(inner: FieldType) -> Self {
        FieldType::union([inner, FieldType::None])
    }

    /// False for the mutable containers `list`, `set` and `map`.
    pub fn is_hashable(&self) -> bool {
        !matches!(
            self,
            FieldType::List(_) | FieldType::Set(_) | FieldType::Map(_)
        )
    }

    /// Type name used in messages, e.g. `list[int]`.
    pub fn type_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Any => f.write_str("Any"),
            FieldType::None => f.write_str("None"),
            FieldType::Bool => f.write_str("bool"),
            FieldType::Int => f.write_str("int"),
            FieldType::Float => f.write_str("float"),
            FieldType::Str => f.write_str("str"),
            FieldType::Literal(value) => write!(f, "Literal[{value}]"),
            FieldType::Tuple(inner) => write!(f, "tuple[{inner}, ...]"),
            FieldType::List(inner) => write!(f, "list[{inner}]"),
            FieldType::Set(inner) => write!(f, "set[{inner}]"),
            FieldType::Map(inner) => write!(f, "dict[str, {inner}]"),
            FieldType::Model(name) | FieldType::Opaque(name) => f.write_str(name),
            FieldType::Union { members, .. } => {
                for (idx, member) in members.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
        }
    }
}

/// A named field of a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub ty: FieldType,
    /// Value used when the input omits the field; `None` makes it required.
    pub default: Option<Value>,
}

/// Descriptor of a structured record type.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDef>,
    forbid_unknown: bool,
    validate_assignment: bool,
    arbitrary_types: bool,
}

impl Schema {
    /// Start describing a schema called `name`.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            forbid_unknown: true,
            validate_assignment: true,
            arbitrary_types: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Reject input keys that are not declared fields.
    pub fn forbid_unknown(&self) -> bool {
        self.forbid_unknown
    }

    /// Validate values assigned after construction.
    pub fn validate_assignment(&self) -> bool {
        self.validate_assignment
    }

    /// Allow [`FieldType::Opaque`] fields.
    pub fn arbitrary_types(&self) -> bool {
        self.arbitrary_types
    }
}

/// Builder for [`Schema`]. Strict settings are the defaults.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDef>,
    forbid_unknown: bool,
    validate_assignment: bool,
    arbitrary_types: bool,
}

impl SchemaBuilder {
    /// Add a required field.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            default: None,
        });
        self
    }

    /// Add a field with a default value.
    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        ty: FieldType,
        default: impl Into<Value>,
    ) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            default: Some(default.into()),
        });
        self
    }

    pub fn forbid_unknown(mut self, forbid: bool) -> Self {
        self.forbid_unknown = forbid;
        self
    }

    pub fn validate_assignment(mut self, validate: bool) -> Self {
        self.validate_assignment = validate;
        self
    }

    pub fn arbitrary_types(mut self, allow: bool) -> Self {
        self.arbitrary_types = allow;
        self
    }

    /// Finish the schema, rejecting invalid or repeated field names and
    /// opaque fields on schemas that do not allow them.
    pub fn build(self) -> Result<Schema, SweepError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            let reason = if !is_valid_key(&field.name) {
                Some("field names must be valid path keys".to_string())
            } else if !seen.insert(field.name.as_str()) {
                Some("field declared more than once".to_string())
            } else if !self.arbitrary_types && contains_opaque(&field.ty) {
                Some(format!(
                    "type {} requires arbitrary types to be allowed",
                    field.ty
                ))
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(SweepError::SchemaConfig {
                    schema: self.name.clone(),
                    path: field.name.clone(),
                    reason,
                });
            }
        }

        Ok(Schema {
            name: self.name,
            fields: self.fields,
            forbid_unknown: self.forbid_unknown,
            validate_assignment: self.validate_assignment,
            arbitrary_types: self.arbitrary_types,
        })
    }
}

fn contains_opaque(ty: &FieldType) -> bool {
    match ty {
        FieldType::Opaque(_) => true,
        FieldType::Tuple(inner)
        | FieldType::List(inner)
        | FieldType::Set(inner)
        | FieldType::Map(inner) => contains_opaque(inner),
        FieldType::Union { members, .. } => members.iter().any(contains_opaque),
        _ => false,
    }
}

#[cfg(test)]
mod tests;
