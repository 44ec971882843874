//! Error types for config combination, schema validation and initialization.

use crate::path::Path;
use thiserror::Error;

/// Errors returned by path handling, combinators, schemas and the initializer.
#[derive(Debug, Error)]
pub enum SweepError {
    /// A dotted path or one of its keys has invalid syntax.
    #[error("invalid path: {0}")]
    InvalidPath(String),
    /// Two (path, value) pairs would overwrite each other.
    #[error("conflicting config at {path}: {message}")]
    Conflict { path: String, message: String },
    /// A path segment is absent from the config.
    #[error("key not found: {path}")]
    KeyNotFound { path: String },
    /// A node was a leaf where a mapping was expected, or the reverse.
    #[error("type mismatch at {path}: {message}")]
    TypeMismatch { path: String, message: String },
    /// A schema lacks the required strictness settings.
    #[error("schema {schema} at {path} is misconfigured: {reason}")]
    SchemaConfig {
        schema: String,
        path: String,
        reason: String,
    },
    /// A field type cannot be hashed safely.
    #[error(
        "non-hashable type {type_name} at field `{path}`; these types can break \
         serialization and share state between configs"
    )]
    NonHashableField { path: String, type_name: String },
    /// Raw mapping input matched more than one member of a union.
    #[error(
        "multiple models of a union could match the data at `{path}`: {}; construct the \
         nested model explicitly or use a discriminated union",
        .candidates.join(", ")
    )]
    AmbiguousUnion {
        path: String,
        candidates: Vec<String>,
    },
    /// Inputs to a strict zip have different lengths.
    #[error("length mismatch: input {index} has {found} items, expected {expected}")]
    LengthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    /// A combinator or initializer was called with an invalid argument set.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    /// A chainer produced something other than configs.
    #[error("chained item {index} is not a config but {kind}; is the chainer valid?")]
    InvalidChainResult { index: usize, kind: String },
    /// A config or instance occurs more than once.
    #[error("the following config is not unique: {item}")]
    DuplicateConfig { item: String },
    /// A value has no hashable projection.
    #[error("unhashable value of type {0}")]
    UnhashableType(String),
    /// A field value is not hashable (rejected by `field` with checks on).
    #[error(
        "value {value} of type {kind} is not hashable, which can cause unexpected \
         behavior; disable this check by passing check = false"
    )]
    UnhashableValue { value: String, kind: String },
    /// A schema name is not registered.
    #[error("unknown schema: {0}")]
    UnknownSchema(String),
    /// A schema name was registered twice.
    #[error("schema already registered: {0}")]
    DuplicateSchema(String),
    /// Input data does not satisfy a schema.
    #[error("validation failed for {schema} at {path}: {message}")]
    Validation {
        schema: String,
        path: String,
        message: String,
    },
}

impl SweepError {
    /// Re-anchor the reported path of a nested operation under `prefix`.
    pub(crate) fn under(self, prefix: &Path) -> SweepError {
        if prefix.is_empty() {
            return self;
        }
        let join = |path: String| {
            if path == "root" {
                prefix.to_string()
            } else {
                format!("{prefix}.{path}")
            }
        };
        match self {
            SweepError::Conflict { path, message } => SweepError::Conflict {
                path: join(path),
                message,
            },
            SweepError::KeyNotFound { path } => SweepError::KeyNotFound { path: join(path) },
            SweepError::TypeMismatch { path, message } => SweepError::TypeMismatch {
                path: join(path),
                message,
            },
            SweepError::SchemaConfig {
                schema,
                path,
                reason,
            } => SweepError::SchemaConfig {
                schema,
                path: join(path),
                reason,
            },
            SweepError::NonHashableField { path, type_name } => SweepError::NonHashableField {
                path: join(path),
                type_name,
            },
            SweepError::AmbiguousUnion { path, candidates } => SweepError::AmbiguousUnion {
                path: join(path),
                candidates,
            },
            SweepError::Validation {
                schema,
                path,
                message,
            } => SweepError::Validation {
                schema,
                path: join(path),
                message,
            },
            other => other,
        }
    }
}

/// Dotted form of a path for error messages.
pub(crate) fn path_label(path: &Path) -> String {
    if path.is_empty() {
        "root".to_string()
    } else {
        path.to_string()
    }
}

/// Build a conflict error for the given path.
pub(crate) fn conflict(path: &Path, message: impl Into<String>) -> SweepError {
    SweepError::Conflict {
        path: path_label(path),
        message: message.into(),
    }
}

/// Build a missing-key error for the given path.
pub(crate) fn key_not_found(path: &Path) -> SweepError {
    SweepError::KeyNotFound {
        path: path_label(path),
    }
}

/// Build a type mismatch error for the given path.
pub(crate) fn type_mismatch(path: &Path, message: impl Into<String>) -> SweepError {
    SweepError::TypeMismatch {
        path: path_label(path),
        message: message.into(),
    }
}

/// Build a validation error for a field of `schema`.
pub(crate) fn invalid_field(schema: &str, path: &Path, message: impl Into<String>) -> SweepError {
    SweepError::Validation {
        schema: schema.to_string(),
        path: path_label(path),
        message: message.into(),
    }
}
