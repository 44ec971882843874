//! Config combination and schema instantiation for parameter sweeps.
//!
//! Partial configs are built per field with [`field`], combined with
//! [`product`], [`zip`], [`chain`] and [`roundrobin`], and turned into
//! validated schema instances by [`initialize`].

pub mod check;
pub mod combine;
pub mod diff;
mod error;
pub mod hashable;
pub mod initialize;
pub mod nested;
pub mod path;
pub mod schema;
pub mod seeds;
pub mod unique;
mod value;

/// Strictness check over schema graphs.
pub use check::{UnhashablePolicy, check_model};
/// Combinator primitive, built-in strategies and named combinators.
pub use combine::{
    Chainer, Combiner, cartesian, chain, combine, field, product, round_robin, roundrobin,
    sequential, strict_zip, zip,
};
/// Instance diffing.
pub use diff::{model_diff, model_diff_by};
/// Error type shared by every operation.
pub use error::SweepError;
/// Hashable projections.
pub use hashable::{AsHashable, HashKey, as_hashable};
/// Instantiation of configs.
pub use initialize::{InitializeOptions, Initialized, initialize};
pub use nested::Node;
pub use path::{IntoPath, Path, normalize};
/// Schema model, registry and instances.
pub use schema::{FieldDef, FieldType, Instance, Schema, SchemaBuilder, SchemaRegistry};
pub use seeds::{random_seeds, random_seeds_with};
pub use unique::check_unique;
/// Dynamic values and configs.
pub use value::{Config, ConfigDisplay, Value, display_config};

/// The `DefaultValue` placeholder: leave a field to its schema default.
pub const DEFAULT_VALUE: Value = Value::Default;
