//! JSON, JSON5 and YAML adapter for sweep configs and instances.
//!
//! Documents are decoded into `serde_json` values first; the format is chosen
//! from the file extension.

mod convert;
mod error;
mod format;

pub use convert::{config_from_json, config_to_json, from_json, instance_to_json, to_json};
pub use error::IoError;
pub use format::Format;

use log::{debug, info};
use std::fs;
use std::path::Path;
use sweep_rs_core::{Config, Instance, SchemaRegistry};

/// Read a config document.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, IoError> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    debug!("reading config (path={}, format={format})", path.display());
    let contents = fs::read_to_string(path)?;
    load_config_str(&contents, format)
}

/// Parse a config from document contents.
pub fn load_config_str(contents: &str, format: Format) -> Result<Config, IoError> {
    config_from_json(format.parse(contents)?)
}

/// Read a document and construct a `schema` instance from it.
pub fn load(
    path: impl AsRef<Path>,
    registry: &SchemaRegistry,
    schema: &str,
) -> Result<Instance, IoError> {
    let path = path.as_ref();
    info!("loading instance (path={}, schema={schema})", path.display());
    let config = load_config(path)?;
    Ok(registry.construct(schema, config)?)
}

/// Construct a `schema` instance from document contents.
pub fn load_str(
    contents: &str,
    format: Format,
    registry: &SchemaRegistry,
    schema: &str,
) -> Result<Instance, IoError> {
    let config = load_config_str(contents, format)?;
    Ok(registry.construct(schema, config)?)
}

/// Write an instance to `path` in the format named by its extension.
pub fn write(path: impl AsRef<Path>, instance: &Instance) -> Result<(), IoError> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let contents = format.render(&instance_to_json(instance)?)?;
    fs::write(path, contents)?;
    info!(
        "wrote instance (path={}, schema={}, format={format})",
        path.display(),
        instance.schema_name()
    );
    Ok(())
}

/// Write a config to `path` in the format named by its extension.
pub fn write_config(path: impl AsRef<Path>, config: &Config) -> Result<(), IoError> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    fs::write(path, format.render(&config_to_json(config)?)?)?;
    debug!("wrote config (path={}, format={format})", path.display());
    Ok(())
}
