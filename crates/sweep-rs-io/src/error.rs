//! Error types for reading and writing configs and instances.

use sweep_rs_core::SweepError;
use thiserror::Error;

/// Errors returned by the format adapter.
#[derive(Debug, Error)]
pub enum IoError {
    /// Reading or writing a file failed.
    #[error("failed to access file: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing JSON5 contents failed.
    #[error("failed to parse json5: {0}")]
    ParseFailed(#[from] json5::Error),
    /// Encoding or decoding JSON failed.
    #[error("failed to decode json: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// Encoding or decoding YAML failed.
    #[error("failed to decode yaml: {0}")]
    YamlFailed(#[from] serde_yaml::Error),
    /// The decoded data did not construct a valid instance.
    #[error(transparent)]
    Sweep(#[from] SweepError),
    /// The file extension does not name a supported format.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    /// A value has no representation in the target format.
    #[error("cannot represent value at {path}: {message}")]
    Unrepresentable { path: String, message: String },
}
