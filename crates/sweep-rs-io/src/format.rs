//! File formats keyed by extension.

use crate::IoError;
use serde_json::Value as JsonValue;
use std::fmt;
use std::path::Path;

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    /// Read as JSON5, written as plain JSON (a JSON5 subset).
    Json5,
    Yaml,
}

impl Format {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Format::Json),
            Some("json5") => Ok(Format::Json5),
            Some("yaml" | "yml") => Ok(Format::Yaml),
            _ => Err(IoError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Json5 => "json5",
            Format::Yaml => "yaml",
        }
    }

    /// Parse document contents into a JSON value.
    pub fn parse(&self, contents: &str) -> Result<JsonValue, IoError> {
        Ok(match self {
            Format::Json => serde_json::from_str(contents)?,
            Format::Json5 => json5::from_str(contents)?,
            Format::Yaml => serde_yaml::from_str(contents)?,
        })
    }

    /// Render a JSON value as document contents.
    pub fn render(&self, value: &JsonValue) -> Result<String, IoError> {
        Ok(match self {
            Format::Json | Format::Json5 => {
                let mut rendered = serde_json::to_string_pretty(value)?;
                rendered.push('\n');
                rendered
            }
            Format::Yaml => serde_yaml::to_string(value)?,
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
