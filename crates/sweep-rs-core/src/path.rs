//! Canonical field paths and their dotted-string form.
//!
//! A path is either written as `"a.b.c"` or given as a key sequence such as
//! `["a", "b", "c"]`. Both normalize to the same [`Path`].

use crate::error::SweepError;
use log::error;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// A single key: letters or underscore first, then letters, digits, underscores.
static KEY_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile_pattern(r"^[A-Za-z_][A-Za-z0-9_]*$"));

/// Dot-separated keys with no empty segments.
static DOTTED_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile_pattern(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$"));

/// Paths are all rejected when a pattern fails to compile.
fn compile_pattern(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            error!("failed to compile path pattern (pattern={pattern}, error={err})");
            None
        }
    }
}

/// Ordered sequence of keys locating a value in a nested config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<String>);

impl Path {
    /// The empty path, denoting the whole config.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a dotted string such as `"model.optimizer.lr"`.
    pub fn parse(dotted: &str) -> Result<Self, SweepError> {
        if !matches_pattern(&DOTTED_PATTERN, dotted) {
            return Err(SweepError::InvalidPath(format!(
                "a string path must consist of dot-separated keys such as 'my.key', got '{dotted}'"
            )));
        }
        Ok(Self(dotted.split('.').map(str::to_string).collect()))
    }

    /// Build a path from keys, optionally validating each key.
    pub fn from_keys<I, S>(keys: I, check_keys: bool) -> Result<Self, SweepError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if check_keys {
            for key in &keys {
                if !is_valid_key(key) {
                    return Err(SweepError::InvalidPath(format!(
                        "keys may only contain letters, digits and underscores and must not \
                         start with a digit, got '{key}'"
                    )));
                }
            }
        }
        Ok(Self(keys))
    }

    /// Keys of the path in order.
    pub fn keys(&self) -> &[String] {
        &self.0
    }

    /// Iterate over the keys.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Child path with `key` appended.
    pub fn join(&self, key: impl Into<String>) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.into());
        Self(keys)
    }

    /// Prefix consisting of the first `len` keys.
    pub fn prefix(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }

    /// Split into parent keys and final key.
    pub fn split_last(&self) -> Option<(&String, &[String])> {
        self.0.split_last()
    }

    /// True if `other` is a (not necessarily strict) prefix of this path.
    pub fn starts_with(&self, other: &Path) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Anything that can be normalized into a [`Path`].
///
/// Strings are always checked against the dotted grammar. Key sequences are
/// taken as given unless `check_keys` is set.
pub trait IntoPath {
    /// Convert into a canonical path.
    fn into_path(self, check_keys: bool) -> Result<Path, SweepError>;
}

impl IntoPath for &str {
    fn into_path(self, _check_keys: bool) -> Result<Path, SweepError> {
        Path::parse(self)
    }
}

impl IntoPath for String {
    fn into_path(self, check_keys: bool) -> Result<Path, SweepError> {
        self.as_str().into_path(check_keys)
    }
}

impl IntoPath for &String {
    fn into_path(self, check_keys: bool) -> Result<Path, SweepError> {
        self.as_str().into_path(check_keys)
    }
}

impl IntoPath for Path {
    fn into_path(self, check_keys: bool) -> Result<Path, SweepError> {
        Path::from_keys(self.0, check_keys)
    }
}

impl IntoPath for &Path {
    fn into_path(self, check_keys: bool) -> Result<Path, SweepError> {
        Path::from_keys(self.0.iter().cloned(), check_keys)
    }
}

impl IntoPath for Vec<String> {
    fn into_path(self, check_keys: bool) -> Result<Path, SweepError> {
        Path::from_keys(self, check_keys)
    }
}

impl IntoPath for Vec<&str> {
    fn into_path(self, check_keys: bool) -> Result<Path, SweepError> {
        Path::from_keys(self, check_keys)
    }
}

impl IntoPath for &[&str] {
    fn into_path(self, check_keys: bool) -> Result<Path, SweepError> {
        Path::from_keys(self.iter().copied(), check_keys)
    }
}

impl IntoPath for &[String] {
    fn into_path(self, check_keys: bool) -> Result<Path, SweepError> {
        Path::from_keys(self.iter().cloned(), check_keys)
    }
}

impl<const N: usize> IntoPath for [&str; N] {
    fn into_path(self, check_keys: bool) -> Result<Path, SweepError> {
        Path::from_keys(self, check_keys)
    }
}

/// Normalize a dotted string or key sequence into a [`Path`].
pub fn normalize(path: impl IntoPath, check_keys: bool) -> Result<Path, SweepError> {
    path.into_path(check_keys)
}

/// True if `key` is a valid single path key.
pub fn is_valid_key(key: &str) -> bool {
    matches_pattern(&KEY_PATTERN, key)
}

fn matches_pattern(pattern: &LazyLock<Option<Regex>>, input: &str) -> bool {
    pattern
        .as_ref()
        .is_some_and(|regex| regex.is_match(input))
}
