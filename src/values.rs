//! Helm value overrides
//!
//! Overrides travel as a flat `key=value;key2=value2` string, both in the
//! `HELM_VALUES` variable and in the value cache.

use std::collections::BTreeMap;
use std::fmt;

/// Pair separator in the serialized form
const PAIR_SEPARATOR: char = ';';

/// How a value is handed to `helm`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `--set`, helm infers the type
    Simple,
    /// `--set-string`, always a literal string
    String,
}

impl ValueKind {
    /// Classify an override key
    ///
    /// Keys listed in [`STRING_VALUE_KEYS`] are passed with `--set-string` so
    /// values like `1e10` or `0123` are not coerced into numbers.
    pub fn for_key(key: &str) -> Self {
        if STRING_VALUE_KEYS.contains(&key) {
            ValueKind::String
        } else {
            ValueKind::Simple
        }
    }

    /// The helm flag for this kind
    pub fn flag(&self) -> &'static str {
        match self {
            ValueKind::Simple => "--set",
            ValueKind::String => "--set-string",
        }
    }
}

/// Keys that must be set as literal strings
pub const STRING_VALUE_KEYS: &[&str] = &["image.tag"];

/// Flat map of dotted value paths to values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideMap {
    values: BTreeMap<String, String>,
}

impl OverrideMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the `key=value;key=value` form
    ///
    /// Tokens that do not split into exactly two parts on `=` are dropped.
    pub fn parse(raw: &str) -> Self {
        let mut values = BTreeMap::new();
        for token in raw.split(PAIR_SEPARATOR) {
            let parts: Vec<&str> = token.split('=').collect();
            if let [key, value] = parts.as_slice() {
                values.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Self { values }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `--set`/`--set-string` arguments for every override, in key order
    pub fn to_set_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.values.len() * 2);
        for (key, value) in self.iter() {
            args.push(ValueKind::for_key(key).flag().to_string());
            args.push(format!("{}={}", key, value));
        }
        args
    }
}

/// Canonical serialization, keys in lexicographic order
impl fmt::Display for OverrideMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", PAIR_SEPARATOR)?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OverrideMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
