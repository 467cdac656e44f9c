//! Environment override catalog
//!
//! An ordered mapping from hostname-substring pattern to a partial
//! configuration. Declaration order decides which pattern wins when
//! several would match.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use super::effective::ConfigError;
use super::merge::deep_merge;

/// Ordered override catalog keyed by hostname pattern
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideSet(Map<String, Value>);

/// The override entry selected for a hostname
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedOverride<'a> {
    pub pattern: &'a str,
    pub overrides: &'a Value,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Catalog shipped with the frontend: local development, GitHub Pages,
    /// custom domain.
    pub fn builtin() -> Self {
        let mut set = Self::new();
        set.insert(
            "localhost",
            json!({
                "backend": { "url": "http://localhost:5000" },
                "features": { "debugMode": true }
            }),
        );
        set.insert(
            "github.io",
            json!({
                "features": {
                    "autoDiscovery": true,
                    "enhancedErrorReporting": true
                }
            }),
        );
        set.insert(
            "your-domain.com",
            json!({
                "backend": { "url": "https://your-backend.your-domain.com" }
            }),
        );
        set
    }

    /// Append a pattern, or replace the payload of an existing one in place
    pub fn insert(&mut self, pattern: impl Into<String>, overrides: Value) {
        self.0.insert(pattern.into(), overrides);
    }

    pub fn get(&self, pattern: &str) -> Option<&Value> {
        self.0.get(pattern)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Patterns in declaration order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// First entry, in declaration order, whose pattern occurs in `hostname`
    pub fn select(&self, hostname: &str) -> Option<MatchedOverride<'_>> {
        self.iter()
            .find(|(pattern, _)| hostname.contains(*pattern))
            .map(|(pattern, overrides)| MatchedOverride { pattern, overrides })
    }

    /// Layer another catalog on top of this one.
    ///
    /// New patterns are appended after the existing ones. A pattern already
    /// present keeps its position and has its payload deep-merged.
    pub fn merge_catalog(&mut self, other: OverrideSet) {
        for (pattern, overrides) in other.0 {
            match self.0.get_mut(&pattern) {
                Some(existing) => deep_merge(existing, &overrides),
                None => {
                    self.0.insert(pattern, overrides);
                }
            }
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Parse a catalog from TOML: one top-level table per pattern.
    ///
    /// ```toml
    /// ["staging.example.org".backend]
    /// url = "https://staging-api.example.org"
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        let mut set = Self::new();
        for (pattern, entry) in table {
            if !entry.is_table() {
                return Err(ConfigError::ParseError(format!(
                    "override '{}' must be a table",
                    pattern
                )));
            }
            set.insert(pattern, toml_to_json(entry));
        }
        Ok(set)
    }

    /// Load a catalog file, returning it with the SHA-256 digest of its bytes
    pub fn from_toml_file(path: &Path) -> Result<(Self, String), ConfigError> {
        let bytes = fs::read(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

        Ok((Self::from_toml_str(&contents)?, digest))
    }
}

/// Select the override for `hostname` from `catalog`
pub fn select_override<'a>(hostname: &str, catalog: &'a OverrideSet) -> Option<MatchedOverride<'a>> {
    catalog.select(hostname)
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            let map: Map<String, Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            Value::Object(map)
        }
    }
}
