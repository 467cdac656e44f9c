//! Effective configuration with full provenance
//!
//! The effective_config captures the resolved configuration plus
//! information about where each value came from. Secrets are redacted
//! here so the view is safe to print or persist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;

use crate::loader::ResolvedConfig;

/// Schema version for effective_config
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "euystacio-config/effective_config@1";

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    /// Built-in defaults and the built-in override catalog
    Builtin,
    /// Override catalog loaded from a file
    Catalog,
    /// The environment override applied for the hostname
    Override,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigSource {
    /// Origin of this source
    pub origin: ConfigOrigin,

    /// File path (catalog files only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (catalog files only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    /// Hostname pattern (applied override only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl ConfigSource {
    pub fn builtin() -> Self {
        Self {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
            pattern: None,
        }
    }

    pub fn catalog(path: &Path, digest: String) -> Self {
        Self {
            origin: ConfigOrigin::Catalog,
            path: Some(path.to_string_lossy().to_string()),
            digest: Some(digest),
            pattern: None,
        }
    }

    pub fn applied_override(pattern: &str) -> Self {
        Self {
            origin: ConfigOrigin::Override,
            path: None,
            digest: None,
            pattern: Some(pattern.to_string()),
        }
    }
}

/// Effective configuration with full provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// Hostname the configuration was resolved for
    pub hostname: String,

    /// Override pattern that matched, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<String>,

    /// The resolved configuration object
    pub config: Value,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,

    /// Redacted key paths
    pub redactions: Vec<String>,
}

/// Keys that contain secrets and should be redacted
const SECRET_KEYS: &[&str] = &["password", "token", "secret", "api_key", "credential"];

impl EffectiveConfig {
    /// Build the effective view of a resolved configuration, redacting secrets
    pub fn from_resolved(resolved: &ResolvedConfig) -> Self {
        let mut config = resolved.config.to_value();
        let redactions = Self::redact_secrets(&mut config);
        Self::assemble(resolved, config, redactions)
    }

    /// Build the effective view without redaction
    pub fn unredacted(resolved: &ResolvedConfig) -> Self {
        Self::assemble(resolved, resolved.config.to_value(), Vec::new())
    }

    fn assemble(resolved: &ResolvedConfig, config: Value, redactions: Vec<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            hostname: resolved.hostname.clone(),
            matched_pattern: resolved.matched_pattern.clone(),
            config,
            sources: resolved.sources.clone(),
            redactions,
        }
    }

    /// Redact secrets in the config, returning list of redacted paths
    fn redact_secrets(value: &mut Value) -> Vec<String> {
        let mut redactions = Vec::new();
        Self::redact_recursive(value, String::new(), &mut redactions);
        redactions
    }

    fn redact_recursive(value: &mut Value, path: String, redactions: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    let key_lower = key.to_lowercase();
                    let current_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };

                    let is_secret = SECRET_KEYS.iter().any(|s| key_lower.contains(s));

                    if is_secret && !val.is_object() && !val.is_array() {
                        *val = Value::String("[REDACTED]".to_string());
                        redactions.push(current_path);
                    } else {
                        Self::redact_recursive(val, current_path, redactions);
                    }
                }
            }
            Value::Array(arr) => {
                for (i, val) in arr.iter_mut().enumerate() {
                    let current_path = format!("{}[{}]", path, i);
                    Self::redact_recursive(val, current_path, redactions);
                }
            }
            _ => {}
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }

    /// Get a config value by path (dot-separated)
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.config;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Get a config value as u64
    pub fn get_u64(&self, path: &str) -> Option<u64> {
        self.get(path).and_then(|v| v.as_u64())
    }

    /// Get a config value as string
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    /// Get a config value as bool
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid override: {0}")]
    InvalidOverride(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ConfigLoader;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_only() {
        let resolved = ConfigLoader::builtin().apply_environment_config("example.org").unwrap();
        let effective = EffectiveConfig::from_resolved(&resolved);

        assert_eq!(effective.schema_version, SCHEMA_VERSION);
        assert_eq!(effective.hostname, "example.org");
        assert!(effective.matched_pattern.is_none());
        assert_eq!(effective.get_u64("backend.timeout"), Some(10000));
        assert_eq!(effective.get_str("endpoints.pulse"), Some("/pulse"));
        assert_eq!(effective.sources, vec![ConfigSource::builtin()]);
    }

    #[test]
    fn test_override_source_tracked() {
        let resolved = ConfigLoader::builtin().apply_environment_config("localhost").unwrap();
        let effective = EffectiveConfig::from_resolved(&resolved);

        assert_eq!(effective.matched_pattern.as_deref(), Some("localhost"));
        assert_eq!(effective.sources.len(), 2);
        assert_eq!(effective.sources[1].origin, ConfigOrigin::Override);
        assert_eq!(effective.sources[1].pattern.as_deref(), Some("localhost"));
        assert_eq!(effective.get_bool("features.debugMode"), Some(true));
    }

    #[test]
    fn test_password_redacted() {
        let resolved = ConfigLoader::builtin().apply_environment_config("example.org").unwrap();
        let effective = EffectiveConfig::from_resolved(&resolved);

        assert_eq!(
            effective.get_str("auth.defaultUser.password"),
            Some("[REDACTED]")
        );
        assert_eq!(
            effective.get_str("auth.defaultUser.username"),
            Some("hannesmitterer")
        );
        assert_eq!(effective.redactions, vec!["auth.defaultUser.password"]);

        // The resolved configuration itself keeps the documented value
        assert_eq!(resolved.config.auth.default_user.password, "moon-rise");
    }

    #[test]
    fn test_unredacted() {
        let resolved = ConfigLoader::builtin().apply_environment_config("example.org").unwrap();
        let effective = EffectiveConfig::unredacted(&resolved);

        assert_eq!(effective.get_str("auth.defaultUser.password"), Some("moon-rise"));
        assert!(effective.redactions.is_empty());
    }

    #[test]
    fn test_get_missing_path() {
        let resolved = ConfigLoader::builtin().apply_environment_config("").unwrap();
        let effective = EffectiveConfig::from_resolved(&resolved);

        assert!(effective.get("backend.nonexistent").is_none());
        assert!(effective.get_u64("backend.url").is_none());
    }

    #[test]
    fn test_write_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("effective_config.json");

        let resolved = ConfigLoader::builtin().apply_environment_config("test.github.io").unwrap();
        EffectiveConfig::from_resolved(&resolved)
            .write_to_file(&path)
            .unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["schema_id"], SCHEMA_ID);
        assert_eq!(written["matched_pattern"], "github.io");
        assert_eq!(written["config"]["auth"]["defaultUser"]["password"], "[REDACTED]");
    }

    #[test]
    fn test_written_unredacted_config_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("effective_config.json");

        let resolved = ConfigLoader::builtin().apply_environment_config("localhost").unwrap();
        EffectiveConfig::unredacted(&resolved)
            .write_to_file(&path)
            .unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let reloaded = crate::config::Configuration::from_value(written["config"].clone()).unwrap();
        assert_eq!(reloaded, resolved.config);
    }
}
