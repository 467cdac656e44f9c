//! Hostname-driven configuration loading
//!
//! Builds the defaults, picks at most one environment override by
//! hostname substring, merges it in and hands back an owned
//! configuration.

use std::path::Path;

use crate::config::{
    build_defaults, deep_merge, ConfigError, ConfigSource, Configuration, OverrideSet,
};

/// Result of applying the environment configuration for one hostname
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The merged configuration
    pub config: Configuration,

    /// Hostname the configuration was resolved for
    pub hostname: String,

    /// Pattern of the applied override, if any
    pub matched_pattern: Option<String>,

    /// Whether the debug diagnostic was emitted
    pub diagnostic_emitted: bool,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

/// Resolves configurations against an override catalog
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    catalog: OverrideSet,
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Loader over the built-in override catalog
    pub fn builtin() -> Self {
        Self {
            catalog: OverrideSet::builtin(),
            sources: vec![ConfigSource::builtin()],
        }
    }

    /// Loader over an arbitrary catalog, in place of the built-in one
    pub fn with_catalog(catalog: OverrideSet) -> Self {
        Self {
            catalog,
            sources: vec![ConfigSource::builtin()],
        }
    }

    /// Layer a TOML catalog file on top of the current catalog
    pub fn with_catalog_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        let (extra, digest) = OverrideSet::from_toml_file(path)?;
        tracing::debug!(
            path = %path.display(),
            patterns = extra.len(),
            "loaded override catalog"
        );
        self.catalog.merge_catalog(extra);
        self.sources.push(ConfigSource::catalog(path, digest));
        Ok(self)
    }

    pub fn catalog(&self) -> &OverrideSet {
        &self.catalog
    }

    /// Build the defaults, merge the override selected by `hostname` and
    /// log the applied override when the result has debug mode on.
    pub fn apply_environment_config(&self, hostname: &str) -> Result<ResolvedConfig, ConfigError> {
        let mut defaults = build_defaults();
        defaults.environment_overrides = self.catalog.clone();
        let mut tree = defaults.to_value();

        let mut sources = self.sources.clone();
        let matched = self.catalog.select(hostname);

        if let Some(matched) = matched {
            deep_merge(&mut tree, matched.overrides);
            sources.push(ConfigSource::applied_override(matched.pattern));
        } else {
            tracing::debug!(hostname, "no environment override matches");
        }

        let config = Configuration::from_value(tree)?;

        let mut diagnostic_emitted = false;
        if let Some(matched) = matched {
            if config.features.debug_mode {
                tracing::info!(
                    pattern = matched.pattern,
                    overrides = %matched.overrides,
                    "Applied configuration overrides for {}",
                    matched.pattern
                );
                diagnostic_emitted = true;
            }
        }

        Ok(ResolvedConfig {
            config,
            hostname: hostname.to_string(),
            matched_pattern: matched.map(|m| m.pattern.to_string()),
            diagnostic_emitted,
            sources,
        })
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Resolve the configuration for `hostname` against the built-in catalog.
///
/// The built-in overrides always fit the configuration shape, so this
/// only fails if the built-in catalog itself is edited into an invalid
/// state.
pub fn load(hostname: &str) -> Result<Configuration, ConfigError> {
    ConfigLoader::builtin()
        .apply_environment_config(hostname)
        .map(|resolved| resolved.config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Log sink shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Resolve `hostname` with a subscriber recording INFO and above
    fn resolve_with_logs(hostname: &str) -> (ResolvedConfig, Vec<String>) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();

        let resolved = tracing::subscriber::with_default(subscriber, || {
            ConfigLoader::builtin()
                .apply_environment_config(hostname)
                .unwrap()
        });
        (resolved, logs.lines())
    }

    #[test]
    fn test_localhost() {
        let resolved = ConfigLoader::builtin().apply_environment_config("localhost").unwrap();

        assert_eq!(resolved.matched_pattern.as_deref(), Some("localhost"));
        assert_eq!(resolved.config.backend.url, "http://localhost:5000");
        assert!(resolved.config.features.debug_mode);
        assert!(resolved.diagnostic_emitted);

        // Untouched siblings keep their defaults
        assert_eq!(resolved.config.backend.timeout, 10000);
        assert_eq!(
            resolved.config.backend.fallback_urls,
            vec!["http://localhost:5000"]
        );
    }

    #[test]
    fn test_no_match_equals_defaults() {
        let resolved = ConfigLoader::builtin().apply_environment_config("example.org").unwrap();

        assert!(resolved.matched_pattern.is_none());
        assert!(!resolved.diagnostic_emitted);
        assert_eq!(resolved.config, build_defaults());
    }

    #[test]
    fn test_catalog_kept_after_merge() {
        let config = load("localhost").unwrap();
        assert_eq!(config.environment_overrides, OverrideSet::builtin());
    }

    #[test]
    fn test_invalid_override_type() {
        let mut catalog = OverrideSet::new();
        catalog.insert("broken", json!({"backend": {"timeout": "soon"}}));

        let result = ConfigLoader::with_catalog(catalog).apply_environment_config("broken.example");
        assert!(matches!(result, Err(ConfigError::InvalidOverride(_))));
    }

    #[test]
    fn test_debug_without_match_emits_nothing() {
        // debugMode only comes from overrides; with no match the gate stays closed
        let resolved = ConfigLoader::with_catalog(OverrideSet::new())
            .apply_environment_config("localhost")
            .unwrap();

        assert!(resolved.matched_pattern.is_none());
        assert!(!resolved.diagnostic_emitted);
    }

    #[test]
    fn test_unknown_override_keys_rejected() {
        let mut catalog = OverrideSet::new();
        catalog.insert(
            "beta",
            json!({
                "features": {"darkMode": true, "debugmode": true},
                "analytics": {"id": "x"}
            }),
        );

        let result = ConfigLoader::with_catalog(catalog).apply_environment_config("beta.example");
        match result {
            Err(ConfigError::InvalidOverride(msg)) => {
                assert!(msg.contains("darkMode") || msg.contains("debugmode") || msg.contains("analytics"));
            }
            other => panic!("expected InvalidOverride, got {:?}", other),
        }
    }

    #[test]
    fn test_misspelled_flag_rejected() {
        let mut catalog = OverrideSet::new();
        catalog.insert("dev", json!({"features": {"debugmode": true}}));

        let result = ConfigLoader::with_catalog(catalog).apply_environment_config("dev.local");
        assert!(matches!(result, Err(ConfigError::InvalidOverride(_))));
    }

    #[test]
    fn test_diagnostic_names_pattern_and_payload() {
        let (resolved, lines) = resolve_with_logs("localhost");
        assert!(resolved.diagnostic_emitted);

        let applied: Vec<&String> = lines
            .iter()
            .filter(|l| l.contains("Applied configuration overrides"))
            .collect();
        assert_eq!(applied.len(), 1, "log lines: {:?}", lines);
        assert!(applied[0].contains("INFO"));
        assert!(applied[0].contains("localhost"));
        assert!(applied[0].contains("\"debugMode\":true"));
        assert!(applied[0].contains("http://localhost:5000"));
    }

    #[test]
    fn test_no_diagnostic_without_debug_mode() {
        let (resolved, lines) = resolve_with_logs("test.github.io");
        assert_eq!(resolved.matched_pattern.as_deref(), Some("github.io"));
        assert!(!resolved.diagnostic_emitted);
        assert!(lines.is_empty(), "unexpected log lines: {:?}", lines);
    }
}
