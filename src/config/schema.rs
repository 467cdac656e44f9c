//! Typed configuration tree
//!
//! Field names serialize in camelCase so the tree keeps the exact shape
//! the frontend reads (`backend.fallbackUrls`, `ui.errorDisplay`, ...).
//! Unknown keys are rejected, so a misspelled override fails to load
//! instead of vanishing.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::effective::ConfigError;
use super::overrides::OverrideSet;

/// Fully-resolved frontend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub backend: BackendConfig,
    pub auth: AuthConfig,
    pub ui: UiConfig,
    pub features: FeatureFlags,
    pub endpoints: Endpoints,

    /// Override catalog, kept intact after the merge for re-inspection
    pub environment_overrides: OverrideSet,
}

/// Backend connection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    /// Primary backend URL
    pub url: String,

    /// URLs to try if the primary fails
    pub fallback_urls: Vec<String>,

    /// Request timeout in milliseconds
    pub timeout: u64,

    pub max_retries: u32,

    /// Delay between retries in milliseconds
    pub retry_delay: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Demo credential pair. Plaintext; redacted only in the effective view.
    pub default_user: DefaultUser,

    /// Session timeout in milliseconds
    pub session_timeout: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    /// Pulse chart auto-refresh interval in milliseconds
    pub refresh_interval: u64,
    pub chart: ChartConfig,
    pub error_display: ErrorDisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub max_data_points: u32,

    /// Animation duration in milliseconds
    pub animation_duration: u64,
    pub colors: ChartColors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartColors {
    pub primary: String,
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDisplayConfig {
    /// How long an error message stays visible, in milliseconds
    pub duration: u64,

    /// Maximum errors shown at once
    pub max_errors: u32,
}

/// Feature flags read by the frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    pub auto_discovery: bool,
    pub enhanced_error_reporting: bool,
    pub show_metrics: bool,

    /// Enables diagnostic logging
    pub debug_mode: bool,
}

/// API endpoints, relative to the backend URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Endpoints {
    pub pulse: String,
    pub log: String,
    pub status: String,
    pub metrics: String,
    pub kernel: String,
    pub info: String,
}

/// Logical endpoint names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Pulse,
    Log,
    Status,
    Metrics,
    Kernel,
    Info,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Pulse,
        Endpoint::Log,
        Endpoint::Status,
        Endpoint::Metrics,
        Endpoint::Kernel,
        Endpoint::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Pulse => "pulse",
            Endpoint::Log => "log",
            Endpoint::Status => "status",
            Endpoint::Metrics => "metrics",
            Endpoint::Kernel => "kernel",
            Endpoint::Info => "info",
        }
    }
}

impl Endpoints {
    /// Relative path for a logical endpoint
    pub fn path(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Pulse => &self.pulse,
            Endpoint::Log => &self.log,
            Endpoint::Status => &self.status,
            Endpoint::Metrics => &self.metrics,
            Endpoint::Kernel => &self.kernel,
            Endpoint::Info => &self.info,
        }
    }
}

impl Configuration {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> Value {
        json!({
            "backend": {
                "url": self.backend.url,
                "fallbackUrls": self.backend.fallback_urls,
                "timeout": self.backend.timeout,
                "maxRetries": self.backend.max_retries,
                "retryDelay": self.backend.retry_delay
            },
            "auth": {
                "defaultUser": {
                    "username": self.auth.default_user.username,
                    "password": self.auth.default_user.password
                },
                "sessionTimeout": self.auth.session_timeout
            },
            "ui": {
                "refreshInterval": self.ui.refresh_interval,
                "chart": {
                    "maxDataPoints": self.ui.chart.max_data_points,
                    "animationDuration": self.ui.chart.animation_duration,
                    "colors": {
                        "primary": self.ui.chart.colors.primary,
                        "background": self.ui.chart.colors.background
                    }
                },
                "errorDisplay": {
                    "duration": self.ui.error_display.duration,
                    "maxErrors": self.ui.error_display.max_errors
                }
            },
            "features": {
                "autoDiscovery": self.features.auto_discovery,
                "enhancedErrorReporting": self.features.enhanced_error_reporting,
                "showMetrics": self.features.show_metrics,
                "debugMode": self.features.debug_mode
            },
            "endpoints": {
                "pulse": self.endpoints.pulse,
                "log": self.endpoints.log,
                "status": self.endpoints.status,
                "metrics": self.endpoints.metrics,
                "kernel": self.endpoints.kernel,
                "info": self.endpoints.info
            },
            "environmentOverrides": self.environment_overrides.to_value()
        })
    }

    /// Rebuild a typed configuration from a merged tree
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidOverride(e.to_string()))
    }

    /// Absolute URL of an endpoint on the primary backend
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}{}",
            self.backend.url.trim_end_matches('/'),
            self.endpoints.path(endpoint)
        )
    }

    /// Primary backend URL followed by the fallbacks, without duplicates
    pub fn backend_candidates(&self) -> Vec<&str> {
        let mut candidates: Vec<&str> = Vec::with_capacity(1 + self.backend.fallback_urls.len());
        for url in std::iter::once(&self.backend.url).chain(&self.backend.fallback_urls) {
            if !candidates.contains(&url.as_str()) {
                candidates.push(url.as_str());
            }
        }
        candidates
    }

    /// Sanity-check the resolved values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for url in std::iter::once(&self.backend.url).chain(&self.backend.fallback_urls) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError(format!(
                    "backend URL must use http:// or https://, got '{}'",
                    url
                )));
            }
        }

        let durations = [
            ("backend.timeout", self.backend.timeout),
            ("backend.retryDelay", self.backend.retry_delay),
            ("auth.sessionTimeout", self.auth.session_timeout),
            ("ui.refreshInterval", self.ui.refresh_interval),
            ("ui.errorDisplay.duration", self.ui.error_display.duration),
        ];
        for (path, value) in durations {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be greater than 0",
                    path
                )));
            }
        }

        if self.ui.chart.max_data_points == 0 {
            return Err(ConfigError::ValidationError(
                "ui.chart.maxDataPoints must be greater than 0".to_string(),
            ));
        }
        if self.ui.error_display.max_errors == 0 {
            return Err(ConfigError::ValidationError(
                "ui.errorDisplay.maxErrors must be greater than 0".to_string(),
            ));
        }

        for endpoint in Endpoint::ALL {
            let path = self.endpoints.path(endpoint);
            if !path.starts_with('/') {
                return Err(ConfigError::ValidationError(format!(
                    "endpoints.{} must start with '/', got '{}'",
                    endpoint.as_str(),
                    path
                )));
            }
        }

        Ok(())
    }
}
