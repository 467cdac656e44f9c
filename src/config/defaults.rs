//! Built-in frontend defaults
//!
//! Hardcoded defaults for all configuration values, before any
//! environment override is applied.

use super::overrides::OverrideSet;
use super::schema::{
    AuthConfig, BackendConfig, ChartColors, ChartConfig, Configuration, DefaultUser, Endpoints,
    ErrorDisplayConfig, FeatureFlags, UiConfig,
};

/// Session timeout in milliseconds (15 minutes)
const SESSION_TIMEOUT_MS: u64 = 15 * 60 * 1000;

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "https://euystacio-backend.onrender.com".to_string(),
            fallback_urls: vec!["http://localhost:5000".to_string()],
            timeout: 10_000,
            max_retries: 3,
            retry_delay: 1_000,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // Demo credentials, shipped as-is with the frontend
            default_user: DefaultUser {
                username: "hannesmitterer".to_string(),
                password: "moon-rise".to_string(),
            },
            session_timeout: SESSION_TIMEOUT_MS,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_interval: 15_000,
            chart: ChartConfig {
                max_data_points: 50,
                animation_duration: 1_000,
                colors: ChartColors {
                    primary: "#0ff".to_string(),
                    background: "rgba(0,255,255,0.2)".to_string(),
                },
            },
            error_display: ErrorDisplayConfig {
                duration: 5_000,
                max_errors: 5,
            },
        }
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            auto_discovery: true,
            enhanced_error_reporting: true,
            show_metrics: true,
            debug_mode: false,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            pulse: "/pulse".to_string(),
            log: "/log".to_string(),
            status: "/status".to_string(),
            metrics: "/metrics".to_string(),
            kernel: "/kernel".to_string(),
            info: "/".to_string(),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        build_defaults()
    }
}

/// The literal default tree, carrying the built-in override catalog
pub fn build_defaults() -> Configuration {
    Configuration {
        backend: BackendConfig::default(),
        auth: AuthConfig::default(),
        ui: UiConfig::default(),
        features: FeatureFlags::default(),
        endpoints: Endpoints::default(),
        environment_overrides: OverrideSet::builtin(),
    }
}
