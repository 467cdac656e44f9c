//! Euystacio frontend configuration
//!
//! Resolves the hostname-sensitive settings consumed by the Euystacio
//! frontend: backend URLs, retry/timeout parameters, UI refresh intervals,
//! feature flags and the demo credential pair.

pub mod config;
pub mod loader;

pub use config::{Configuration, ConfigError, EffectiveConfig, Endpoint, OverrideSet};
pub use loader::{load, ConfigLoader, ResolvedConfig};
