//! Frontend configuration model
//!
//! Resolution happens in two steps:
//! 1. Built-in defaults
//! 2. The first environment override whose pattern occurs in the hostname

mod defaults;
mod effective;
mod merge;
mod overrides;
mod schema;

pub use defaults::build_defaults;
pub use effective::{ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig};
pub use merge::{deep_merge, merge_layers};
pub use overrides::{select_override, MatchedOverride, OverrideSet};
pub use schema::{
    AuthConfig, BackendConfig, ChartColors, ChartConfig, Configuration, DefaultUser, Endpoint,
    Endpoints, ErrorDisplayConfig, FeatureFlags, UiConfig,
};
