//! Euystacio configuration CLI
//!
//! Entry point for the `euystacio-config` command-line tool.

use clap::{Parser, Subcommand};
use euystacio_config::{ConfigLoader, ConfigError, EffectiveConfig, Endpoint, ResolvedConfig};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "euystacio-config")]
#[command(about = "Resolve the Euystacio frontend configuration for a hostname", version)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Target {
    /// Hostname to resolve the configuration for
    #[arg(long, env = "EUYSTACIO_HOSTNAME", default_value = "")]
    hostname: String,

    /// Extra override catalog (TOML), layered over the built-in one
    #[arg(long, short = 'c')]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration
    Resolve {
        #[command(flatten)]
        target: Target,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Do not redact secrets such as the demo password
        #[arg(long)]
        show_secrets: bool,

        /// Also write the effective configuration (JSON) to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List override patterns in declaration order
    Patterns {
        #[command(flatten)]
        target: Target,
    },

    /// Print a single value by dot-separated path (e.g. backend.url)
    Get {
        path: String,

        #[command(flatten)]
        target: Target,
    },

    /// Check the resolved configuration for invalid values
    Verify {
        #[command(flatten)]
        target: Target,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Resolve {
            target,
            json,
            show_secrets,
            output,
        } => run_resolve(&target, json, show_secrets, output),
        Commands::Patterns { target } => run_patterns(&target),
        Commands::Get { path, target } => run_get(&path, &target),
        Commands::Verify { target } => run_verify(&target),
    }
}

fn build_loader(target: &Target) -> Result<ConfigLoader, ConfigError> {
    let loader = ConfigLoader::builtin();
    match target.catalog {
        Some(ref path) => loader.with_catalog_file(path),
        None => Ok(loader),
    }
}

fn resolve_or_exit(target: &Target) -> ResolvedConfig {
    let resolved = build_loader(target)
        .and_then(|loader| loader.apply_environment_config(&target.hostname));
    match resolved {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    }
}

fn run_resolve(target: &Target, json: bool, show_secrets: bool, output: Option<PathBuf>) {
    let resolved = resolve_or_exit(target);
    let effective = if show_secrets {
        EffectiveConfig::unredacted(&resolved)
    } else {
        EffectiveConfig::from_resolved(&resolved)
    };

    if let Some(path) = output {
        if let Err(e) = effective.write_to_file(&path) {
            eprintln!("Error writing {}: {}", path.display(), e);
            process::exit(1);
        }
    }

    if json {
        match effective.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let config = &resolved.config;
    println!("Hostname: {}", display_hostname(&resolved.hostname));
    println!(
        "Override: {}",
        resolved.matched_pattern.as_deref().unwrap_or("(none)")
    );
    println!();
    println!("  Backend: {}", config.backend.url);
    println!("  Candidates: {}", config.backend_candidates().join(", "));
    println!(
        "  Timeout: {} ms, {} retries every {} ms",
        config.backend.timeout, config.backend.max_retries, config.backend.retry_delay
    );
    println!("  Refresh interval: {} ms", config.ui.refresh_interval);
    println!(
        "  Features: autoDiscovery={} enhancedErrorReporting={} showMetrics={} debugMode={}",
        config.features.auto_discovery,
        config.features.enhanced_error_reporting,
        config.features.show_metrics,
        config.features.debug_mode
    );
    println!("  Endpoints:");
    for endpoint in Endpoint::ALL {
        println!("    {:<8} {}", endpoint.as_str(), config.endpoint_url(endpoint));
    }
    if !effective.redactions.is_empty() {
        println!();
        println!("  Redacted: {}", effective.redactions.join(", "));
    }
}

fn run_patterns(target: &Target) {
    let loader = match build_loader(target) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error loading catalog: {}", e);
            process::exit(1);
        }
    };

    let selected = loader
        .catalog()
        .select(&target.hostname)
        .map(|m| m.pattern);

    for pattern in loader.catalog().patterns() {
        let marker = if Some(pattern) == selected { "*" } else { " " };
        println!("{} {}", marker, pattern);
    }
}

fn run_get(path: &str, target: &Target) {
    let resolved = resolve_or_exit(target);
    let effective = EffectiveConfig::from_resolved(&resolved);

    match effective.get(path) {
        Some(serde_json::Value::String(s)) => println!("{}", s),
        Some(value) => println!("{}", value),
        None => {
            eprintln!("No configuration value at '{}'", path);
            process::exit(1);
        }
    }
}

fn run_verify(target: &Target) {
    let resolved = resolve_or_exit(target);

    match resolved.config.validate() {
        Ok(()) => {
            println!(
                "Configuration valid for {}",
                display_hostname(&resolved.hostname)
            );
        }
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

fn display_hostname(hostname: &str) -> &str {
    if hostname.is_empty() {
        "(empty)"
    } else {
        hostname
    }
}
