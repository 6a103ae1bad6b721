//! Concierge reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                              ┌──────────────────────────────────────────────────────┐
//!                              │                     CONCIERGE                        │
//!                              │                                                      │
//!     Client Request           │  ┌─────────┐    ┌───────────┐    ┌──────────────┐    │
//!     ─────────────────────────┼─▶│  http   │───▶│ dispatch  │───▶│   routing    │    │
//!     /proxy/<route>/<rest>    │  │ server  │    │           │    │ table+rewrite│    │
//!                              │  └─────────┘    └─────┬─────┘    └──────────────┘    │
//!                              │                       │ header policy                │
//!                              │                       ▼                              │
//!                              │            ┌─────────────────────┐                   │
//!                              │            │ caching → retries → │                   │
//!                              │            │   http forwarder    │───────────────────┼──▶ Backend
//!                              │            └─────────────────────┘                   │
//!     Client Response          │                       │                              │
//!     ◀────────────────────────┼───────────────────────┘ relayed verbatim             │
//!                              └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use concierge::config::load_config;
use concierge::lifecycle::startup;
use concierge::observability::logging;

#[derive(Parser)]
#[command(name = "concierge")]
#[command(about = "Configuration-driven HTTP reverse proxy", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "concierge.toml")]
    config: PathBuf,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            tracing::error!(path = %cli.config.display(), error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability.log_level);

    if cli.check {
        tracing::info!(
            path = %cli.config.display(),
            routes = config.routes.len(),
            "Configuration is valid"
        );
        return ExitCode::SUCCESS;
    }

    tracing::info!("concierge v{} starting", env!("CARGO_PKG_VERSION"));

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Proxy failed");
            ExitCode::FAILURE
        }
    }
}
