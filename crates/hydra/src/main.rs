//! # Hydra - Pre-forking Multi-process HTTP Server
//!
//! A coordinator process spawns one worker process per CPU core. Every
//! worker binds the same port with `SO_REUSEPORT` and answers `GET /`
//! with a greeting carrying its own pid; the kernel distributes inbound
//! connections across the workers.
//!
//! ## Architecture
//! ```text
//! Coordinator ── spawns ──► Worker ×N ──► HTTP :3000
//!      ▲                       │
//!      └───── exit status ─────┘
//! ```

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod coordinator;
mod worker;

use config::AppConfig;

/// Process role, fixed for the lifetime of the process
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Role {
    /// Spawn one worker per CPU core, then observe their exits
    Coordinator,
    /// Serve HTTP on the shared port
    Worker,
}

/// Hydra - pre-forking HTTP server
#[derive(Parser, Debug)]
#[command(name = "hydra")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Process role
    #[arg(long, value_enum, default_value_t = Role::Coordinator)]
    role: Role,

    /// Configuration file path
    #[arg(short, long, default_value = "config/hydra.toml")]
    config: String,

    /// Listen host (overrides config)
    #[arg(long, env = "HYDRA_HOST")]
    host: Option<String>,

    /// Listen port (overrides config)
    #[arg(short, long, env = "HYDRA_PORT")]
    port: Option<u16>,

    /// Worker process count (overrides config; 0 = one per CPU core)
    #[arg(short, long, env = "HYDRA_WORKERS")]
    workers: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level, args.json_logs)?;

    debug!("Starting Hydra v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load(&args.config, &args)?;

    // The role never changes after this point
    match args.role {
        Role::Coordinator => coordinator::run(config).await,
        Role::Worker => worker::run(config).await,
    }
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }

    Ok(())
}
