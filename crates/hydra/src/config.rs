//! Configuration management for Hydra.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use hydra_common::constants::{DEFAULT_HOST, DEFAULT_PORT, MIN_WORKERS};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen port, shared by every worker
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP listen host
    #[serde(default = "default_host")]
    pub host: String,

    /// Worker process count; 0 means one worker per CPU core
    #[serde(default)]
    pub workers: usize,
}

// Default value functions
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            // Use defaults if config file doesn't exist
            tracing::debug!("Config file not found, using defaults");
            Self::default()
        };

        // Apply CLI overrides
        if let Some(ref host) = args.host {
            config.host = host.clone();
        }
        if let Some(port) = args.port {
            config.port = port;
        }
        if let Some(workers) = args.workers {
            config.workers = workers;
        }

        Ok(config)
    }

    /// Number of worker processes to spawn.
    ///
    /// A configured count of 0 means autodetect from the CPU core count;
    /// the result never falls below `MIN_WORKERS`, so a host reporting
    /// zero cores still gets one worker.
    pub fn resolved_workers(&self) -> usize {
        let count = if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        };
        count.max(MIN_WORKERS)
    }

    /// Socket address string for the worker listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            workers: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.workers, 0);
    }

    #[test]
    fn test_resolved_workers_explicit() {
        let config = AppConfig {
            workers: 3,
            ..Default::default()
        };
        assert_eq!(config.resolved_workers(), 3);
    }

    #[test]
    fn test_resolved_workers_autodetect_is_at_least_one() {
        let config = AppConfig::default();
        assert!(config.resolved_workers() >= 1);
    }

    #[test]
    fn test_listen_addr() {
        let config = AppConfig::default();
        assert_eq!(config.listen_addr(), "127.0.0.1:3000");
    }
}
