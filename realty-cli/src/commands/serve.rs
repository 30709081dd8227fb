//! HTTP server command
//!
//! Resolves configuration (file, environment, then flags), opens the pool,
//! and serves until Ctrl+C or SIGTERM.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use realty_server::config::RealtyConfig;
use realty_server::db::Database;
use realty_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Config file (default: ~/.realty/config.toml when present)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Host to bind to (default: 127.0.0.1)
    #[arg(long, short = 'b')]
    pub bind: Option<String>,

    /// Port to listen on (default: 3030)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl ServeArgs {
    /// Layer command-line flags over the resolved configuration.
    pub fn apply(&self, config: &mut RealtyConfig) {
        if let Some(host) = &self.bind {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if let Some(max) = self.max_connections {
            config.database.max_connections = max;
        }
        if self.cors_permissive {
            config.server.cors_permissive = true;
        }
        if let Some(secs) = self.timeout {
            config.server.request_timeout_secs = secs;
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config =
        RealtyConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);

    let server_config = ServerConfig::from_config(&config).context("Invalid server address")?;
    tracing::info!("Starting realty server on {}", server_config.bind_addr);

    let db = Database::connect(&config.database)
        .await
        .context("Failed to create database pool")?;

    // Run server (blocks until shutdown)
    run_server(db, server_config)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let mut config = RealtyConfig::default();
        let args = ServeArgs {
            bind: Some("0.0.0.0".to_string()),
            port: Some(8080),
            database_url: Some("postgres://db/listings".to_string()),
            max_connections: Some(4),
            cors_permissive: true,
            timeout: Some(5),
            ..ServeArgs::default()
        };

        args.apply(&mut config);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "postgres://db/listings");
        assert_eq!(config.database.max_connections, 4);
        assert!(config.server.cors_permissive);
        assert_eq!(config.server.request_timeout_secs, 5);
    }

    #[test]
    fn absent_flags_keep_config() {
        let mut config = RealtyConfig::default();
        config.server.port = 4000;
        config.server.cors_permissive = true;

        ServeArgs::default().apply(&mut config);

        assert_eq!(config.server.port, 4000);
        assert!(config.server.cors_permissive);
        assert_eq!(config, {
            let mut expected = RealtyConfig::default();
            expected.server.port = 4000;
            expected.server.cors_permissive = true;
            expected
        });
    }
}
