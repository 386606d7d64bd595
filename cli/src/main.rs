//! Roadside ledger - CLI server
//!
//! Headless booking ledger service for systemd, Docker or a plain shell.
//!
//! ```sh
//! # Run with the default config (~/.config/roadside-ledger/config.toml)
//! roadside-ledger
//!
//! # Custom config path
//! roadside-ledger --config /etc/roadside-ledger/config.toml
//!
//! # Override the API port and log level
//! roadside-ledger --api-port 9090 --log-level debug
//!
//! # Validate config without starting
//! roadside-ledger --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use roadside_ledger::config::{AppConfig, CONFIG_ENV};
use roadside_ledger::server::{init_tracing, ServerHandle, ServerOptions};

/// Booking ledger and financial reconciliation service.
#[derive(Parser, Debug)]
#[command(
    name = "roadside-ledger",
    version,
    about = "Booking ledger and financial reconciliation service",
    long_about = "REST API server for roadside assistance bookings, driver and provider \
                  cash ledgers and their reconciled financial snapshots.\n\n\
                  Default config: ~/.config/roadside-ledger/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(roadside_ledger::default_config_path);

    let loaded = AppConfig::load(&config_path);
    if cli.check {
        return match loaded {
            Ok(config) => {
                println!("Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   API address : {}", config.api_address());
                println!("   Database    : {}", config.database.url);
                println!("   Log level   : {} ({})", config.logging.level, config.logging.format);
                println!("   Transitions : {:?}", config.booking.transition_policy);
                Ok(())
            }
            Err(e) => {
                eprintln!("Invalid configuration in {}: {}", config_path.display(), e);
                std::process::exit(1);
            }
        };
    }

    let mut config = match loaded {
        Ok(mut cfg) => {
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new(
                    cli.log_level.as_deref().unwrap_or("info"),
                ))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            AppConfig::default()
        }
    };

    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
