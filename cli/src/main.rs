//! AgroWatch backend - CLI server
//!
//! ```sh
//! # Default config (~/.config/agrowatch/config.toml)
//! agrowatch-server
//!
//! # Custom config path and port
//! agrowatch-server --config /etc/agrowatch/config.toml --port 8080
//!
//! # Validate config without starting
//! agrowatch-server --check
//!
//! # Throwaway in-memory store
//! agrowatch-server --memory
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use agrowatch::config::AppConfig;
use agrowatch::infrastructure::database::redact_url;
use agrowatch::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "agrowatch-server",
    version,
    about = "Sensor telemetry and account management backend",
    long_about = "AgroWatch backend: REST API serving sensor readings and user accounts.\n\n\
                  Default config: ~/.config/agrowatch/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "AGROWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Use the in-memory store instead of the database.
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(agrowatch::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Invalid configuration in {}: {}", config_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file    : {}", config_path.display());
        println!("   Address        : {}", config.server.address());
        println!("   Database       : {}", redact_url(&config.database.url));
        println!("   Readings table : {}", config.database.readings_table);
        println!("   Log level      : {}", config.logging.level);
        return ExitCode::SUCCESS;
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        use_memory: cli.memory,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    ExitCode::SUCCESS
}
