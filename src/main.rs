use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use hotfeed::hotentry::{EntryStore, RefreshScheduler, UpstreamClient};
use hotfeed::web::{AppState, WebServer};
use hotfeed::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    // Load configuration
    let mut config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    // Initialize logging
    if let Err(e) = hotfeed::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        hotfeed::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    info!("hotfeed - Hatena Bookmark hot entry RSS");
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> hotfeed::Result<()> {
    let client = UpstreamClient::new(&config.upstream)?;
    let store = Arc::new(EntryStore::new());

    let scheduler = RefreshScheduler::with_interval(
        client.clone(),
        store.clone(),
        config.scheduler.interval_secs,
    );
    if config.scheduler.enabled {
        scheduler.start();
    } else {
        info!("Hot entry refresh disabled");
    }

    let server = WebServer::new(&config.server, AppState::new(client, store, &config))?;
    let result = server.run(shutdown_signal()).await;

    scheduler.stop();
    result
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
