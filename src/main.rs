use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use certwatch::{
    api::{start_api_server, ApiState},
    auth::build_authorizer,
    backends::build_accessors,
    cache::CacheStore,
    config::AppConfig,
    observability::{init_observability, log_config_info},
    refresh::RefreshScheduler,
    Result, APP_NAME, VERSION,
};

/// Certificate expiration tracking server
#[derive(Debug, Parser)]
#[command(name = "certwatch", version, about)]
struct Cli {
    /// Path to the YAML configuration manifest
    #[arg(short, long, default_value = "certwatch.yml")]
    config: PathBuf,
}

fn install_rustls_provider() {
    use rustls::crypto::{ring, CryptoProvider};

    if CryptoProvider::get_default().is_none() {
        ring::default_provider().install_default().expect("install ring crypto provider");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    install_rustls_provider();

    // Load .env file if it exists (optional - won't fail if missing)
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    init_observability(&config.observability).await?;

    info!(app_name = APP_NAME, version = VERSION, "Starting certwatch server");
    log_config_info(&config);

    let accessors = build_accessors(&config.backends)?;
    let store = Arc::new(CacheStore::new());

    // The startup refresh begins here, asynchronously; serving starts below
    // without waiting on it.
    let refresh = RefreshScheduler::new(
        store.clone(),
        accessors,
        config.refresh.interval(),
        config.refresh.backend_timeout(),
    )
    .spawn();
    info!("Began asynchronous cache population");

    let authorizer = build_authorizer(&config.auth);
    let state = Arc::new(ApiState { store, refresh, authorizer });

    if let Err(err) = start_api_server(config.server.clone(), state).await {
        error!("Server terminated with error: {}", err);
        std::process::exit(1);
    }

    info!("certwatch shutdown completed");
    Ok(())
}
