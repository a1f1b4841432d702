pub mod api;
pub mod config;
pub mod db;
pub mod directory;

use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{ServerConfig, DEFAULT_LOG_FILTER};

#[tokio::main]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting user directory...");

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    if let Err(e) = api::server::start_server(config).await {
        error!("Server failed: {e}");
        process::exit(1);
    }
}
