//! Salesboard dashboard server
//!
//! Loads the sales CSV once, then serves the dashboard page, the JSON
//! render API and the WebSocket endpoint.

use log::{error, info};
use salesboard::config::ServerConfig;
use salesboard::server::run_server;
use salesboard::store::DatasetStore;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    if let Ok(json) = serde_json::to_string(&config) {
        info!("Configuration: {}", json);
    }

    // Fail before binding if the data cannot be loaded
    let store = DatasetStore::new(config.data_path.clone());
    let dataset = store.load().map_err(|e| {
        error!("Failed to load {}: {}", config.data_path.display(), e);
        io::Error::new(io::ErrorKind::InvalidData, e)
    })?;

    run_server(&config, dataset).await
}
