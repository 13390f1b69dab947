//! `minihttpd [CONFIG.json]`: serve static files until Ctrl+C.

use env_logger::Env;
use log::info;
use minihttpd::{HttpServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {path}");
            ServerConfig::load(path)?
        }
        None => ServerConfig::default(),
    };

    HttpServer::new(config).start().await?;
    Ok(())
}
