//! Example to run the HEXCAT server standalone
//!
//! Run with: cargo run -p hexcat-server --example run_server [data-dir]

use hexcat_server::{run_server, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig {
        data_dir: std::env::args().nth(1).map(Into::into),
        ..ServerConfig::default()
    };

    println!("Starting HEXCAT server on port {}", config.port);
    println!("Try: curl -X POST http://localhost:{}/api/game/start", config.port);

    run_server(config).await
}
