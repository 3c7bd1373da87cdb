//! Server command - start the HTTP API server
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: (delegated to hexcat-server crate)
//! - Level 4: configuration validation

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use hexcat_server::{run_server, ServerConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8003")]
    pub port: u16,

    /// Store games as JSON files in this directory instead of memory
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
///
/// 1. Configure server
/// 2. Start server (blocking)
pub fn run(args: ServerArgs) -> Result<()> {
    let config = configure_server(&args)?;

    tracing::info!("Starting HEXCAT server on port {}", config.port);

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServerArgs) -> Result<ServerConfig> {
    if let Some(dir) = &args.data_dir {
        validate_data_dir(dir)?;
    }

    Ok(ServerConfig {
        port: args.port,
        data_dir: args.data_dir.clone(),
    })
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config).await })
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// A missing data directory is created on startup; a file in its place is an error
fn validate_data_dir(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        anyhow::bail!("Data path exists but is not a directory: {}", path.display());
    }
    if !path.exists() {
        tracing::info!("Data directory {} will be created", path.display());
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
