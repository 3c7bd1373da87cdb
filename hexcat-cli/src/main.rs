//! HEXCAT CLI - Command-line interface
//!
//! Commands:
//! - serve: Start the HTTP API server
//! - play: Play a game in the terminal
//! - simulate: Run automated games and report results

mod play;
mod server;
mod simulate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexcat")]
#[command(about = "HEXCAT trap-the-cat game engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve(server::ServerArgs),
    /// Play a game in the terminal
    Play(play::PlayArgs),
    /// Run automated games and report results
    Simulate(simulate::SimulateArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => server::run(args),
        Commands::Play(args) => play::run(args),
        Commands::Simulate(args) => simulate::run(args),
    }
}
