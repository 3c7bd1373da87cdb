//! Server state management
//!
//! Shared state: the game engine and the repository behind it.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use hexcat_core::{GameEngine, JsonFileRepository};

/// Server-wide shared state
pub struct ServerState {
    pub engine: GameEngine,
}

impl ServerState {
    /// Games kept in memory for the lifetime of the process
    pub fn new() -> Self {
        Self {
            engine: GameEngine::in_memory(),
        }
    }

    /// Games stored as JSON files under `dir`
    pub fn with_data_dir(dir: &Path) -> anyhow::Result<Self> {
        let repository = JsonFileRepository::open(dir)
            .with_context(|| format!("failed to open game directory {}", dir.display()))?;
        Ok(Self {
            engine: GameEngine::new(Arc::new(repository)),
        })
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
