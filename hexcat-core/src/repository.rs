//! Game persistence
//!
//! Repositories store `GameSnapshot`s, so every save and load goes through
//! the same serialization contract the API exposes.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{GameError, Result};
use crate::game::{GameSnapshot, GameState};

/// Key-value store of games by id. "Not found" is never an error.
pub trait GameRepository: Send + Sync {
    fn find(&self, game_id: &str) -> Result<Option<GameState>>;

    fn save(&self, state: GameState) -> Result<GameState>;

    /// Returns whether a game was removed
    fn delete(&self, game_id: &str) -> Result<bool>;

    fn find_all(&self) -> Result<Vec<GameState>>;
}

// ============================================================================
// IN-MEMORY
// ============================================================================

#[derive(Default)]
pub struct InMemoryRepository {
    games: RwLock<HashMap<String, GameSnapshot>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameRepository for InMemoryRepository {
    fn find(&self, game_id: &str) -> Result<Option<GameState>> {
        let games = self.games.read().map_err(|_| GameError::LockPoisoned)?;
        games.get(game_id).cloned().map(GameState::restore).transpose()
    }

    fn save(&self, state: GameState) -> Result<GameState> {
        let mut games = self.games.write().map_err(|_| GameError::LockPoisoned)?;
        games.insert(state.game_id().to_string(), state.snapshot());
        Ok(state)
    }

    fn delete(&self, game_id: &str) -> Result<bool> {
        let mut games = self.games.write().map_err(|_| GameError::LockPoisoned)?;
        Ok(games.remove(game_id).is_some())
    }

    fn find_all(&self) -> Result<Vec<GameState>> {
        let games = self.games.read().map_err(|_| GameError::LockPoisoned)?;
        games.values().cloned().map(GameState::restore).collect()
    }
}

// ============================================================================
// JSON FILES
// ============================================================================

/// One pretty-printed `<game_id>.json` file per game
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    /// Open (and create if needed) a repository directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, game_id: &str) -> Result<PathBuf> {
        let safe = !game_id.is_empty()
            && game_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !safe {
            return Err(GameError::InvalidGameId(game_id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", game_id)))
    }

    fn load(path: &Path) -> Result<GameState> {
        let content = fs::read_to_string(path)?;
        let snapshot: GameSnapshot = serde_json::from_str(&content)?;
        GameState::restore(snapshot)
    }
}

impl GameRepository for JsonFileRepository {
    fn find(&self, game_id: &str) -> Result<Option<GameState>> {
        let Ok(path) = self.path_for(game_id) else {
            return Ok(None);
        };
        match Self::load(&path) {
            Ok(state) => Ok(Some(state)),
            Err(GameError::Storage(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, state: GameState) -> Result<GameState> {
        let path = self.path_for(state.game_id())?;
        let content = serde_json::to_string_pretty(&state.snapshot())?;
        // Write then rename so readers never see a half-written file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &path)?;
        Ok(state)
    }

    fn delete(&self, game_id: &str) -> Result<bool> {
        let Ok(path) = self.path_for(game_id) else {
            return Ok(false);
        };
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn find_all(&self) -> Result<Vec<GameState>> {
        let mut games = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                games.push(Self::load(&path)?);
            }
        }
        Ok(games)
    }
}
