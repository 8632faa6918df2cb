use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{ScoreStore, StoreError};

/// Default location of the score file, relative to the working directory
pub const DEFAULT_SCORE_FILE: &str = "snake_high_score.json";

#[derive(Debug, Serialize, Deserialize)]
struct ScoreRecord {
    high_score: u32,
}

/// Best score kept in a small JSON document: `{"high_score": 42}`
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonScoreStore {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE_FILE)
    }
}

impl ScoreStore for JsonScoreStore {
    fn load_best(&mut self) -> Result<Option<u32>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let record: ScoreRecord = serde_json::from_str(&raw)?;
        Ok(Some(record.high_score))
    }

    fn save_best(&mut self, score: u32) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&ScoreRecord { high_score: score })?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
