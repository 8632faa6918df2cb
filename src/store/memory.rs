use super::{ScoreStore, StoreError};

/// In-memory store. Used by tests and by `--no-save` sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    best: Option<u32>,
    /// Every value passed to `save_best`, oldest first
    pub writes: Vec<u32>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u32) -> Self {
        Self {
            best: Some(best),
            writes: Vec::new(),
        }
    }

    pub fn best(&self) -> Option<u32> {
        self.best
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load_best(&mut self) -> Result<Option<u32>, StoreError> {
        Ok(self.best)
    }

    fn save_best(&mut self, score: u32) -> Result<(), StoreError> {
        self.best = Some(score);
        self.writes.push(score);
        Ok(())
    }
}
