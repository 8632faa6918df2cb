//! Persistence of the best score across sessions.
//!
//! The simulation reads the best score once when it is built and writes it
//! back only when a finished game beats it. Store failures are reported to the
//! caller as [`StoreError`] and the simulation decides how to degrade.

pub mod json;
pub mod memory;

pub use json::JsonScoreStore;
pub use memory::MemoryScoreStore;

use thiserror::Error;

/// Score store error wrapper.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score file i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("score file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// Backing storage for the best score
pub trait ScoreStore {
    /// Read the persisted best score. `Ok(None)` means nothing was recorded yet.
    fn load_best(&mut self) -> Result<Option<u32>, StoreError>;

    /// Persist a new best score
    fn save_best(&mut self, score: u32) -> Result<(), StoreError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn load_best(&mut self) -> Result<Option<u32>, StoreError> {
        (**self).load_best()
    }

    fn save_best(&mut self, score: u32) -> Result<(), StoreError> {
        (**self).save_best(score)
    }
}
