//! Random placement of food, special items and walls.
//!
//! Placement picks uniformly among the free cells of the grid instead of
//! rejection sampling, so a nearly full board still terminates.

use rand::Rng;
use rand::seq::SliceRandom;

use super::state::{Cell, GameState};

/// Cells holding nothing at all: no snake, wall or food item
pub fn free_cells(state: &GameState) -> Vec<Cell> {
    (0..state.grid_height as i32)
        .flat_map(|y| (0..state.grid_width as i32).map(move |x| Cell::new(x, y)))
        .filter(|cell| !state.is_occupied(*cell))
        .collect()
}

/// Pick a random free cell, or `None` when the board is full
pub fn random_free_cell<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> Option<Cell> {
    free_cells(state).choose(rng).copied()
}

/// Add walls until `target` walls exist. Existing walls are kept.
/// Returns the number of walls actually added.
pub fn grow_walls<R: Rng + ?Sized>(state: &mut GameState, target: usize, rng: &mut R) -> usize {
    let missing = target.saturating_sub(state.walls.len());
    if missing == 0 {
        return 0;
    }

    let mut candidates = free_cells(state);
    candidates.shuffle(rng);
    let added = missing.min(candidates.len());
    state.walls.extend(candidates.into_iter().take(added));
    added
}
