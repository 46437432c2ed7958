use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::SpawnError;
use crate::grid::{GridSize, Position};

/// Random draws per free cell before switching to enumeration.
const ATTEMPTS_PER_FREE_CELL: usize = 10;

/// Picks a random in-bounds cell that is not in `excluded`.
///
/// Random probing is cheap while the board is mostly empty. After
/// `10 × free cells` misses the free cells are enumerated and one is chosen
/// directly, so the call always terminates.
pub fn randomize_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    excluded: &HashSet<Position>,
) -> Result<Position, SpawnError> {
    let blocked = excluded
        .iter()
        .filter(|position| bounds.in_bounds(**position))
        .count();
    let free = bounds.total_cells().saturating_sub(blocked);
    if free == 0 {
        return Err(board_full(bounds));
    }

    for _ in 0..free.saturating_mul(ATTEMPTS_PER_FREE_CELL) {
        let candidate = Position {
            x: rng.gen_range(0..i32::from(bounds.width)),
            y: rng.gen_range(0..i32::from(bounds.height)),
        };
        if !excluded.contains(&candidate) {
            return Ok(candidate);
        }
    }

    free_cells(bounds, excluded)
        .choose(rng)
        .copied()
        .ok_or_else(|| board_full(bounds))
}

/// Draws up to `count` distinct free cells without replacement.
///
/// Returns fewer than `count` cells when the board does not have that many
/// free.
#[must_use]
pub fn sample_free_positions<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    excluded: &HashSet<Position>,
    count: usize,
) -> Vec<Position> {
    let candidates = free_cells(bounds, excluded);
    candidates
        .choose_multiple(rng, count.min(candidates.len()))
        .copied()
        .collect()
}

fn free_cells(bounds: GridSize, excluded: &HashSet<Position>) -> Vec<Position> {
    bounds
        .cells()
        .filter(|position| !excluded.contains(position))
        .collect()
}

fn board_full(bounds: GridSize) -> SpawnError {
    SpawnError::BoardFull {
        width: bounds.width,
        height: bounds.height,
    }
}
