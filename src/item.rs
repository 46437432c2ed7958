use std::collections::HashSet;

use rand::Rng;

use crate::error::SpawnError;
use crate::grid::{GridSize, Position};
use crate::spawn::{randomize_position, sample_free_positions};

/// Collectible category and its effect on the score.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ItemKind {
    /// Apple: grows the snake.
    Beneficial,
    /// Poison: costs a point, no growth.
    Harmful,
}

impl ItemKind {
    /// Score change applied when the item is eaten.
    #[must_use]
    pub fn score_delta(self) -> i32 {
        match self {
            Self::Beneficial => 1,
            Self::Harmful => -1,
        }
    }
}

/// Collectible currently on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Item {
    pub position: Position,
    pub kind: ItemKind,
}

impl Item {
    #[must_use]
    pub fn apple(position: Position) -> Self {
        Self {
            position,
            kind: ItemKind::Beneficial,
        }
    }

    #[must_use]
    pub fn poison(position: Position) -> Self {
        Self {
            position,
            kind: ItemKind::Harmful,
        }
    }

    /// Spawns an apple on a cell outside `excluded`.
    pub fn spawn_apple<R: Rng + ?Sized>(
        rng: &mut R,
        bounds: GridSize,
        excluded: &HashSet<Position>,
    ) -> Result<Self, SpawnError> {
        randomize_position(rng, bounds, excluded).map(Self::apple)
    }

    /// Moves this item to a new free cell.
    pub fn respawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        bounds: GridSize,
        excluded: &HashSet<Position>,
    ) -> Result<(), SpawnError> {
        self.position = randomize_position(rng, bounds, excluded)?;
        Ok(())
    }
}

/// Samples a fresh poison set of `min..=max` items on distinct free cells.
#[must_use]
pub fn spawn_poisons<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    excluded: &HashSet<Position>,
    min: usize,
    max: usize,
) -> Vec<Item> {
    let count = rng.gen_range(min..=max.max(min));
    sample_free_positions(rng, bounds, excluded, count)
        .into_iter()
        .map(Item::poison)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::grid::{GridSize, Position};
    use super::{Item, ItemKind, spawn_poisons};

    const BOUNDS: GridSize = GridSize {
        width: 10,
        height: 10,
    };

    #[test]
    fn apple_respawn_avoids_excluded_cells() {
        let mut rng = StdRng::seed_from_u64(7);
        let excluded: HashSet<_> = (0..10).map(|x| Position::new(x, 4)).collect();
        let mut apple = Item::apple(Position::new(0, 0));

        for _ in 0..100 {
            apple
                .respawn(&mut rng, BOUNDS, &excluded)
                .expect("board has free cells");
            assert!(!excluded.contains(&apple.position));
        }
    }

    #[test]
    fn poison_count_stays_in_range_and_cells_are_distinct() {
        let mut rng = StdRng::seed_from_u64(21);
        let excluded: HashSet<_> = [Position::new(5, 5)].into_iter().collect();

        for _ in 0..50 {
            let poisons = spawn_poisons(&mut rng, BOUNDS, &excluded, 5, 9);
            let cells: HashSet<_> = poisons.iter().map(|item| item.position).collect();

            assert!((5..=9).contains(&poisons.len()));
            assert_eq!(cells.len(), poisons.len());
            assert!(!cells.contains(&Position::new(5, 5)));
            assert!(poisons.iter().all(|item| item.kind == ItemKind::Harmful));
        }
    }

    #[test]
    fn poison_count_shrinks_to_free_space() {
        let mut rng = StdRng::seed_from_u64(2);
        let excluded: HashSet<_> = BOUNDS.cells().skip(2).collect();

        assert_eq!(spawn_poisons(&mut rng, BOUNDS, &excluded, 5, 9).len(), 2);
    }

    #[test]
    fn item_kinds_move_score_in_opposite_directions() {
        assert_eq!(ItemKind::Beneficial.score_delta(), 1);
        assert_eq!(ItemKind::Harmful.score_delta(), -1);
    }
}
