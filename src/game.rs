use std::collections::HashSet;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{Difficulty, LevelSettings, ScreenGeometry};
use crate::error::SpawnError;
use crate::grid::{GridSize, Position};
use crate::input::{Direction, GameInput};
use crate::item::{Item, ItemKind, spawn_poisons};
use crate::obstacle::ObstacleField;
use crate::score::Score;
use crate::snake::Snake;

/// Whether ticks currently advance the simulation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Playing,
    Paused,
}

/// Failure that ended a run, in check order.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
    HazardCollision,
}

/// Notifications for the presentation layer. They carry no control flow
/// back into the session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameEvent {
    ItemConsumed(ItemKind),
    ScoreChanged { score: u32, high_score: u32 },
    NewHighScore(u32),
    GameOver { reason: DeathReason, score: u32 },
}

/// Complete mutable game state for one level.
///
/// Game over is not a resting state: the failing tick resets the snake,
/// score, items and traps and play continues.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub apple: Item,
    pub poisons: Vec<Item>,
    pub obstacles: ObstacleField,
    pub score: Score,
    pub status: GameStatus,
    pub tick_count: u64,
    pub deaths: u32,
    pub last_death: Option<DeathReason>,
    level: Difficulty,
    settings: LevelSettings,
    geometry: ScreenGeometry,
    rng: StdRng,
}

impl GameState {
    /// Creates a session seeded from OS entropy.
    pub fn new(
        geometry: ScreenGeometry,
        level: Difficulty,
        settings: LevelSettings,
        score: Score,
    ) -> Result<Self, SpawnError> {
        Self::with_rng(geometry, level, settings, score, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    pub fn new_with_seed(
        geometry: ScreenGeometry,
        level: Difficulty,
        settings: LevelSettings,
        score: Score,
        seed: u64,
    ) -> Result<Self, SpawnError> {
        Self::with_rng(geometry, level, settings, score, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        geometry: ScreenGeometry,
        level: Difficulty,
        settings: LevelSettings,
        score: Score,
        mut rng: StdRng,
    ) -> Result<Self, SpawnError> {
        let bounds = geometry.grid();
        let snake = Snake::centered(bounds);
        let occupied: HashSet<Position> = snake.segments().copied().collect();
        let apple = Item::spawn_apple(&mut rng, bounds, &occupied)?;

        let mut state = Self {
            snake,
            apple,
            poisons: Vec::new(),
            obstacles: ObstacleField::new(&settings),
            score,
            status: GameStatus::Playing,
            tick_count: 0,
            deaths: 0,
            last_death: None,
            level,
            settings,
            geometry,
            rng,
        };
        state.respawn_poisons();
        Ok(state)
    }

    /// Advances simulation by one gameplay tick.
    ///
    /// Fails only when the board has no free cell left for the apple.
    pub fn tick(&mut self) -> Result<Vec<GameEvent>, SpawnError> {
        let mut events = Vec::new();
        if self.status != GameStatus::Playing {
            return Ok(events);
        }

        self.tick_count += 1;
        self.snake.advance();

        self.collect_items(&mut events)?;

        if let Some(reason) = self.failure() {
            self.game_over(reason, &mut events)?;
        }

        if self.settings.hazards_enabled {
            self.obstacles.tick(self.geometry);
        }

        Ok(events)
    }

    /// Applies one external input event.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => self.set_direction(direction),
            GameInput::Pause => {
                self.status = match self.status {
                    GameStatus::Playing => GameStatus::Paused,
                    GameStatus::Paused => GameStatus::Playing,
                };
            }
            GameInput::Confirm | GameInput::Back | GameInput::Quit => {}
        }
    }

    /// Buffers a turn; ignored while paused.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.status == GameStatus::Playing {
            self.snake.set_direction(direction);
        }
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.geometry.grid()
    }

    #[must_use]
    pub fn geometry(&self) -> ScreenGeometry {
        self.geometry
    }

    #[must_use]
    pub fn level(&self) -> Difficulty {
        self.level
    }

    #[must_use]
    pub fn settings(&self) -> &LevelSettings {
        &self.settings
    }

    fn collect_items(&mut self, events: &mut Vec<GameEvent>) -> Result<(), SpawnError> {
        let head = self.snake.head();

        if head == self.apple.position {
            self.snake.grow();
            self.change_score(ItemKind::Beneficial, events);

            let bounds = self.bounds();
            let excluded = self.occupied_cells(false);
            self.apple.respawn(&mut self.rng, bounds, &excluded)?;
            self.respawn_poisons();
        }

        if let Some(index) = self.poisons.iter().position(|item| item.position == head) {
            self.poisons.swap_remove(index);
            self.change_score(ItemKind::Harmful, events);
        }

        Ok(())
    }

    fn change_score(&mut self, kind: ItemKind, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::ItemConsumed(kind));
        let before = self.score.current();
        let beaten = self.score.add(kind.score_delta());

        if self.score.current() != before {
            events.push(GameEvent::ScoreChanged {
                score: self.score.current(),
                high_score: self.score.high(),
            });
        }
        if beaten {
            events.push(GameEvent::NewHighScore(self.score.high()));
        }
    }

    /// First matching failure: wall, then self, then trap.
    fn failure(&self) -> Option<DeathReason> {
        let head = self.snake.head();

        if !head.is_within_bounds(self.bounds()) {
            return Some(DeathReason::WallCollision);
        }
        if self.snake.head_overlaps_body() {
            return Some(DeathReason::SelfCollision);
        }
        if self.settings.hazards_enabled && self.obstacles.hits(head) {
            return Some(DeathReason::HazardCollision);
        }
        None
    }

    fn game_over(
        &mut self,
        reason: DeathReason,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), SpawnError> {
        let score = self.score.current();
        info!(
            "{} run ended by {reason:?} at score {score} (high {})",
            self.score.level(),
            self.score.high()
        );

        events.push(GameEvent::GameOver { reason, score });
        self.deaths += 1;
        self.last_death = Some(reason);

        self.snake.reset();
        self.score.reset();
        self.obstacles.clear();
        if score > 0 {
            events.push(GameEvent::ScoreChanged {
                score: 0,
                high_score: self.score.high(),
            });
        }

        let bounds = self.bounds();
        let excluded = self.occupied_cells(false);
        self.apple.respawn(&mut self.rng, bounds, &excluded)?;
        self.respawn_poisons();
        Ok(())
    }

    /// Replaces the poison set when poison is enabled for this level.
    fn respawn_poisons(&mut self) {
        if !self.settings.poison_enabled {
            return;
        }

        self.poisons.clear();
        let bounds = self.bounds();
        let excluded = self.occupied_cells(true);
        self.poisons = spawn_poisons(
            &mut self.rng,
            bounds,
            &excluded,
            self.settings.poison_min,
            self.settings.poison_max,
        );
        debug!("spawned {} poison items", self.poisons.len());
    }

    /// Snake, trap and poison cells, plus the apple when `with_apple` is set.
    fn occupied_cells(&self, with_apple: bool) -> HashSet<Position> {
        let mut cells: HashSet<Position> = self.snake.segments().copied().collect();
        cells.extend(self.poisons.iter().map(|item| item.position));
        if self.settings.hazards_enabled {
            cells.extend(self.obstacles.cells());
        }
        if with_apple {
            cells.insert(self.apple.position);
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::config::{Difficulty, LevelSettings, ScreenGeometry};
    use crate::grid::{GridSize, Position};
    use crate::input::{Direction, GameInput};
    use crate::item::{Item, ItemKind};
    use crate::score::Score;
    use crate::snake::Snake;
    use super::{DeathReason, GameEvent, GameState, GameStatus};

    fn state(level: Difficulty, width: u16, height: u16, seed: u64) -> GameState {
        GameState::new_with_seed(
            ScreenGeometry::from_grid(GridSize { width, height }, 30),
            level,
            LevelSettings::for_level(level),
            Score::in_memory(level.key()),
            seed,
        )
        .expect("fresh board has room for the apple")
    }

    fn tick(state: &mut GameState) -> Vec<GameEvent> {
        state.tick().expect("board has free cells")
    }

    #[test]
    fn new_session_spawns_apple_off_the_snake() {
        let state = state(Difficulty::Easy, 10, 10, 1);

        assert_eq!(state.snake.len(), 3);
        assert!(!state.snake.occupies(state.apple.position));
        assert!(state.poisons.is_empty());
    }

    #[test]
    fn snake_grows_after_eating_apple() {
        let mut state = state(Difficulty::Easy, 10, 10, 1);
        state.snake = Snake::new(Position::new(5, 5), Direction::Right);
        state.apple = Item::apple(Position::new(6, 5));

        let events = tick(&mut state);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.score.current(), 1);
        assert!(events.contains(&GameEvent::ItemConsumed(ItemKind::Beneficial)));
        assert!(!state.snake.occupies(state.apple.position));

        tick(&mut state);
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn wall_collision_resets_session() {
        let mut state = state(Difficulty::Easy, 10, 10, 2);
        state.snake = Snake::new(Position::new(9, 5), Direction::Right);
        state.apple = Item::apple(Position::new(0, 0));
        state.score.add(3);

        let events = tick(&mut state);

        assert!(events.contains(&GameEvent::GameOver {
            reason: DeathReason::WallCollision,
            score: 3
        }));
        assert_eq!(state.last_death, Some(DeathReason::WallCollision));
        assert_eq!(state.deaths, 1);
        assert_eq!(state.score.current(), 0);
        assert_eq!(state.score.high(), 3);
        assert_eq!(state.snake.head(), Position::new(9, 5));
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.status, GameStatus::Playing);
    }

    #[test]
    fn self_collision_resets_session() {
        let mut state = state(Difficulty::Easy, 6, 6, 3);
        state.snake = Snake::from_segments(
            vec![
                Position::new(2, 2),
                Position::new(1, 2),
                Position::new(1, 3),
                Position::new(2, 3),
                Position::new(3, 3),
                Position::new(3, 2),
            ],
            Direction::Right,
        );
        state.apple = Item::apple(Position::new(0, 0));
        state.snake.set_direction(Direction::Down);

        let events = tick(&mut state);

        assert!(events.contains(&GameEvent::GameOver {
            reason: DeathReason::SelfCollision,
            score: 0
        }));
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn poison_costs_a_point_and_disappears() {
        let mut state = state(Difficulty::Hard, 12, 12, 4);
        state.snake = Snake::new(Position::new(5, 5), Direction::Right);
        state.apple = Item::apple(Position::new(0, 11));
        state.poisons = vec![Item::poison(Position::new(6, 5))];
        state.obstacles.clear();
        state.score.add(2);

        let events = tick(&mut state);

        assert_eq!(state.score.current(), 1);
        assert!(state.poisons.is_empty());
        assert_eq!(state.snake.len(), 3);
        assert!(events.contains(&GameEvent::ItemConsumed(ItemKind::Harmful)));
    }

    #[test]
    fn poison_at_zero_score_keeps_score_at_zero() {
        let mut state = state(Difficulty::Hard, 12, 12, 5);
        state.snake = Snake::new(Position::new(5, 5), Direction::Right);
        state.apple = Item::apple(Position::new(0, 11));
        state.poisons = vec![Item::poison(Position::new(6, 5))];

        let events = tick(&mut state);

        assert_eq!(state.score.current(), 0);
        assert!(!events
            .iter()
            .any(|event| matches!(event, GameEvent::ScoreChanged { .. })));
    }

    #[test]
    fn eating_apple_in_hard_mode_resamples_poison() {
        let mut state = state(Difficulty::Hard, 12, 12, 6);
        state.snake = Snake::new(Position::new(5, 5), Direction::Right);
        state.apple = Item::apple(Position::new(6, 5));
        state.poisons.clear();

        tick(&mut state);

        let settings = state.settings();
        assert!((settings.poison_min..=settings.poison_max).contains(&state.poisons.len()));
        assert!(state
            .poisons
            .iter()
            .all(|poison| poison.position != state.apple.position
                && !state.snake.occupies(poison.position)));
    }

    #[test]
    fn apple_respawns_clear_of_traps_and_poison() {
        for seed in 0..50 {
            let mut state = state(Difficulty::Hard, 8, 8, seed);
            state.snake = Snake::from_segments(
                vec![
                    Position::new(2, 7),
                    Position::new(1, 7),
                    Position::new(0, 7),
                ],
                Direction::Right,
            );
            state.apple = Item::apple(Position::new(3, 7));
            state.poisons = (4..7)
                .flat_map(|y| (0..8).map(move |x| Item::poison(Position::new(x, y))))
                .collect();
            // A gapless row of traps dropped onto rows 2 and 3.
            state.obstacles.spawn_row(8, 2, 2, 0);
            state.obstacles.advance(4.0, state.geometry());
            let traps: HashSet<Position> = state.obstacles.cells().collect();
            let old_poisons: HashSet<Position> =
                state.poisons.iter().map(|item| item.position).collect();
            assert_eq!(traps.len(), 16);

            let events = tick(&mut state);

            assert_eq!(events[0], GameEvent::ItemConsumed(ItemKind::Beneficial));
            let apple = state.apple.position;
            assert!(!traps.contains(&apple), "seed {seed}: apple on a trap");
            assert!(!old_poisons.contains(&apple), "seed {seed}: apple on poison");
            assert!(!state.snake.occupies(apple), "seed {seed}: apple on the snake");
            assert!(state.poisons.iter().all(|poison| poison.position != apple));
        }
    }

    #[test]
    fn trap_collision_is_checked_in_hard_mode() {
        let mut state = state(Difficulty::Hard, 12, 12, 7);
        state.apple = Item::apple(Position::new(0, 11));
        state.poisons.clear();
        state.obstacles.spawn_row(12, 2, 2, 3);
        let trap = state.obstacles.obstacles()[1];
        state.snake = Snake::new(Position::new(trap.x - 1, 0), Direction::Right);
        // Drop the row from y = -2 so it covers rows 0 and 1.
        state.obstacles.advance(2.0, state.geometry());
        assert!(state.obstacles.hits(Position::new(trap.x, 0)));

        let events = tick(&mut state);

        assert!(events.contains(&GameEvent::GameOver {
            reason: DeathReason::HazardCollision,
            score: 0
        }));
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn traps_are_ignored_outside_hard_mode() {
        let mut state = state(Difficulty::Easy, 12, 12, 8);
        state.snake = Snake::new(Position::new(5, 5), Direction::Right);
        state.apple = Item::apple(Position::new(0, 11));
        state.obstacles.spawn_row(12, 12, 6, 0);
        state.obstacles.advance(8.0, state.geometry());
        assert!(state.obstacles.hits(Position::new(6, 5)));

        let events = tick(&mut state);

        assert!(events.is_empty());
        assert_eq!(state.deaths, 0);
    }

    #[test]
    fn wall_is_checked_before_trap() {
        let mut state = state(Difficulty::Hard, 10, 10, 9);
        state.snake = Snake::new(Position::new(5, 0), Direction::Up);
        state.apple = Item::apple(Position::new(0, 9));
        state.poisons.clear();
        state.obstacles.spawn_row(10, 10, 3, 0);
        state.obstacles.advance(2.0, state.geometry());
        assert!(state.obstacles.hits(Position::new(5, -1)));

        let events = tick(&mut state);

        assert_eq!(state.last_death, Some(DeathReason::WallCollision));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn paused_session_does_not_tick_or_turn() {
        let mut state = state(Difficulty::Easy, 10, 10, 10);
        let head = state.snake.head();

        state.apply_input(GameInput::Pause);
        state.apply_input(GameInput::Direction(Direction::Up));
        assert!(tick(&mut state).is_empty());
        assert_eq!(state.snake.head(), head);
        assert_eq!(state.tick_count, 0);

        state.apply_input(GameInput::Pause);
        tick(&mut state);
        assert_eq!(state.snake.head(), Position::new(head.x + 1, head.y));
    }

    #[test]
    fn new_high_score_event_fires_once_per_improvement() {
        let mut state = state(Difficulty::Easy, 10, 10, 11);
        state.snake = Snake::new(Position::new(2, 5), Direction::Right);
        state.apple = Item::apple(Position::new(3, 5));

        let events = tick(&mut state);

        assert!(events.contains(&GameEvent::NewHighScore(1)));
        assert!(events.contains(&GameEvent::ScoreChanged {
            score: 1,
            high_score: 1
        }));
    }
}
