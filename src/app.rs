use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::config::{Difficulty, GameSettings, ScreenGeometry};
use crate::error::SpawnError;
use crate::game::{GameEvent, GameState};
use crate::input::{Direction, GameInput};
use crate::score::{HighScoreStore, Score};
use crate::ui::fade::Fade;

/// Title fade-in after every screen change.
pub const SCREEN_FADE: Duration = Duration::from_millis(450);

/// HUD highlight after a run ends.
pub const GAME_OVER_FLASH: Duration = Duration::from_millis(900);

/// Main menu entries, top to bottom.
pub const MAIN_MENU_ENTRIES: [&str; 3] = ["PLAY", "INSTRUCTIONS", "EXIT"];

/// The fixed set of screens.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ScreenKind {
    Menu,
    LevelSelect,
    Instructions,
    Gameplay,
}

/// What a screen asks for in response to input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Trigger {
    /// Confirm on the menu entry at this index.
    Select(usize),
    Back,
}

/// Outcome of one trigger.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Transition {
    Stay,
    Goto(ScreenKind),
    Play(Difficulty),
    Quit,
}

impl ScreenKind {
    /// Transition table between screens.
    #[must_use]
    pub fn transition(self, trigger: Trigger) -> Transition {
        match (self, trigger) {
            (Self::Menu, Trigger::Select(0)) => Transition::Goto(Self::LevelSelect),
            (Self::Menu, Trigger::Select(1)) => Transition::Goto(Self::Instructions),
            (Self::Menu, Trigger::Select(2) | Trigger::Back) => Transition::Quit,
            (Self::LevelSelect, Trigger::Select(index)) => Difficulty::ALL
                .get(index)
                .copied()
                .map_or(Transition::Stay, Transition::Play),
            (Self::LevelSelect | Self::Instructions, Trigger::Back)
            | (Self::Instructions, Trigger::Select(_)) => Transition::Goto(Self::Menu),
            (Self::Gameplay, Trigger::Back) => Transition::Goto(Self::LevelSelect),
            _ => Transition::Stay,
        }
    }
}

/// Cursor over a vertical list of buttons; wraps at both ends.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MenuList {
    len: usize,
    selected: usize,
}

impl MenuList {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len: len.max(1),
            selected: 0,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.len;
    }

    pub fn previous(&mut self) {
        self.selected = (self.selected + self.len - 1) % self.len;
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Moves the cursor on up/down; other directions are ignored.
    pub fn navigate(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.previous(),
            Direction::Down => self.next(),
            Direction::Left | Direction::Right => {}
        }
    }
}

/// Startup options for the screen machine.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub geometry: ScreenGeometry,
    pub settings: GameSettings,
    /// `None` keeps high scores in memory only.
    pub scores_file: Option<PathBuf>,
    pub seed: Option<u64>,
}

/// Active level plus its tick clock.
#[derive(Debug, Clone)]
pub struct Gameplay {
    pub state: GameState,
    last_tick: Instant,
    game_over_flash: Option<Fade>,
}

impl Gameplay {
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.state.settings().move_interval_ms)
    }

    /// Fade driving the HUD highlight after a game over, while it runs.
    #[must_use]
    pub fn game_over_flash(&self, now: Instant) -> Option<Fade> {
        self.game_over_flash.filter(|fade| !fade.is_done(now))
    }
}

/// Top-level application state: the current screen and what each owns.
#[derive(Debug)]
pub struct App {
    screen: ScreenKind,
    main_menu: MenuList,
    level_menu: MenuList,
    gameplay: Option<Gameplay>,
    fade: Fade,
    config: AppConfig,
    quit: bool,
}

impl App {
    #[must_use]
    pub fn new(config: AppConfig, now: Instant) -> Self {
        Self {
            screen: ScreenKind::Menu,
            main_menu: MenuList::new(MAIN_MENU_ENTRIES.len()),
            level_menu: MenuList::new(Difficulty::ALL.len()),
            gameplay: None,
            fade: Fade::new(now, SCREEN_FADE),
            config,
            quit: false,
        }
    }

    /// Routes one input to the current screen.
    pub fn handle_input(&mut self, input: GameInput, now: Instant) -> Result<(), SpawnError> {
        if input == GameInput::Quit {
            self.quit = true;
            return Ok(());
        }

        let trigger = match (self.screen, input) {
            (ScreenKind::Gameplay, GameInput::Back) => Some(Trigger::Back),
            (ScreenKind::Gameplay, other) => {
                if let Some(gameplay) = self.gameplay.as_mut() {
                    gameplay.state.apply_input(other);
                }
                None
            }
            (ScreenKind::Menu, GameInput::Direction(direction)) => {
                self.main_menu.navigate(direction);
                None
            }
            (ScreenKind::LevelSelect, GameInput::Direction(direction)) => {
                self.level_menu.navigate(direction);
                None
            }
            (ScreenKind::Menu, GameInput::Confirm) => {
                Some(Trigger::Select(self.main_menu.selected()))
            }
            (ScreenKind::LevelSelect, GameInput::Confirm) => {
                Some(Trigger::Select(self.level_menu.selected()))
            }
            (ScreenKind::Instructions, GameInput::Confirm) => Some(Trigger::Select(0)),
            (_, GameInput::Back) => Some(Trigger::Back),
            _ => None,
        };

        match trigger {
            Some(trigger) => self.apply(self.screen.transition(trigger), now),
            None => Ok(()),
        }
    }

    /// Runs due simulation ticks. Returns the events of the tick, if one ran.
    pub fn update(&mut self, now: Instant) -> Result<Vec<GameEvent>, SpawnError> {
        let Some(gameplay) = self.gameplay.as_mut() else {
            return Ok(Vec::new());
        };
        if self.screen != ScreenKind::Gameplay
            || now.saturating_duration_since(gameplay.last_tick) < gameplay.tick_interval()
        {
            return Ok(Vec::new());
        }

        gameplay.last_tick = now;
        let events = gameplay.state.tick()?;
        for event in &events {
            match event {
                GameEvent::GameOver { .. } => {
                    gameplay.game_over_flash = Some(Fade::new(now, GAME_OVER_FLASH));
                }
                other => debug!("{other:?}"),
            }
        }
        Ok(events)
    }

    /// Starts `level` directly, skipping the menus.
    pub fn start_level(&mut self, level: Difficulty, now: Instant) -> Result<(), SpawnError> {
        self.apply(Transition::Play(level), now)
    }

    fn apply(&mut self, transition: Transition, now: Instant) -> Result<(), SpawnError> {
        match transition {
            Transition::Stay => return Ok(()),
            Transition::Quit => {
                self.quit = true;
                return Ok(());
            }
            Transition::Goto(screen) => {
                if self.screen == ScreenKind::Gameplay {
                    self.gameplay = None;
                }
                self.screen = screen;
            }
            Transition::Play(level) => {
                self.gameplay = Some(self.new_gameplay(level, now)?);
                self.screen = ScreenKind::Gameplay;
            }
        }

        info!("screen: {:?}", self.screen);
        self.fade = Fade::new(now, SCREEN_FADE);
        Ok(())
    }

    fn new_gameplay(&self, level: Difficulty, now: Instant) -> Result<Gameplay, SpawnError> {
        let store = match &self.config.scores_file {
            Some(path) => HighScoreStore::File(path.clone()),
            None => HighScoreStore::Memory,
        };
        let score = Score::load(level.key(), store);
        let settings = self.config.settings.level(level);

        let state = match self.config.seed {
            Some(seed) => {
                GameState::new_with_seed(self.config.geometry, level, settings, score, seed)?
            }
            None => GameState::new(self.config.geometry, level, settings, score)?,
        };
        info!(
            "starting {} (tick {} ms, high score {})",
            level.key(),
            settings.move_interval_ms,
            state.score.high()
        );

        Ok(Gameplay {
            state,
            last_tick: now,
            game_over_flash: None,
        })
    }

    #[must_use]
    pub fn screen(&self) -> ScreenKind {
        self.screen
    }

    #[must_use]
    pub fn main_menu(&self) -> &MenuList {
        &self.main_menu
    }

    #[must_use]
    pub fn level_menu(&self) -> &MenuList {
        &self.level_menu
    }

    #[must_use]
    pub fn gameplay(&self) -> Option<&Gameplay> {
        self.gameplay.as_ref()
    }

    #[must_use]
    pub fn fade(&self) -> Fade {
        self.fade
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quit
    }
}
