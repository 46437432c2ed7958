use crate::config::{LevelSettings, ScreenGeometry};
use crate::grid::Position;

/// A falling trap covering `width × height` cells.
///
/// `y` is fractional while the trap slides down; occupied cells use its floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub x: i32,
    pub y: f32,
    pub width: u16,
    pub height: u16,
}

impl Obstacle {
    /// Creates a trap just above the top edge so it slides in.
    #[must_use]
    pub fn above_top(x: i32, width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            x,
            y: -f32::from(height),
            width,
            height,
        }
    }

    /// Grid row of the top edge.
    #[must_use]
    pub fn top_row(&self) -> i32 {
        self.y.floor() as i32
    }

    /// Every grid cell the trap currently covers, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        let top = self.top_row();
        (0..i32::from(self.height)).flat_map(move |dy| {
            (0..i32::from(self.width)).map(move |dx| Position::new(self.x + dx, top + dy))
        })
    }

    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        let top = self.top_row();
        position.x >= self.x
            && position.x < self.x + i32::from(self.width)
            && position.y >= top
            && position.y < top + i32::from(self.height)
    }

    /// True once the bottom edge has reached the bottom of the screen.
    #[must_use]
    pub fn is_off_screen(&self, geometry: ScreenGeometry) -> bool {
        (self.y + f32::from(self.height)) * geometry.cell_size as f32
            >= geometry.height_px as f32
    }
}

/// Left columns for one evenly spread, centered row of traps.
///
/// As many traps as fit with at least `gap` empty columns between them are
/// placed; leftover columns are split over the `count + 1` outer and inner
/// gaps, the first `leftover % (count + 1)` gaps taking one extra column.
/// A trap wider than the grid is clamped to the grid width.
#[must_use]
pub fn row_columns(grid_width: u16, obstacle_width: u16, gap: u16) -> Vec<i32> {
    if grid_width == 0 {
        return Vec::new();
    }

    let grid_width = u32::from(grid_width);
    let width = u32::from(obstacle_width).clamp(1, grid_width);
    let gap = u32::from(gap);

    let count = (grid_width + gap) / (width + gap);
    let used = count * width + (count - 1) * gap;
    let leftover = grid_width - used;
    let slots = count + 1;
    let base = leftover / slots;
    let extra = leftover % slots;
    let slack = |slot: u32| base + u32::from(slot < extra);

    let mut columns = Vec::with_capacity(count as usize);
    let mut x = slack(0);
    columns.push(x as i32);
    for slot in 1..count {
        x += width + gap + slack(slot);
        columns.push(x as i32);
    }
    columns
}

/// Hard-mode trap field: timed row spawns, downward drift, despawn.
#[derive(Debug, Clone)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    ticks_since_spawn: u32,
    width: u16,
    height: u16,
    gap: u16,
    speed: f32,
    spawn_interval: u32,
}

impl ObstacleField {
    #[must_use]
    pub fn new(settings: &LevelSettings) -> Self {
        Self {
            obstacles: Vec::new(),
            ticks_since_spawn: 0,
            width: settings.obstacle_width.max(1),
            height: settings.obstacle_height.max(1),
            gap: settings.obstacle_gap,
            speed: settings.obstacle_speed,
            spawn_interval: settings.obstacle_spawn_interval,
        }
    }

    /// Adds one row of traps above the top edge.
    pub fn spawn_row(
        &mut self,
        grid_width: u16,
        obstacle_width: u16,
        obstacle_height: u16,
        gap: u16,
    ) {
        let width = obstacle_width.clamp(1, grid_width.max(1));
        self.obstacles.extend(
            row_columns(grid_width, width, gap)
                .into_iter()
                .map(|x| Obstacle::above_top(x, width, obstacle_height)),
        );
    }

    /// Moves every trap down by `speed` cells and drops the ones that left
    /// the screen.
    pub fn advance(&mut self, speed: f32, geometry: ScreenGeometry) {
        for obstacle in &mut self.obstacles {
            obstacle.y += speed;
        }
        self.obstacles.retain(|obstacle| !obstacle.is_off_screen(geometry));
    }

    /// True when no trap still sits in the top band a new row would use.
    #[must_use]
    pub fn top_band_clear(&self) -> bool {
        let band = i32::from(self.height) + 1;
        self.obstacles
            .iter()
            .all(|obstacle| obstacle.top_row() >= band)
    }

    /// One simulation tick: drift, then spawn a row when both the timer has
    /// elapsed and the top band is clear. Returns true when a row spawned.
    pub fn tick(&mut self, geometry: ScreenGeometry) -> bool {
        self.ticks_since_spawn = self.ticks_since_spawn.saturating_add(1);
        self.advance(self.speed, geometry);

        if self.ticks_since_spawn < self.spawn_interval || !self.top_band_clear() {
            return false;
        }

        let grid_width = geometry.grid().width;
        self.spawn_row(grid_width, self.width, self.height, self.gap);
        self.ticks_since_spawn = 0;
        true
    }

    /// True when any trap covers `position`.
    #[must_use]
    pub fn hits(&self, position: Position) -> bool {
        self.obstacles
            .iter()
            .any(|obstacle| obstacle.occupies(position))
    }

    /// Every covered cell, including ones still above the board.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.obstacles.iter().flat_map(Obstacle::cells)
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.ticks_since_spawn = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
