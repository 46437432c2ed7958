use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::border;
use ratatui::widgets::Block;

use crate::app::{App, Gameplay, ScreenKind};
use crate::game::{GameState, GameStatus};
use crate::grid::{GridSize, Position};
use crate::input::Direction;
use crate::item::ItemKind;
use crate::snake::{CornerKind, SegmentShape};
use crate::ui::fade::blend_color;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_instructions, render_level_menu, render_main_menu, render_pause_menu};

/// Terminal columns per grid cell, so cells come out roughly square.
pub const CELL_COLUMNS: u16 = 2;

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

const TITLE: Color = Color::LightGreen;
const BORDER: Color = Color::DarkGray;
const SNAKE_HEAD: Color = Color::LightGreen;
const SNAKE_BODY: Color = Color::Green;
const APPLE: Color = Color::Red;
const POISON: Color = Color::Magenta;
const TRAP: Color = Color::Yellow;

/// Renders the current screen.
pub fn render(frame: &mut Frame<'_>, app: &App, now: Instant) {
    let area = frame.area();
    let title_color = blend_color(Color::Black, TITLE, app.fade().factor(now));

    match app.screen() {
        ScreenKind::Menu => render_main_menu(frame, area, app.main_menu(), title_color),
        ScreenKind::LevelSelect => render_level_menu(frame, area, app.level_menu(), title_color),
        ScreenKind::Instructions => render_instructions(frame, area, title_color),
        ScreenKind::Gameplay => {
            if let Some(gameplay) = app.gameplay() {
                render_gameplay(frame, area, gameplay, now);
            }
        }
    }
}

fn render_gameplay(frame: &mut Frame<'_>, area: Rect, gameplay: &Gameplay, now: Instant) {
    let play_area = render_hud(frame, area, gameplay, now);
    let state = &gameplay.state;

    let board = board_area(play_area, state.bounds());
    let block = Block::bordered()
        .border_set(BORDER_HALF_BLOCK)
        .border_style(Style::new().fg(BORDER));
    let inner = block.inner(board);
    frame.render_widget(block, board);

    render_obstacles(frame, inner, state);
    render_items(frame, inner, state);
    render_snake(frame, inner, state);

    if state.status == GameStatus::Paused {
        render_pause_menu(frame, play_area);
    }
}

/// Centers a bordered board for `bounds` inside `area`, clipping when the
/// terminal is too small.
fn board_area(area: Rect, bounds: GridSize) -> Rect {
    let width = bounds.width.saturating_mul(CELL_COLUMNS).saturating_add(2);
    let height = bounds.height.saturating_add(2);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    board
}

fn render_obstacles(frame: &mut Frame<'_>, inner: Rect, state: &GameState) {
    let bounds = state.bounds();
    let buffer = frame.buffer_mut();
    for cell in state.obstacles.cells() {
        if let Some((x, y)) = cell_to_terminal(inner, bounds, cell) {
            buffer.set_string(x, y, "▒▒", Style::new().fg(TRAP));
        }
    }
}

fn render_items(frame: &mut Frame<'_>, inner: Rect, state: &GameState) {
    let bounds = state.bounds();
    let buffer = frame.buffer_mut();
    for item in state.poisons.iter().chain(std::iter::once(&state.apple)) {
        let Some((x, y)) = cell_to_terminal(inner, bounds, item.position) else {
            continue;
        };
        let (glyph, color) = match item.kind {
            ItemKind::Beneficial => ("●", APPLE),
            ItemKind::Harmful => ("✖", POISON),
        };
        buffer.set_string(x, y, glyph, Style::new().fg(color).add_modifier(Modifier::BOLD));
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, state: &GameState) {
    let bounds = state.bounds();
    let buffer = frame.buffer_mut();
    for (segment, shape) in state.snake.segment_shapes() {
        let Some((x, y)) = cell_to_terminal(inner, bounds, segment) else {
            continue;
        };
        let style = match shape {
            SegmentShape::Head(_) => Style::new().fg(SNAKE_HEAD).add_modifier(Modifier::BOLD),
            _ => Style::new().fg(SNAKE_BODY),
        };
        buffer.set_string(x, y, segment_glyph(shape), style);
    }
}

/// Two-column glyph for a snake segment.
#[must_use]
pub fn segment_glyph(shape: SegmentShape) -> &'static str {
    match shape {
        SegmentShape::Head(Direction::Up) => "▲▲",
        SegmentShape::Head(Direction::Down) => "▼▼",
        SegmentShape::Head(Direction::Left) => "◀█",
        SegmentShape::Head(Direction::Right) => "█▶",
        SegmentShape::Tail(Direction::Left | Direction::Right) => "▬▬",
        SegmentShape::Tail(Direction::Up | Direction::Down) => "▐▌",
        SegmentShape::Horizontal | SegmentShape::Vertical => "██",
        SegmentShape::Corner(CornerKind::TopLeft) => "▟█",
        SegmentShape::Corner(CornerKind::TopRight) => "█▙",
        SegmentShape::Corner(CornerKind::BottomLeft) => "▜█",
        SegmentShape::Corner(CornerKind::BottomRight) => "█▛",
    }
}

/// Maps a grid cell to the terminal column/row of its left half.
fn cell_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_COLUMNS)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_COLUMNS) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
