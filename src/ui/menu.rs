use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::app::{MAIN_MENU_ENTRIES, MenuList};
use crate::config::Difficulty;

const TITLE: &str = "GRUBSNAKE";
const BUTTON_SELECTED: Color = Color::LightGreen;
const BUTTON_IDLE: Color = Color::Gray;
const FOOTER: Color = Color::DarkGray;

/// Draws the title screen with its PLAY / INSTRUCTIONS / EXIT buttons.
pub fn render_main_menu(frame: &mut Frame<'_>, area: Rect, menu: &MenuList, title_color: Color) {
    render_button_screen(frame, area, TITLE, &MAIN_MENU_ENTRIES, menu, title_color);
}

/// Draws the difficulty picker.
pub fn render_level_menu(frame: &mut Frame<'_>, area: Rect, menu: &MenuList, title_color: Color) {
    let labels = Difficulty::ALL.map(Difficulty::label);
    render_button_screen(
        frame,
        area,
        "Choose the Level to Play",
        &labels,
        menu,
        title_color,
    );
}

/// Draws the controls and rules.
pub fn render_instructions(frame: &mut Frame<'_>, area: Rect, title_color: Color) {
    let [title_row, body_row, footer_row] = screen_rows(area);

    frame.render_widget(title(TITLE, title_color), title_row);

    let body = vec![
        Line::from("Steer with the arrow keys or WASD."),
        Line::from("Eat apples to grow and score."),
        Line::from(""),
        Line::from("Hard mode adds poison (-1 point)"),
        Line::from("and falling traps."),
        Line::from(""),
        Line::from("Walls, your own tail and traps end the run."),
        Line::from("High scores are kept per level."),
    ];
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" how to play ")),
        centered_popup(body_row, 70, 100),
    );

    frame.render_widget(footer("[Enter]/[Esc] Back"), footer_row);
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[P] Resume"),
        Line::from("[Esc] Levels   [Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

fn render_button_screen(
    frame: &mut Frame<'_>,
    area: Rect,
    heading: &str,
    labels: &[&str],
    menu: &MenuList,
    title_color: Color,
) {
    let [title_row, body_row, footer_row] = screen_rows(area);

    frame.render_widget(title(heading, title_color), title_row);

    let mut lines = Vec::with_capacity(labels.len() * 2);
    for (index, label) in labels.iter().enumerate() {
        let line = if index == menu.selected() {
            Line::styled(
                format!("▶ {label} ◀"),
                Style::default()
                    .fg(BUTTON_SELECTED)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Line::styled((*label).to_owned(), Style::default().fg(BUTTON_IDLE))
        };
        lines.push(line);
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body_row);
    frame.render_widget(
        footer("[↑/↓] Select   [Enter] Confirm   [Esc] Back   [Q] Quit"),
        footer_row,
    );
}

fn screen_rows(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(5),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(area)
}

fn title(text: &str, color: Color) -> Paragraph<'_> {
    Paragraph::new(vec![Line::from(""), Line::from(""), Line::from(text)])
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn footer(text: &str) -> Paragraph<'_> {
    Paragraph::new(Line::from(text))
        .alignment(Alignment::Center)
        .style(Style::default().fg(FOOTER))
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
