use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::Gameplay;
use crate::game::{DeathReason, GameState};
use crate::ui::fade::blend_color;

const SEPARATOR: &str = " │ ";
const HUD_LABEL: Color = Color::DarkGray;
const HUD_VALUE: Color = Color::White;
const HUD_ACCENT: Color = Color::LightGreen;
const HUD_ALERT: Color = Color::Red;

/// Renders the one-line HUD and returns the remaining play area below it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, gameplay: &Gameplay, now: Instant) -> Rect {
    let [hud_area, play_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    let state = &gameplay.state;

    let stats = stats_line(state, usize::from(hud_area.width));
    let stats_width = u16::try_from(line_width(&stats)).unwrap_or(u16::MAX);
    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(stats_width)]).areas(hud_area);

    let alert = gameplay.game_over_flash(now).zip(state.last_death);
    let status = match alert {
        Some((fade, reason)) => Line::styled(
            death_message(reason),
            Style::default()
                .fg(blend_color(HUD_ALERT, HUD_LABEL, fade.factor(now)))
                .add_modifier(Modifier::BOLD),
        ),
        None => Line::from(vec![
            Span::styled("GRUBSNAKE ", Style::default().fg(HUD_ACCENT)),
            Span::styled(state.level().label(), Style::default().fg(HUD_LABEL)),
        ]),
    };

    frame.render_widget(Paragraph::new(status).alignment(Alignment::Left), left);
    frame.render_widget(Paragraph::new(stats).alignment(Alignment::Right), right);

    play_area
}

/// HUD text for the failure that just reset the run.
#[must_use]
pub fn death_message(reason: DeathReason) -> &'static str {
    match reason {
        DeathReason::WallCollision => "Ouch! Hit the wall",
        DeathReason::SelfCollision => "Ouch! Bit your own tail",
        DeathReason::HazardCollision => "Ouch! Caught in a trap",
    }
}

/// `Length │ Score │ Hi │ Deaths`, with one-letter labels when the full
/// line does not fit.
fn stats_line(state: &GameState, available_width: usize) -> Line<'static> {
    let score = state.score.current();
    let high = state.score.high();
    let values = [
        ("Length", "L", state.snake.len().to_string(), HUD_VALUE),
        (
            "Score",
            "S",
            score.to_string(),
            if score > 0 && score == high {
                HUD_ACCENT
            } else {
                HUD_VALUE
            },
        ),
        ("Hi", "H", high.to_string(), HUD_LABEL),
        ("Deaths", "D", state.deaths.to_string(), HUD_LABEL),
    ];

    let full_width: usize = values
        .iter()
        .map(|(label, _, value, _)| label.width() + 2 + value.width())
        .sum::<usize>()
        + SEPARATOR.width() * (values.len() - 1);
    let compact = full_width > available_width;

    let mut spans = Vec::with_capacity(values.len() * 3);
    for (index, (label, short, value, color)) in values.into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(SEPARATOR, Style::default().fg(HUD_LABEL)));
        }
        let label = if compact { short } else { label };
        spans.push(Span::styled(format!("{label}: "), Style::default().fg(HUD_LABEL)));
        spans.push(Span::styled(value, Style::default().fg(color)));
    }

    Line::from(spans)
}

fn line_width(line: &Line<'_>) -> usize {
    line.spans
        .iter()
        .map(|span| span.content.as_ref().width())
        .sum()
}
