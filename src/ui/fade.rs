use std::time::{Duration, Instant};

use ratatui::style::Color;

/// Time-based fade polled once per frame.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Fade {
    started: Instant,
    duration: Duration,
}

impl Fade {
    #[must_use]
    pub fn new(started: Instant, duration: Duration) -> Self {
        Self { started, duration }
    }

    /// Linear progress in `[0, 1]`.
    #[must_use]
    pub fn linear(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Smoothstep-eased progress in `[0, 1]`.
    #[must_use]
    pub fn factor(&self, now: Instant) -> f32 {
        ease_in_out(self.linear(now))
    }

    #[must_use]
    pub fn is_done(&self, now: Instant) -> bool {
        self.linear(now) >= 1.0
    }
}

fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Blends two colors; named colors use the usual xterm palette values.
#[must_use]
pub fn blend_color(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (color_to_rgb(from), color_to_rgb(to)) {
        (Some((fr, fg, fb)), Some((tr, tg, tb))) => {
            Color::Rgb(lerp_u8(fr, tr, t), lerp_u8(fg, tg, t), lerp_u8(fb, tb, t))
        }
        _ => {
            if t < 1.0 {
                from
            } else {
                to
            }
        }
    }
}

fn lerp_u8(from: u8, to: u8, t: f32) -> u8 {
    (f32::from(from) + (f32::from(to) - f32::from(from)) * t).round() as u8
}

fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Black => Some((0, 0, 0)),
        Color::Red => Some((205, 49, 49)),
        Color::Green => Some((13, 188, 121)),
        Color::Yellow => Some((229, 229, 16)),
        Color::Blue => Some((36, 114, 200)),
        Color::Magenta => Some((188, 63, 188)),
        Color::Cyan => Some((17, 168, 205)),
        Color::Gray => Some((229, 229, 229)),
        Color::DarkGray => Some((102, 102, 102)),
        Color::LightGreen => Some((35, 209, 139)),
        Color::White => Some((255, 255, 255)),
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use ratatui::style::Color;

    use super::{Fade, blend_color};

    #[test]
    fn factor_runs_from_zero_to_one() {
        let start = Instant::now();
        let fade = Fade::new(start, Duration::from_millis(400));

        assert_eq!(fade.factor(start), 0.0);
        assert!((fade.factor(start + Duration::from_millis(200)) - 0.5).abs() < 1e-4);
        assert_eq!(fade.factor(start + Duration::from_secs(5)), 1.0);
        assert!(fade.is_done(start + Duration::from_millis(400)));
    }

    #[test]
    fn easing_is_slow_at_the_edges() {
        let start = Instant::now();
        let fade = Fade::new(start, Duration::from_millis(1000));
        let early = start + Duration::from_millis(100);

        assert!(fade.factor(early) < fade.linear(early));
    }

    #[test]
    fn zero_duration_is_immediately_done() {
        let start = Instant::now();
        assert!(Fade::new(start, Duration::ZERO).is_done(start));
    }

    #[test]
    fn blending_hits_both_endpoints() {
        assert_eq!(blend_color(Color::Black, Color::White, 0.0), Color::Rgb(0, 0, 0));
        assert_eq!(
            blend_color(Color::Black, Color::White, 1.0),
            Color::Rgb(255, 255, 255)
        );
        assert_eq!(
            blend_color(Color::Rgb(0, 0, 0), Color::Rgb(200, 100, 50), 0.5),
            Color::Rgb(100, 50, 25)
        );
    }
}
