//! Carousel position dots, autoplay badge and progress bar.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};

use showcase_core::AutoplayPhase;

use crate::theme::Palette;

/// Columns taken by one dot, including its trailing gap.
pub const DOT_WIDTH: u16 = 2;

/// `● ○ ○ ○` with the active item filled.
pub fn dots(len: usize, active: usize, palette: &Palette) -> Line<'static> {
    let spans: Vec<Span<'static>> = (0..len)
        .map(|i| {
            if i == active {
                Span::styled("● ", palette.emphasis())
            } else {
                Span::styled("○ ", palette.muted())
            }
        })
        .collect();
    Line::from(spans)
}

/// Which dot a click at column `x` hits, for dots rendered at `area.x`.
pub fn dot_at(area: Rect, x: u16, len: usize) -> Option<usize> {
    let offset = x.checked_sub(area.x)?;
    let index = usize::from(offset / DOT_WIDTH);
    (index < len).then_some(index)
}

/// Autoplay badge: running, paused by hover/focus, or off.
pub fn autoplay_badge(phase: AutoplayPhase, palette: &Palette) -> Span<'static> {
    match phase {
        AutoplayPhase::Running => Span::styled("▶ auto", palette.success()),
        AutoplayPhase::PausedByInteraction => Span::styled("⏸ pausa", palette.warning()),
        AutoplayPhase::Stopped => Span::styled("■ manual", palette.muted()),
    }
}

/// Fraction of the course reached at `active`, as a 0.0..=1.0 ratio.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn progress_ratio(active: usize, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    ((active + 1) as f64 / len as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_maps_to_dot() {
        let area = Rect::new(10, 5, 20, 1);
        assert_eq!(dot_at(area, 10, 7), Some(0));
        assert_eq!(dot_at(area, 11, 7), Some(0));
        assert_eq!(dot_at(area, 14, 7), Some(2));
        assert_eq!(dot_at(area, 9, 7), None);
        assert_eq!(dot_at(area, 24, 7), None);
    }

    #[test]
    fn progress_reaches_one_on_last_item() {
        assert!((progress_ratio(6, 7) - 1.0).abs() < f64::EPSILON);
        assert!(progress_ratio(0, 7) > 0.0);
        assert!(progress_ratio(0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn active_dot_is_filled() {
        let line = dots(3, 1, &Palette::default());
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "○ ● ○ ");
    }
}
