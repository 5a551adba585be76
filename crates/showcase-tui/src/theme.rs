//! Colour themes and semantic styling.
//!
//! Five palettes, selected by the theme carousel in [`App`](crate::app::App).
//! Screens never name colours directly; they ask the active [`Palette`]
//! for a semantic style.

use ratatui::style::{Color, Modifier, Style};

/// Selectable colour themes, in switcher order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::VariantArray,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ThemeName {
    Light,
    #[default]
    Dark,
    Blue,
    Green,
    Orange,
}

impl ThemeName {
    /// Position in the switcher.
    pub fn index(self) -> usize {
        <Self as strum::VariantArray>::VARIANTS
            .iter()
            .position(|&t| t == self)
            .unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Self {
        <Self as strum::VariantArray>::VARIANTS
            .get(index)
            .copied()
            .unwrap_or_default()
    }

    pub fn count() -> usize {
        <Self as strum::VariantArray>::VARIANTS.len()
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Light => Palette {
                bg: Color::Rgb(248, 250, 252),
                surface: Color::Rgb(226, 232, 240),
                text: Color::Rgb(30, 41, 59),
                muted: Color::Rgb(100, 116, 139),
                accent: Color::Rgb(79, 70, 229),
                accent_alt: Color::Rgb(219, 39, 119),
                success: Color::Rgb(22, 163, 74),
                warning: Color::Rgb(202, 138, 4),
                error: Color::Rgb(220, 38, 38),
            },
            Self::Dark => Palette {
                bg: Color::Rgb(15, 23, 42),
                surface: Color::Rgb(30, 41, 59),
                text: Color::Rgb(226, 232, 240),
                muted: Color::Rgb(100, 116, 139),
                accent: Color::Rgb(129, 140, 248),
                accent_alt: Color::Rgb(244, 114, 182),
                success: Color::Rgb(74, 222, 128),
                warning: Color::Rgb(250, 204, 21),
                error: Color::Rgb(248, 113, 113),
            },
            Self::Blue => Palette {
                bg: Color::Rgb(12, 26, 51),
                surface: Color::Rgb(23, 45, 84),
                text: Color::Rgb(219, 234, 254),
                muted: Color::Rgb(96, 130, 182),
                accent: Color::Rgb(96, 165, 250),
                accent_alt: Color::Rgb(34, 211, 238),
                success: Color::Rgb(52, 211, 153),
                warning: Color::Rgb(251, 191, 36),
                error: Color::Rgb(251, 113, 133),
            },
            Self::Green => Palette {
                bg: Color::Rgb(10, 31, 22),
                surface: Color::Rgb(20, 53, 38),
                text: Color::Rgb(220, 252, 231),
                muted: Color::Rgb(94, 140, 112),
                accent: Color::Rgb(74, 222, 128),
                accent_alt: Color::Rgb(163, 230, 53),
                success: Color::Rgb(134, 239, 172),
                warning: Color::Rgb(253, 224, 71),
                error: Color::Rgb(252, 129, 129),
            },
            Self::Orange => Palette {
                bg: Color::Rgb(36, 20, 8),
                surface: Color::Rgb(66, 37, 14),
                text: Color::Rgb(255, 237, 213),
                muted: Color::Rgb(168, 122, 84),
                accent: Color::Rgb(251, 146, 60),
                accent_alt: Color::Rgb(250, 204, 21),
                success: Color::Rgb(163, 230, 53),
                warning: Color::Rgb(253, 186, 116),
                error: Color::Rgb(248, 113, 113),
            },
        }
    }
}

/// Colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub accent_alt: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Palette {
    fn default() -> Self {
        ThemeName::default().palette()
    }
}

// ── Semantic styles ──────────────────────────────────────────────────

impl Palette {
    /// Whole-frame background.
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn emphasis(&self) -> Style {
        Style::default()
            .fg(self.accent_alt)
            .add_modifier(Modifier::BOLD)
    }

    /// Highlighted list row.
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.surface)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_active(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn tab_inactive(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Key hint text (e.g., "q quit  ? help").
    pub fn key_hint(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Key hint key character.
    pub fn key_hint_key(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }
}

/// Parse a `#rrggbb` accent; falls back to `fallback` on anything else.
pub fn hex_color(hex: &str, fallback: Color) -> Color {
    let Some(digits) = hex.strip_prefix('#').filter(|d| d.len() == 6) else {
        return fallback;
    };
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => fallback,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!(ThemeName::from_str("green").unwrap(), ThemeName::Green);
        assert_eq!(ThemeName::from_str("ORANGE").unwrap(), ThemeName::Orange);
        assert!(ThemeName::from_str("purple").is_err());
        assert_eq!(ThemeName::Blue.to_string(), "blue");
    }

    #[test]
    fn index_round_trips_through_switcher_order() {
        assert_eq!(ThemeName::count(), 5);
        for i in 0..ThemeName::count() {
            assert_eq!(ThemeName::from_index(i).index(), i);
        }
        assert_eq!(ThemeName::from_index(99), ThemeName::Dark);
    }

    #[test]
    fn hex_accent_parsing() {
        assert_eq!(hex_color("#4f46e5", Color::Reset), Color::Rgb(0x4f, 0x46, 0xe5));
        assert_eq!(hex_color("4f46e5", Color::Reset), Color::Reset);
        assert_eq!(hex_color("#zzzzzz", Color::Red), Color::Red);
    }
}
