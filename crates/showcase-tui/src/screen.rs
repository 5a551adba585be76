//! Screen identifier enum.

use std::fmt;

/// Identifies each primary TUI screen, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Home, // 1
    Journey, // 2
    Contact, // 3
    /// Week detail page. Not in the tab bar; opened from the journey.
    Week,
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 3] = [Self::Home, Self::Journey, Self::Contact];

    /// Numeric key (1-3) for this screen. The week page has no number key.
    pub fn number(self) -> u8 {
        match self {
            Self::Home => 1,
            Self::Journey => 2,
            Self::Contact => 3,
            Self::Week => 0,
        }
    }

    /// Screen from a numeric key (1-3). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Home),
            2 => Some(Self::Journey),
            3 => Some(Self::Contact),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Tab group this screen highlights. The week page belongs to the journey.
    pub fn tab(self) -> Self {
        match self {
            Self::Week => Self::Journey,
            other => other,
        }
    }

    /// Short label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Inicio",
            Self::Journey => "Semanas",
            Self::Contact => "Contacto",
            Self::Week => "Semana",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
