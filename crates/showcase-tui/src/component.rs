//! Component trait, the building block for every screen.

use color_eyre::eyre::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect};

use crate::action::Action;
use crate::theme::Palette;

/// Every screen implements Component.
///
/// Lifecycle: (`handle_key_event` | `handle_mouse_event` | `update` | `render`)*
pub trait Component: Send {
    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Handle a mouse event. Return an Action to dispatch, or None.
    fn handle_mouse_event(&mut self, _mouse: MouseEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Process a dispatched action. May return a follow-up action.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Render into the provided frame area with the active palette.
    fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette);

    /// Set focus state.
    fn set_focused(&mut self, _focused: bool) {}

    /// When true the app forwards every key (except Ctrl+C) to this
    /// component instead of applying global bindings.
    fn captures_input(&self) -> bool {
        false
    }

    /// One-line key hints for the status bar.
    fn hints(&self) -> &'static str {
        ""
    }
}
