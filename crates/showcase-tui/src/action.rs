//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use showcase_core::{AutoplayTick, ContactMessage, CoreError};

use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,
    /// Open the detail page for the week at this catalog index.
    OpenWeek(usize),
    CloseWeek,

    // ── Autoplay ──────────────────────────────────────────────────
    /// Timer firing from a carousel's ticker; routed by `source`.
    AutoplayTick(AutoplayTick),

    // ── Theme switcher ────────────────────────────────────────────
    NextTheme,
    ToggleThemeAutoplay,

    // ── Contact form ──────────────────────────────────────────────
    /// A validated message ready for delivery.
    SubmitContact(ContactMessage),
    ContactDelivered(Arc<Result<(), CoreError>>),

    // ── Help ──────────────────────────────────────────────────────
    ToggleHelp,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}
