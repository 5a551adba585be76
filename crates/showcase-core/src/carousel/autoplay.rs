//! Autoplay state machine.
//!
//! Pure state: every transition returns a [`TimerCommand`] telling the owner
//! what to do with its tick scheduler. The owning [`Carousel`](super::Carousel)
//! applies the command, so this module never touches a clock.

use std::time::Duration;

use crate::error::CoreError;

/// Observable autoplay phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum AutoplayPhase {
    Stopped,
    Running,
    PausedByInteraction,
}

/// What the scheduler must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Start (or restart) a recurring tick with a fresh full interval.
    Arm,
    /// Drop any pending tick.
    Cancel,
    /// Leave the scheduler alone.
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoplayState {
    enabled: bool,
    interval: Duration,
    pointer_inside: bool,
    focus_inside: bool,
}

impl AutoplayState {
    pub fn new(interval: Duration) -> Result<Self, CoreError> {
        if interval.is_zero() {
            return Err(CoreError::InvalidInterval);
        }
        Ok(Self {
            enabled: false,
            interval,
            pointer_inside: false,
            focus_inside: false,
        })
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Enabled, but held while the pointer or focus is inside the component.
    pub fn paused_by_interaction(&self) -> bool {
        self.enabled && self.interacting()
    }

    pub fn phase(&self) -> AutoplayPhase {
        if !self.enabled {
            AutoplayPhase::Stopped
        } else if self.interacting() {
            AutoplayPhase::PausedByInteraction
        } else {
            AutoplayPhase::Running
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase() == AutoplayPhase::Running
    }

    pub fn enable(&mut self) -> TimerCommand {
        if self.enabled {
            return TimerCommand::Keep;
        }
        self.enabled = true;
        if self.interacting() {
            // armed later, on exit
            TimerCommand::Keep
        } else {
            TimerCommand::Arm
        }
    }

    pub fn disable(&mut self) -> TimerCommand {
        if !self.enabled {
            return TimerCommand::Keep;
        }
        self.enabled = false;
        TimerCommand::Cancel
    }

    pub fn toggle(&mut self) -> TimerCommand {
        if self.enabled {
            self.disable()
        } else {
            self.enable()
        }
    }

    pub fn pointer_enter(&mut self) -> TimerCommand {
        self.transition(|s| s.pointer_inside = true)
    }

    pub fn pointer_leave(&mut self) -> TimerCommand {
        self.transition(|s| s.pointer_inside = false)
    }

    pub fn focus_enter(&mut self) -> TimerCommand {
        self.transition(|s| s.focus_inside = true)
    }

    pub fn focus_leave(&mut self) -> TimerCommand {
        self.transition(|s| s.focus_inside = false)
    }

    /// A user-driven step happened. While running, the pending tick is
    /// replaced by a fresh interval; while paused, the tick stays cancelled
    /// until the pointer/focus leaves.
    pub fn user_step(&self) -> TimerCommand {
        match self.phase() {
            AutoplayPhase::Running => TimerCommand::Arm,
            AutoplayPhase::Stopped | AutoplayPhase::PausedByInteraction => TimerCommand::Keep,
        }
    }

    fn interacting(&self) -> bool {
        self.pointer_inside || self.focus_inside
    }

    fn transition(&mut self, change: impl FnOnce(&mut Self)) -> TimerCommand {
        let before = self.phase();
        change(self);
        match (before, self.phase()) {
            (AutoplayPhase::Running, AutoplayPhase::PausedByInteraction) => TimerCommand::Cancel,
            (AutoplayPhase::PausedByInteraction, AutoplayPhase::Running) => TimerCommand::Arm,
            _ => TimerCommand::Keep,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn state() -> AutoplayState {
        AutoplayState::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn zero_interval_rejected() {
        assert!(matches!(
            AutoplayState::new(Duration::ZERO),
            Err(CoreError::InvalidInterval)
        ));
    }

    #[test]
    fn enable_arms_once() {
        let mut s = state();
        assert_eq!(s.phase(), AutoplayPhase::Stopped);
        assert_eq!(s.enable(), TimerCommand::Arm);
        assert_eq!(s.enable(), TimerCommand::Keep);
        assert_eq!(s.phase(), AutoplayPhase::Running);
    }

    #[test]
    fn disable_when_stopped_is_noop() {
        let mut s = state();
        assert_eq!(s.disable(), TimerCommand::Keep);
        s.enable();
        assert_eq!(s.disable(), TimerCommand::Cancel);
        assert_eq!(s.phase(), AutoplayPhase::Stopped);
    }

    #[test]
    fn hover_pauses_and_leave_rearms() {
        let mut s = state();
        s.enable();
        assert_eq!(s.pointer_enter(), TimerCommand::Cancel);
        assert!(s.paused_by_interaction());
        assert_eq!(s.pointer_leave(), TimerCommand::Arm);
        assert_eq!(s.phase(), AutoplayPhase::Running);
    }

    #[test]
    fn pointer_and_focus_both_must_leave() {
        let mut s = state();
        s.enable();
        assert_eq!(s.pointer_enter(), TimerCommand::Cancel);
        assert_eq!(s.focus_enter(), TimerCommand::Keep);
        assert_eq!(s.pointer_leave(), TimerCommand::Keep);
        assert_eq!(s.phase(), AutoplayPhase::PausedByInteraction);
        assert_eq!(s.focus_leave(), TimerCommand::Arm);
    }

    #[test]
    fn enable_while_hovered_waits_for_exit() {
        let mut s = state();
        assert_eq!(s.pointer_enter(), TimerCommand::Keep);
        assert_eq!(s.enable(), TimerCommand::Keep);
        assert_eq!(s.phase(), AutoplayPhase::PausedByInteraction);
        assert_eq!(s.pointer_leave(), TimerCommand::Arm);
    }

    #[test]
    fn leave_without_enter_does_not_rearm() {
        let mut s = state();
        s.enable();
        assert_eq!(s.pointer_leave(), TimerCommand::Keep);
    }

    #[test]
    fn disable_while_paused_stops() {
        let mut s = state();
        s.enable();
        s.pointer_enter();
        assert_eq!(s.disable(), TimerCommand::Cancel);
        assert_eq!(s.pointer_leave(), TimerCommand::Keep);
        assert_eq!(s.phase(), AutoplayPhase::Stopped);
    }

    #[test]
    fn user_step_rearms_only_while_running() {
        let mut s = state();
        assert_eq!(s.user_step(), TimerCommand::Keep);
        s.enable();
        assert_eq!(s.user_step(), TimerCommand::Arm);
        s.focus_enter();
        assert_eq!(s.user_step(), TimerCommand::Keep);
    }
}
