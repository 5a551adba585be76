// ── Carousel controller ──
//
// Owns a `Selection`, an `AutoplayState` and one `TickScheduler`.
// Every mutation publishes a fresh `CarouselSnapshot` on a watch channel
// before the hook returns, so observers always see the state the caller
// just produced.

pub mod autoplay;
pub mod navigation;
pub mod selection;
pub mod ticker;

use std::collections::BTreeSet;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, trace};

use crate::error::CoreError;

pub use autoplay::{AutoplayPhase, AutoplayState, TimerCommand};
pub use navigation::{Origin, Step};
pub use selection::Selection;
pub use ticker::{AutoplayTick, ManualTicker, TickScheduler, TokioTicker};

/// Interval used when none is given.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Point-in-time view of a carousel, as seen by observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselSnapshot {
    pub active: usize,
    pub len: usize,
    pub expanded: BTreeSet<usize>,
    pub phase: AutoplayPhase,
}

// ── Builder ─────────────────────────────────────────────────────────

/// Construction parameters. `len` and `interval` are fixed for the
/// lifetime of the carousel.
#[derive(Debug, Clone)]
pub struct CarouselBuilder {
    label: &'static str,
    len: usize,
    interval: Duration,
    active: usize,
    expanded: Vec<usize>,
    autoplay: bool,
}

impl CarouselBuilder {
    /// Start from `len` items, item 0 active, nothing expanded, autoplay off.
    pub fn new(len: usize) -> Self {
        Self {
            label: "carousel",
            len,
            interval: DEFAULT_INTERVAL,
            active: 0,
            expanded: Vec::new(),
            autoplay: false,
        }
    }

    /// Name used in log fields.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn active(mut self, index: usize) -> Self {
        self.active = index;
        self
    }

    pub fn expanded(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.expanded = indices.into_iter().collect();
        self
    }

    pub fn autoplay(mut self, enabled: bool) -> Self {
        self.autoplay = enabled;
        self
    }

    /// Validate and mount. Arms the scheduler immediately when autoplay is on.
    pub fn build<T: TickScheduler>(self, scheduler: T) -> Result<Carousel<T>, CoreError> {
        let selection = Selection::with_state(self.len, self.active, self.expanded)?;
        let autoplay = AutoplayState::new(self.interval)?;
        let (snapshot_tx, _) = watch::channel(snapshot_of(&selection, &autoplay));

        let mut carousel = Carousel {
            label: self.label,
            selection,
            autoplay,
            scheduler,
            generation: 0,
            snapshot_tx,
        };
        debug!(
            carousel = carousel.label,
            len = self.len,
            interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX),
            autoplay = self.autoplay,
            "carousel mounted"
        );
        if self.autoplay {
            carousel.enable();
        }
        Ok(carousel)
    }
}

// ── Controller ──────────────────────────────────────────────────────

/// Selection + navigation + autoplay for one fixed-size collection.
pub struct Carousel<T: TickScheduler> {
    label: &'static str,
    selection: Selection,
    autoplay: AutoplayState,
    scheduler: T,
    generation: u64,
    snapshot_tx: watch::Sender<CarouselSnapshot>,
}

impl Carousel<ManualTicker> {
    /// Advance the simulated clock and apply every tick that came due.
    /// Returns how many ticks were accepted.
    pub fn advance(&mut self, by: Duration) -> usize {
        let ticks = self.scheduler.advance(by);
        ticks.into_iter().filter(|tick| self.on_tick(*tick)).count()
    }
}

impl<T: TickScheduler> Carousel<T> {
    pub fn builder(len: usize) -> CarouselBuilder {
        CarouselBuilder::new(len)
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn len(&self) -> usize {
        self.selection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.selection.active()
    }

    pub fn expanded(&self) -> &BTreeSet<usize> {
        self.selection.expanded()
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.selection.is_expanded(index)
    }

    pub fn autoplay(&self) -> &AutoplayState {
        &self.autoplay
    }

    pub fn phase(&self) -> AutoplayPhase {
        self.autoplay.phase()
    }

    /// Generation of the currently armed tick (bumped on every arm/cancel).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        snapshot_of(&self.selection, &self.autoplay)
    }

    /// Observe every state change. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<CarouselSnapshot> {
        self.snapshot_tx.subscribe()
    }

    // ── Navigation hooks ────────────────────────────────────────────

    pub fn on_next(&mut self) -> usize {
        self.step_infallible(Step::Next, Origin::User)
    }

    pub fn on_previous(&mut self) -> usize {
        self.step_infallible(Step::Previous, Origin::User)
    }

    pub fn on_jump_to(&mut self, index: usize) -> Result<(), CoreError> {
        self.step(Step::Jump(index), Origin::User).map(|_| ())
    }

    /// Resolve and apply one step. Returns the new active index.
    pub fn step(&mut self, step: Step, origin: Origin) -> Result<usize, CoreError> {
        let len = self.selection.len();
        if len == 1 && matches!(step, Step::Next | Step::Previous) {
            return Ok(self.selection.active());
        }

        let target = step.resolve(self.selection.active(), len)?;
        self.selection.set_active(target)?;
        debug!(carousel = self.label, %origin, active = target, len, "carousel moved");

        if origin == Origin::User {
            let command = self.autoplay.user_step();
            self.apply(command);
        }
        self.publish();
        Ok(target)
    }

    fn step_infallible(&mut self, step: Step, origin: Origin) -> usize {
        // Next/Previous always resolve for len >= 1.
        self.step(step, origin)
            .unwrap_or_else(|_| self.selection.active())
    }

    // ── Expansion hooks ─────────────────────────────────────────────

    pub fn on_toggle_expand(&mut self, index: usize) -> Result<bool, CoreError> {
        let expanded = self.selection.toggle_expanded(index)?;
        debug!(carousel = self.label, index, expanded, "expansion toggled");
        self.publish();
        Ok(expanded)
    }

    pub fn collapse_all(&mut self) {
        if self.selection.expanded().is_empty() {
            return;
        }
        self.selection.collapse_all();
        self.publish();
    }

    // ── Autoplay hooks ──────────────────────────────────────────────

    pub fn on_pointer_enter(&mut self) {
        let command = self.autoplay.pointer_enter();
        self.settle(command);
    }

    pub fn on_pointer_leave(&mut self) {
        let command = self.autoplay.pointer_leave();
        self.settle(command);
    }

    pub fn on_focus_enter(&mut self) {
        let command = self.autoplay.focus_enter();
        self.settle(command);
    }

    pub fn on_focus_leave(&mut self) {
        let command = self.autoplay.focus_leave();
        self.settle(command);
    }

    pub fn on_toggle_autoplay(&mut self) {
        let command = self.autoplay.toggle();
        self.settle(command);
    }

    pub fn enable(&mut self) {
        let command = self.autoplay.enable();
        self.settle(command);
    }

    pub fn disable(&mut self) {
        let command = self.autoplay.disable();
        self.settle(command);
    }

    /// Apply a timer firing. Stale ticks (armed under an older generation,
    /// or arriving while not running) are ignored. Returns whether the
    /// tick was accepted.
    pub fn on_tick(&mut self, tick: AutoplayTick) -> bool {
        if tick.generation != self.generation || !self.autoplay.is_running() {
            trace!(
                carousel = self.label,
                tick = tick.generation,
                live = self.generation,
                phase = %self.autoplay.phase(),
                "tick dropped"
            );
            return false;
        }
        self.step_infallible(Step::Next, Origin::Autoplay);
        true
    }

    // ── Internals ───────────────────────────────────────────────────

    fn settle(&mut self, command: TimerCommand) {
        let before = self.snapshot_tx.borrow().phase;
        self.apply(command);
        if before != self.autoplay.phase() {
            debug!(carousel = self.label, phase = %self.autoplay.phase(), "autoplay phase changed");
            self.publish();
        }
    }

    fn apply(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::Arm => {
                self.generation = self.generation.wrapping_add(1);
                self.scheduler.arm(self.generation, self.autoplay.interval());
            }
            TimerCommand::Cancel => {
                self.generation = self.generation.wrapping_add(1);
                self.scheduler.cancel();
            }
            TimerCommand::Keep => {}
        }
    }

    fn publish(&self) {
        self.snapshot_tx
            .send_replace(snapshot_of(&self.selection, &self.autoplay));
    }
}

impl<T: TickScheduler> std::fmt::Debug for Carousel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Carousel")
            .field("label", &self.label)
            .field("selection", &self.selection)
            .field("autoplay", &self.autoplay)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

fn snapshot_of(selection: &Selection, autoplay: &AutoplayState) -> CarouselSnapshot {
    CarouselSnapshot {
        active: selection.active(),
        len: selection.len(),
        expanded: selection.expanded().clone(),
        phase: autoplay.phase(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const FIVE: Duration = Duration::from_millis(5_000);

    fn manual(len: usize) -> Carousel<ManualTicker> {
        Carousel::<ManualTicker>::builder(len)
            .interval(FIVE)
            .build(ManualTicker::new("test"))
            .unwrap()
    }

    #[test]
    fn zero_items_fails_to_mount() {
        let err = Carousel::<ManualTicker>::builder(0)
            .build(ManualTicker::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::OutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn zero_interval_fails_to_mount() {
        let err = Carousel::<ManualTicker>::builder(3)
            .interval(Duration::ZERO)
            .build(ManualTicker::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInterval));
    }

    #[test]
    fn initial_state_is_honoured() {
        let c = Carousel::<ManualTicker>::builder(4)
            .active(2)
            .expanded([1, 3])
            .build(ManualTicker::default())
            .unwrap();
        assert_eq!(c.active_index(), 2);
        assert_eq!(c.expanded().iter().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(c.phase(), AutoplayPhase::Stopped);
    }

    #[test]
    fn autoplay_at_mount_arms_scheduler() {
        let c = Carousel::<ManualTicker>::builder(3)
            .autoplay(true)
            .build(ManualTicker::default())
            .unwrap();
        assert!(c.scheduler().is_armed());
        assert_eq!(c.phase(), AutoplayPhase::Running);
    }

    #[test]
    fn snapshot_published_before_hook_returns() {
        let mut c = manual(5);
        let rx = c.subscribe();
        c.on_next();
        assert_eq!(rx.borrow().active, 1);
        c.on_toggle_expand(3).unwrap();
        assert!(rx.borrow().expanded.contains(&3));
        c.enable();
        assert_eq!(rx.borrow().phase, AutoplayPhase::Running);
    }

    #[test]
    fn failed_jump_publishes_nothing() {
        let mut c = manual(3);
        let rx = c.subscribe();
        assert!(c.on_jump_to(3).is_err());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(c.active_index(), 0);
    }

    #[test]
    fn stale_tick_is_ignored_after_cancel() {
        let mut c = manual(7);
        c.enable();
        let stale = AutoplayTick {
            source: "test",
            generation: c.generation(),
        };
        c.on_pointer_enter();
        assert!(!c.on_tick(stale));
        c.on_pointer_leave();
        assert!(!c.on_tick(stale));
        assert_eq!(c.active_index(), 0);
    }

    #[test]
    fn user_step_restarts_interval() {
        let mut c = manual(7);
        c.enable();
        assert_eq!(c.advance(Duration::from_secs(4)), 0);
        c.on_next();
        assert_eq!(c.advance(Duration::from_secs(4)), 0);
        assert_eq!(c.advance(Duration::from_secs(1)), 1);
        assert_eq!(c.active_index(), 2);
    }

    #[test]
    fn autoplay_never_touches_expansion() {
        let mut c = manual(3);
        c.on_toggle_expand(1).unwrap();
        c.enable();
        c.advance(FIVE * 4);
        assert_eq!(c.expanded().iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn single_item_steps_are_noops() {
        let mut c = manual(1);
        c.enable();
        assert_eq!(c.on_next(), 0);
        assert_eq!(c.on_previous(), 0);
        assert_eq!(c.advance(FIVE * 3), 3);
        assert_eq!(c.active_index(), 0);
    }

    #[test]
    fn live_tick_dropped_while_paused() {
        let mut c = manual(5);
        c.enable();
        c.on_focus_enter();
        let live = AutoplayTick {
            source: "test",
            generation: c.generation(),
        };
        assert!(!c.on_tick(live));
        assert_eq!(c.active_index(), 0);

        c.on_focus_leave();
        let resumed = AutoplayTick {
            source: "test",
            generation: c.generation(),
        };
        assert!(c.on_tick(resumed));
        assert_eq!(c.active_index(), 1);
    }

    #[test]
    fn advance_counts_accepted_ticks_not_moves() {
        let mut c = manual(1);
        c.enable();
        assert_eq!(c.advance(FIVE * 2), 2);
        assert_eq!(c.active_index(), 0);
        c.disable();
        assert_eq!(c.advance(FIVE * 2), 0);
    }

    #[test]
    fn toggle_autoplay_round_trip() {
        let mut c = manual(4);
        c.on_toggle_autoplay();
        assert_eq!(c.phase(), AutoplayPhase::Running);
        c.on_toggle_autoplay();
        assert_eq!(c.phase(), AutoplayPhase::Stopped);
        assert!(!c.scheduler().is_armed());
        assert_eq!(c.advance(FIVE * 2), 0);
    }
}
