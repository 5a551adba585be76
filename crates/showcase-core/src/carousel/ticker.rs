// ── Tick scheduling ──
//
// A carousel owns exactly one scheduler. `TokioTicker` runs a cancellable
// interval task that posts ticks back into the owner's event loop;
// `ManualTicker` is a simulated clock driven by explicit `advance` calls.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// A timer firing, tagged with the scheduler that produced it and the
/// generation it was armed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayTick {
    pub source: &'static str,
    pub generation: u64,
}

/// Arms and cancels the recurring autoplay tick for one carousel.
pub trait TickScheduler {
    /// Replace any pending tick with one that first fires after `interval`
    /// and then every `interval`, carrying `generation`.
    fn arm(&mut self, generation: u64, interval: Duration);

    /// Drop any pending tick.
    fn cancel(&mut self);
}

// ── Tokio-backed scheduler ──────────────────────────────────────────

/// Spawns one tokio task per armed period and delivers ticks as `M`.
///
/// Must be armed from within a tokio runtime. The task stops on
/// [`cancel`](TickScheduler::cancel), on re-arm, on drop, or once the
/// receiving side of the channel is gone.
pub struct TokioTicker<M> {
    source: &'static str,
    tx: mpsc::UnboundedSender<M>,
    wrap: fn(AutoplayTick) -> M,
    running: Option<CancellationToken>,
}

impl<M: Send + 'static> TokioTicker<M> {
    pub fn new(source: &'static str, tx: mpsc::UnboundedSender<M>, wrap: fn(AutoplayTick) -> M) -> Self {
        Self {
            source,
            tx,
            wrap,
            running: None,
        }
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Whether a tick task is currently live.
    pub fn is_armed(&self) -> bool {
        self.running.as_ref().is_some_and(|t| !t.is_cancelled())
    }
}

impl<M: Send + 'static> TickScheduler for TokioTicker<M> {
    fn arm(&mut self, generation: u64, interval: Duration) {
        self.cancel();
        if interval.is_zero() {
            return;
        }

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = self.tx.clone();
        let wrap = self.wrap;
        let source = self.source;

        tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    _ = ticks.tick() => {
                        trace!(source, generation, "autoplay tick");
                        if tx.send(wrap(AutoplayTick { source, generation })).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        self.running = Some(token);
    }

    fn cancel(&mut self) {
        if let Some(token) = self.running.take() {
            token.cancel();
        }
    }
}

impl<M> Drop for TokioTicker<M> {
    fn drop(&mut self) {
        if let Some(token) = self.running.take() {
            token.cancel();
        }
    }
}

// ── Simulated clock ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Armed {
    generation: u64,
    interval: Duration,
    due: Duration,
}

/// Deterministic scheduler: time only moves through [`ManualTicker::advance`].
#[derive(Debug, Clone)]
pub struct ManualTicker {
    source: &'static str,
    now: Duration,
    armed: Option<Armed>,
}

impl ManualTicker {
    pub fn new(source: &'static str) -> Self {
        Self {
            source,
            now: Duration::ZERO,
            armed: None,
        }
    }

    /// Simulated time elapsed since construction.
    pub fn elapsed(&self) -> Duration {
        self.now
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Move the clock forward and return every tick that came due, in order.
    pub fn advance(&mut self, by: Duration) -> Vec<AutoplayTick> {
        let target = self.now + by;
        let mut fired = Vec::new();
        if let Some(armed) = self.armed.as_mut() {
            while armed.due <= target {
                fired.push(AutoplayTick {
                    source: self.source,
                    generation: armed.generation,
                });
                armed.due += armed.interval;
            }
        }
        self.now = target;
        fired
    }
}

impl Default for ManualTicker {
    fn default() -> Self {
        Self::new("manual")
    }
}

impl TickScheduler for ManualTicker {
    fn arm(&mut self, generation: u64, interval: Duration) {
        self.armed = Some(Armed {
            generation,
            interval,
            due: self.now + interval,
        });
    }

    fn cancel(&mut self) {
        self.armed = None;
    }
}
