//! Owned repeating timers.
//!
//! Every timer in the session is reached through a `TimerHandle`.  The handle
//! has exactly one owner; dropping it (or calling `cancel`) stops the timer, so
//! a timer can never outlive the state that owns it.
//!
//! Firings are not callbacks: a timer delivers its `TimerTag` to the session's
//! event loop, which routes it to the owning component.  The component checks
//! the tag against its live state before applying it, so a firing that was
//! already in flight when its timer got cancelled is simply dropped.
//!
//! Two schedulers are provided:
//! - `TokioScheduler`: `tokio::time::interval` tasks feeding an mpsc channel.
//! - `ManualScheduler`: a deterministic fake clock driven by `advance`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::AbortHandle;
use tracing::trace;

use crate::catalog::ItemId;

/// Identifies which component (and which incarnation of its timer) fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerTag {
    Playback { item: ItemId, generation: u64 },
    Carousel { generation: u64 },
}

/// Backend-specific control surface behind a `TimerHandle`.
pub trait TimerControl: Send {
    /// Stop delivering firings but keep the schedule's phase.
    fn suspend(&self);
    /// Deliver firings again after `suspend`.
    fn resume(&self);
    /// Stop for good.  Called at most once, by the owning handle.
    fn cancel(&self);
}

/// Sole owner of one repeating timer.  Cancels on drop.
pub struct TimerHandle {
    tag: TimerTag,
    control: Box<dyn TimerControl>,
    cancelled: bool,
}

impl TimerHandle {
    pub fn new(tag: TimerTag, control: impl TimerControl + 'static) -> Self {
        Self {
            tag,
            control: Box::new(control),
            cancelled: false,
        }
    }

    pub fn tag(&self) -> TimerTag {
        self.tag
    }

    pub fn suspend(&self) {
        self.control.suspend();
    }

    pub fn resume(&self) {
        self.control.resume();
    }

    /// Explicit cancellation.  Equivalent to dropping the handle.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.cancelled {
            self.cancelled = true;
            trace!("timer: cancel {:?}", self.tag);
            self.control.cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("tag", &self.tag)
            .field("cancelled", &self.cancelled)
            .finish()
    }
}

/// Starts repeating timers.  The first firing happens one `period` after the
/// call, never immediately.
pub trait Scheduler: Send + Sync {
    fn every(&self, period: Duration, tag: TimerTag) -> TimerHandle;
}

// ── Tokio ─────────────────────────────────────────────────────────────────────

/// Spawns one interval task per timer; firings arrive on `tx`.
#[derive(Clone)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<TimerTag>,
}

impl TokioScheduler {
    pub fn new(tx: mpsc::UnboundedSender<TimerTag>) -> Self {
        Self { tx }
    }

    /// Convenience constructor returning the receiving end as well.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerTag>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl Scheduler for TokioScheduler {
    fn every(&self, period: Duration, tag: TimerTag) -> TimerHandle {
        let (paused_tx, paused_rx) = watch::channel(false);
        let tx = self.tx.clone();
        // Phase is fixed at the call, not when the task first gets polled.
        let start = tokio::time::Instant::now() + period;
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if *paused_rx.borrow() {
                    continue;
                }
                if tx.send(tag).is_err() {
                    // Event loop is gone.
                    break;
                }
            }
        });
        TimerHandle::new(
            tag,
            TokioTimer {
                paused: paused_tx,
                task: task.abort_handle(),
            },
        )
    }
}

struct TokioTimer {
    paused: watch::Sender<bool>,
    task: AbortHandle,
}

impl TimerControl for TokioTimer {
    fn suspend(&self) {
        self.paused.send_replace(true);
    }

    fn resume(&self) {
        self.paused.send_replace(false);
    }

    fn cancel(&self) {
        self.task.abort();
    }
}

// ── Manual fake clock ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualStatus {
    Active,
    Suspended,
    Cancelled,
}

#[derive(Debug)]
struct ManualTimer {
    id: usize,
    tag: TimerTag,
    period: Duration,
    next_due: Duration,
    status: ManualStatus,
}

#[derive(Debug, Default)]
struct ClockState {
    now: Duration,
    next_id: usize,
    timers: Vec<ManualTimer>,
}

/// Deterministic scheduler for tests and scripted demos.  Time only moves
/// when `advance` is called.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<ClockState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ClockState> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Elapsed fake time.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Move the clock forward by `by` and return every firing that became
    /// due, in time order (ties in creation order).  Suspended timers keep
    /// their phase but produce nothing.
    pub fn advance(&self, by: Duration) -> Vec<TimerTag> {
        let mut clock = self.lock();
        let target = clock.now + by;
        let mut fired = Vec::new();
        loop {
            let due = clock
                .timers
                .iter_mut()
                .filter(|t| t.status != ManualStatus::Cancelled && t.next_due <= target)
                .min_by_key(|t| (t.next_due, t.id));
            let Some(timer) = due else { break };
            let when = timer.next_due;
            timer.next_due += timer.period;
            if timer.status == ManualStatus::Active {
                fired.push(timer.tag);
            }
            clock.now = when;
        }
        clock.now = target;
        clock.timers.retain(|t| t.status != ManualStatus::Cancelled);
        fired
    }

    /// Tags of timers that are neither cancelled nor suspended.
    pub fn active_tags(&self) -> Vec<TimerTag> {
        self.lock()
            .timers
            .iter()
            .filter(|t| t.status == ManualStatus::Active)
            .map(|t| t.tag)
            .collect()
    }

    /// Number of timers that have not been cancelled (active or suspended).
    pub fn live_count(&self) -> usize {
        self.lock()
            .timers
            .iter()
            .filter(|t| t.status != ManualStatus::Cancelled)
            .count()
    }

    pub fn status_of(&self, tag: TimerTag) -> Option<ManualStatus> {
        self.lock()
            .timers
            .iter()
            .rev()
            .find(|t| t.tag == tag)
            .map(|t| t.status)
    }
}

impl Scheduler for ManualScheduler {
    fn every(&self, period: Duration, tag: TimerTag) -> TimerHandle {
        let mut clock = self.lock();
        let id = clock.next_id;
        clock.next_id += 1;
        let next_due = clock.now + period;
        clock.timers.push(ManualTimer {
            id,
            tag,
            period,
            next_due,
            status: ManualStatus::Active,
        });
        TimerHandle::new(
            tag,
            ManualControl {
                clock: Arc::clone(&self.clock),
                id,
            },
        )
    }
}

struct ManualControl {
    clock: Arc<Mutex<ClockState>>,
    id: usize,
}

impl ManualControl {
    fn set(&self, status: ManualStatus) {
        let mut clock = self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(t) = clock.timers.iter_mut().find(|t| t.id == self.id) {
            if t.status != ManualStatus::Cancelled {
                t.status = status;
            }
        }
    }
}

impl TimerControl for ManualControl {
    fn suspend(&self) {
        self.set(ManualStatus::Suspended);
    }

    fn resume(&self) {
        self.set(ManualStatus::Active);
    }

    fn cancel(&self) {
        self.set(ManualStatus::Cancelled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    fn carousel(generation: u64) -> TimerTag {
        TimerTag::Carousel { generation }
    }

    #[test]
    fn manual_timer_fires_once_per_period() {
        let sched = ManualScheduler::new();
        let _h = sched.every(SEC, carousel(1));
        assert!(sched.advance(Duration::from_millis(999)).is_empty());
        assert_eq!(sched.advance(Duration::from_millis(1)), vec![carousel(1)]);
        assert_eq!(sched.advance(3 * SEC).len(), 3);
        assert_eq!(sched.now(), 4 * SEC);
    }

    #[test]
    fn dropping_handle_cancels() {
        let sched = ManualScheduler::new();
        let h = sched.every(SEC, carousel(1));
        assert_eq!(sched.live_count(), 1);
        drop(h);
        assert!(sched.advance(5 * SEC).is_empty());
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn suspend_keeps_phase() {
        let sched = ManualScheduler::new();
        let h = sched.every(SEC, carousel(1));
        sched.advance(Duration::from_millis(400));
        h.suspend();
        assert!(sched.advance(2 * SEC).is_empty());
        assert_eq!(sched.status_of(carousel(1)), Some(ManualStatus::Suspended));
        h.resume();
        // Phase unchanged: next due at 3.0s, now is 2.4s.
        assert!(sched.advance(Duration::from_millis(599)).is_empty());
        assert_eq!(sched.advance(Duration::from_millis(1)), vec![carousel(1)]);
    }

    #[test]
    fn firings_are_time_ordered() {
        let sched = ManualScheduler::new();
        let _a = sched.every(3 * SEC, carousel(1));
        let _b = sched.every(2 * SEC, carousel(2));
        let fired = sched.advance(6 * SEC);
        assert_eq!(
            fired,
            vec![carousel(2), carousel(1), carousel(2), carousel(1), carousel(2)]
        );
    }

    #[tokio::test]
    async fn tokio_timer_delivers_and_cancels() {
        tokio::time::pause();
        let (sched, mut rx) = TokioScheduler::channel();
        let handle = sched.every(Duration::from_millis(100), carousel(9));

        tokio::time::advance(Duration::from_millis(101)).await;
        assert_eq!(rx.recv().await, Some(carousel(9)));

        handle.suspend();
        tokio::time::advance(Duration::from_millis(300)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());

        handle.resume();
        tokio::time::advance(Duration::from_millis(100)).await;
        assert_eq!(rx.recv().await, Some(carousel(9)));

        handle.cancel();
        tokio::time::advance(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }
}
