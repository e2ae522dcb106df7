//! Simulated playback.
//!
//! One `PlaybackSimulator` owns the single "live" playback slot.  Progress is
//! fed by a `ProgressSource`: either `SyntheticProgress` (fixed step on a
//! repeating timer) or `BackendProgress` (positions reported by a real media
//! backend).  The state machine is the same for both.
//!
//! Transitions:
//!   Idle -> Playing -> Paused -> Playing ...
//!   Playing -> Completed (progress reached 100, timer released)
//!   any -> Idle (selection closed, or a different item started)

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::catalog::{format_clock, CatalogItem, ItemId, ItemKind, MediaRef};
use crate::selection::SelectionEvent;
use crate::timer::{Scheduler, TimerControl, TimerHandle, TimerTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Playing,
    Paused,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    pub item: ItemId,
    pub status: PlaybackStatus,
    /// 0.0 ..= 100.0
    pub progress_percent: f64,
    /// Nominal length of the item, for the elapsed clock.
    pub duration_secs: u32,
}

impl PlaybackState {
    pub fn idle(item: &CatalogItem) -> Self {
        Self {
            item: item.id,
            status: PlaybackStatus::Idle,
            progress_percent: 0.0,
            duration_secs: item.duration_secs,
        }
    }

    /// `floor(progress / 100 * duration)`
    pub fn elapsed_secs(&self) -> u32 {
        let secs = self.progress_percent / 100.0 * f64::from(self.duration_secs);
        secs.floor() as u32
    }

    pub fn elapsed_label(&self) -> String {
        format_clock(self.elapsed_secs())
    }

    /// Playing or paused: the item holds the live slot and can still advance.
    pub fn is_live(&self) -> bool {
        matches!(self.status, PlaybackStatus::Playing | PlaybackStatus::Paused)
    }
}

/// Input that may move progress forward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressSignal {
    /// A synthetic timer firing.
    Tick,
    /// A position report from a real backend.
    Position { elapsed_secs: f64, duration_secs: f64 },
}

/// Where progress comes from.  Swapping the source leaves selection and
/// rendering untouched.
pub trait ProgressSource: Send {
    /// Begin driving `item`.  The returned handle is owned by the live slot;
    /// suspending it pauses the source and dropping it stops the source.
    fn start(&mut self, item: &CatalogItem, generation: u64) -> TimerHandle;

    /// New progress for `signal` given the current percentage.  The simulator
    /// clamps and keeps the result monotonic.
    fn advance(&self, current: f64, signal: &ProgressSignal) -> f64;
}

// ── Synthetic ─────────────────────────────────────────────────────────────────

/// Adds `step` percent on every timer firing.  Sites can run on their own
/// cadence (audio guides tick faster in finer steps than stories).
pub struct SyntheticProgress {
    scheduler: Arc<dyn Scheduler>,
    period: Duration,
    step: f64,
    site: Option<(Duration, f64)>,
    active_step: f64,
}

impl SyntheticProgress {
    pub fn new(scheduler: Arc<dyn Scheduler>, period: Duration, step: f64) -> Self {
        Self {
            scheduler,
            period,
            step,
            site: None,
            active_step: step,
        }
    }

    pub fn with_site_cadence(mut self, period: Duration, step: f64) -> Self {
        self.site = Some((period, step));
        self
    }

    fn cadence_for(&self, kind: ItemKind) -> (Duration, f64) {
        match (kind, self.site) {
            (ItemKind::Site, Some(cadence)) => cadence,
            _ => (self.period, self.step),
        }
    }
}

impl ProgressSource for SyntheticProgress {
    fn start(&mut self, item: &CatalogItem, generation: u64) -> TimerHandle {
        let tag = TimerTag::Playback {
            item: item.id,
            generation,
        };
        // Only one item is live at a time, so the step follows the last start.
        let (period, step) = self.cadence_for(item.kind);
        self.active_step = step;
        self.scheduler.every(period, tag)
    }

    fn advance(&self, current: f64, signal: &ProgressSignal) -> f64 {
        match signal {
            ProgressSignal::Tick => current + self.active_step,
            ProgressSignal::Position { .. } => current,
        }
    }
}

// ── Backend ───────────────────────────────────────────────────────────────────

/// Fire-and-forget instructions for an external media backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent")]
pub enum MediaIntent {
    Play { item: ItemId, media: MediaRef },
    Pause { item: ItemId },
    Resume { item: ItemId },
    Stop { item: ItemId },
}

/// Drives a real backend through `MediaIntent`s and takes progress from the
/// positions it reports back.
pub struct BackendProgress {
    intents: mpsc::UnboundedSender<MediaIntent>,
}

impl BackendProgress {
    pub fn new(intents: mpsc::UnboundedSender<MediaIntent>) -> Self {
        Self { intents }
    }
}

impl ProgressSource for BackendProgress {
    fn start(&mut self, item: &CatalogItem, generation: u64) -> TimerHandle {
        send_intent(
            &self.intents,
            MediaIntent::Play {
                item: item.id,
                media: item.media.clone(),
            },
        );
        TimerHandle::new(
            TimerTag::Playback {
                item: item.id,
                generation,
            },
            IntentControl {
                intents: self.intents.clone(),
                item: item.id,
            },
        )
    }

    fn advance(&self, current: f64, signal: &ProgressSignal) -> f64 {
        match *signal {
            ProgressSignal::Tick => current,
            ProgressSignal::Position {
                elapsed_secs,
                duration_secs,
            } => {
                if duration_secs > 0.0 && elapsed_secs.is_finite() {
                    elapsed_secs / duration_secs * 100.0
                } else {
                    current
                }
            }
        }
    }
}

struct IntentControl {
    intents: mpsc::UnboundedSender<MediaIntent>,
    item: ItemId,
}

impl TimerControl for IntentControl {
    fn suspend(&self) {
        send_intent(&self.intents, MediaIntent::Pause { item: self.item });
    }

    fn resume(&self) {
        send_intent(&self.intents, MediaIntent::Resume { item: self.item });
    }

    fn cancel(&self) {
        send_intent(&self.intents, MediaIntent::Stop { item: self.item });
    }
}

fn send_intent(tx: &mpsc::UnboundedSender<MediaIntent>, intent: MediaIntent) {
    debug!("playback: intent {:?}", intent);
    if tx.send(intent).is_err() {
        warn!("playback: media backend channel closed");
    }
}

// ── Simulator ─────────────────────────────────────────────────────────────────

struct LiveSlot {
    state: PlaybackState,
    /// `None` once completed.
    timer: Option<TimerHandle>,
    generation: u64,
}

pub struct PlaybackSimulator {
    source: Box<dyn ProgressSource>,
    live: Option<LiveSlot>,
    generation: u64,
}

impl PlaybackSimulator {
    pub fn new(source: Box<dyn ProgressSource>) -> Self {
        Self {
            source,
            live: None,
            generation: 0,
        }
    }

    /// Play/pause button for `item`.
    ///
    /// - other item (or nothing) live: stop it, start `item` from 0
    /// - `item` playing: pause
    /// - `item` paused: resume from the current percentage
    /// - `item` completed: replay from 0
    pub fn play(&mut self, item: &CatalogItem) {
        let same = self.live.as_ref().map(|slot| slot.state.item) == Some(item.id);
        if same {
            match self.live.as_ref().map(|slot| slot.state.status) {
                Some(PlaybackStatus::Playing) | Some(PlaybackStatus::Paused) => {
                    self.pause();
                    return;
                }
                _ => {}
            }
        }
        self.start_fresh(item);
    }

    /// Toggle between playing and paused.  Does nothing in any other state.
    pub fn pause(&mut self) {
        let Some(slot) = self.live.as_mut() else {
            return;
        };
        match slot.state.status {
            PlaybackStatus::Playing => {
                slot.state.status = PlaybackStatus::Paused;
                if let Some(timer) = &slot.timer {
                    timer.suspend();
                }
                info!(
                    "playback: pause {} at {:.1}%",
                    slot.state.item, slot.state.progress_percent
                );
            }
            PlaybackStatus::Paused => {
                slot.state.status = PlaybackStatus::Playing;
                if let Some(timer) = &slot.timer {
                    timer.resume();
                }
                info!(
                    "playback: resume {} at {:.1}%",
                    slot.state.item, slot.state.progress_percent
                );
            }
            PlaybackStatus::Idle | PlaybackStatus::Completed => {}
        }
    }

    fn start_fresh(&mut self, item: &CatalogItem) {
        // Cancel before start: the old handle is dropped here.
        self.stop();
        self.generation += 1;
        let timer = self.source.start(item, self.generation);
        let mut state = PlaybackState::idle(item);
        state.status = PlaybackStatus::Playing;
        info!("playback: start {} (gen {})", item.id, self.generation);
        self.live = Some(LiveSlot {
            state,
            timer: Some(timer),
            generation: self.generation,
        });
    }

    /// A synthetic timer fired.
    pub fn on_tick(&mut self, item: ItemId, generation: u64) -> bool {
        self.apply(item, Some(generation), ProgressSignal::Tick)
    }

    /// A backend reported a position for `item`.
    pub fn on_position(&mut self, item: ItemId, elapsed_secs: f64, duration_secs: f64) -> bool {
        self.apply(
            item,
            None,
            ProgressSignal::Position {
                elapsed_secs,
                duration_secs,
            },
        )
    }

    /// Returns `false` when the signal was stale and got dropped.
    fn apply(&mut self, item: ItemId, generation: Option<u64>, signal: ProgressSignal) -> bool {
        let Some(slot) = self.live.as_mut() else {
            debug!("playback: drop {:?} for {}, nothing live", signal, item);
            return false;
        };
        let stale_generation = generation.is_some_and(|g| g != slot.generation);
        if slot.state.item != item
            || stale_generation
            || slot.state.status != PlaybackStatus::Playing
        {
            debug!(
                "playback: drop stale {:?} for {} (live {} {:?})",
                signal, item, slot.state.item, slot.state.status
            );
            return false;
        }

        let current = slot.state.progress_percent;
        let next = self.source.advance(current, &signal).max(current);
        if next >= 100.0 {
            slot.state.progress_percent = 100.0;
            slot.state.status = PlaybackStatus::Completed;
            slot.timer = None;
            info!("playback: completed {}", item);
        } else {
            slot.state.progress_percent = next;
        }
        true
    }

    /// Route a selection transition.  Leaving an item always resets it.
    pub fn on_selection_event(&mut self, event: SelectionEvent) {
        match event {
            SelectionEvent::Closed(id) => self.reset(id),
            SelectionEvent::Opened(_) => {}
        }
    }

    /// Back to Idle/0 if `item` holds the live slot.
    pub fn reset(&mut self, item: ItemId) {
        if self.live.as_ref().is_some_and(|slot| slot.state.item == item) {
            info!("playback: reset {}", item);
            self.live = None;
        }
    }

    /// Release the live slot, whatever it holds.
    pub fn stop(&mut self) {
        if let Some(slot) = self.live.take() {
            debug!("playback: stop {}", slot.state.item);
        }
    }

    pub fn state(&self) -> Option<&PlaybackState> {
        self.live.as_ref().map(|slot| &slot.state)
    }

    /// State of `item`: the live slot if it belongs to `item`, Idle/0 otherwise.
    pub fn state_for(&self, item: &CatalogItem) -> PlaybackState {
        match self.state() {
            Some(state) if state.item == item.id => state.clone(),
            _ => PlaybackState::idle(item),
        }
    }

    /// True while a timer (or backend) is driving progress.
    pub fn is_ticking(&self) -> bool {
        self.live
            .as_ref()
            .is_some_and(|slot| slot.timer.is_some() && slot.state.status == PlaybackStatus::Playing)
    }
}

impl std::fmt::Debug for PlaybackSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSimulator")
            .field("live", &self.state())
            .field("generation", &self.generation)
            .finish()
    }
}
