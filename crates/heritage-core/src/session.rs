//! One browsing session: store, selection, playback and carousel wired
//! together on a single event loop.
//!
//! All mutation goes through `&mut Session`, so timer firings and user input
//! are applied strictly one after the other.  Selection events are handed to
//! playback before `open`/`close` return, which means a detail view is never
//! gone while its timer is still running.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::carousel::{CarouselScheduler, CarouselState};
use crate::catalog::{Catalog, CatalogItem, CategoryFilter, ItemId, Slide};
use crate::config::Config;
use crate::playback::{PlaybackSimulator, PlaybackState, ProgressSource, SyntheticProgress};
use crate::selection::{SelectionController, SelectionEvent, View};
use crate::store::{CatalogStore, FilterOutcome, FilterState};
use crate::timer::{Scheduler, TimerTag};

/// Read-only view of everything a renderer needs.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub filter: FilterState,
    pub visible: Vec<ItemId>,
    pub outcome: FilterOutcome,
    pub view: View,
    pub playback: Option<PlaybackState>,
    pub carousel: CarouselState,
}

pub struct Session {
    catalog: Arc<Catalog>,
    store: CatalogStore,
    selection: SelectionController,
    playback: PlaybackSimulator,
    carousel: CarouselScheduler,
}

impl Session {
    /// Session with a custom progress source.  The carousel is created but
    /// not started; see `start_carousel`.
    pub fn new(catalog: Arc<Catalog>, source: Box<dyn ProgressSource>) -> Self {
        let carousel = CarouselScheduler::new(catalog.slides().len());
        Self {
            store: CatalogStore::new(Arc::clone(&catalog)),
            selection: SelectionController::new(Arc::clone(&catalog)),
            playback: PlaybackSimulator::new(source),
            carousel,
            catalog,
        }
    }

    /// Session driven entirely by `scheduler`: synthetic playback ticks and a
    /// running carousel, both at the configured cadence.
    pub fn with_synthetic(catalog: Arc<Catalog>, config: &Config, scheduler: Arc<dyn Scheduler>) -> Self {
        let mut source = SyntheticProgress::new(
            Arc::clone(&scheduler),
            config.playback.tick_interval(),
            config.playback.step_percent,
        );
        if let Some(site) = &config.playback.site {
            source = source.with_site_cadence(site.tick_interval(), site.step_percent);
        }
        let mut session = Self::new(catalog, Box::new(source));
        session.carousel.set_auto_advance(config.carousel.auto_advance);
        session.start_carousel(scheduler.as_ref(), config);
        session
    }

    pub fn start_carousel(&mut self, scheduler: &dyn Scheduler, config: &Config) {
        self.carousel.start(scheduler, config.carousel.interval());
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    // ── Catalog ──────────────────────────────────────────────────────────────

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.store.set_category(category);
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.store.set_search_term(term);
    }

    pub fn clear_search(&mut self) {
        self.store.clear_search();
    }

    pub fn filter(&self) -> &FilterState {
        self.store.filter()
    }

    pub fn filtered_items(&self) -> Vec<&CatalogItem> {
        self.store.filtered_items()
    }

    pub fn outcome(&self) -> FilterOutcome {
        self.store.outcome()
    }

    pub fn result_summary(&self) -> Option<String> {
        self.store.result_summary()
    }

    pub fn category_counts(&self) -> Vec<(CategoryFilter, usize)> {
        self.store.category_counts()
    }

    // ── Selection ────────────────────────────────────────────────────────────

    pub fn open(&mut self, id: ItemId) {
        let events = self.selection.open(id);
        self.route(events);
    }

    pub fn close(&mut self) {
        let events = self.selection.close();
        self.route(events);
    }

    fn route(&mut self, events: Vec<SelectionEvent>) {
        for event in events {
            debug!("session: {:?}", event);
            self.playback.on_selection_event(event);
        }
    }

    pub fn current(&self) -> Option<&CatalogItem> {
        self.selection.current()
    }

    pub fn view(&self) -> View {
        self.selection.view()
    }

    // ── Playback ─────────────────────────────────────────────────────────────

    /// Play/pause `id`.  Playing something other than the open item opens it
    /// first, so playback always belongs to the detail view on screen.
    pub fn play(&mut self, id: ItemId) {
        if self.selection.current_id() != Some(id) {
            self.open(id);
        }
        // Unknown ids never become current.
        let Some(item) = self.selection.current().filter(|item| item.id == id) else {
            return;
        };
        self.playback.play(item);
    }

    /// Play/pause the open item, if any.
    pub fn play_current(&mut self) {
        if let Some(id) = self.selection.current_id() {
            self.play(id);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.playback.pause();
    }

    /// State of the open item (Idle/0 unless it holds the live slot).
    pub fn playback_state(&self) -> Option<PlaybackState> {
        self.selection
            .current()
            .map(|item| self.playback.state_for(item))
    }

    pub fn playback_for(&self, id: ItemId) -> Option<PlaybackState> {
        self.catalog.get(id).map(|item| self.playback.state_for(item))
    }

    pub fn live_playback(&self) -> Option<&PlaybackState> {
        self.playback.state()
    }

    pub fn is_ticking(&self) -> bool {
        self.playback.is_ticking()
    }

    /// Position report from a real media backend.
    pub fn report_position(&mut self, id: ItemId, elapsed_secs: f64, duration_secs: f64) -> bool {
        self.playback.on_position(id, elapsed_secs, duration_secs)
    }

    // ── Timers ───────────────────────────────────────────────────────────────

    /// Route a timer firing to its owner.  Returns whether any state changed.
    pub fn handle_timer(&mut self, tag: TimerTag) -> bool {
        match tag {
            TimerTag::Playback { item, generation } => self.playback.on_tick(item, generation),
            TimerTag::Carousel { generation } => self.carousel.on_tick(generation),
        }
    }

    // ── Carousel ─────────────────────────────────────────────────────────────

    pub fn carousel_next(&mut self) {
        self.carousel.next();
    }

    pub fn carousel_previous(&mut self) {
        self.carousel.previous();
    }

    pub fn set_carousel_auto_advance(&mut self, enabled: bool) {
        self.carousel.set_auto_advance(enabled);
    }

    pub fn carousel(&self) -> CarouselState {
        self.carousel.state()
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.catalog.slides().get(self.carousel.state().index)
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            filter: self.store.filter().clone(),
            visible: self.store.filtered_items().iter().map(|item| item.id).collect(),
            outcome: self.store.outcome(),
            view: self.selection.view(),
            playback: self.playback.state().cloned(),
            carousel: self.carousel.state(),
        }
    }

    /// Close the detail view and cancel every timer.
    pub fn teardown(&mut self) {
        self.close();
        self.playback.stop();
        self.carousel.teardown();
        info!("session: torn down");
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("filter", self.store.filter())
            .field("view", &self.selection.view())
            .field("playback", &self.playback)
            .field("carousel", &self.carousel.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackStatus;
    use crate::timer::ManualScheduler;
    use std::time::Duration;

    fn session() -> (Session, ManualScheduler) {
        let sched = ManualScheduler::new();
        let session = Session::with_synthetic(
            Arc::new(Catalog::bundled().unwrap()),
            &Config::default(),
            Arc::new(sched.clone()),
        );
        (session, sched)
    }

    fn run(session: &mut Session, sched: &ManualScheduler, secs: u64) {
        for tag in sched.advance(Duration::from_secs(secs)) {
            session.handle_timer(tag);
        }
    }

    #[test]
    fn play_from_list_opens_item() {
        let (mut s, _sched) = session();
        s.play(ItemId(3));
        assert_eq!(s.view(), View::Detail(ItemId(3)));
        assert_eq!(s.playback_state().unwrap().status, PlaybackStatus::Playing);
    }

    #[test]
    fn play_unknown_id_does_nothing() {
        let (mut s, sched) = session();
        s.play(ItemId(777));
        assert_eq!(s.view(), View::List);
        assert!(s.live_playback().is_none());
        // Only the carousel timer.
        assert_eq!(sched.live_count(), 1);
    }

    #[test]
    fn close_stops_ticking_before_returning() {
        let (mut s, sched) = session();
        s.play(ItemId(1));
        run(&mut s, &sched, 3);
        s.close();
        assert!(!s.is_ticking());
        assert!(s.live_playback().is_none());
        assert_eq!(s.playback_for(ItemId(1)).unwrap().progress_percent, 0.0);
    }

    #[test]
    fn carousel_and_playback_tick_independently() {
        let (mut s, sched) = session();
        s.play(ItemId(2));
        run(&mut s, &sched, 8);
        assert_eq!(s.live_playback().unwrap().progress_percent, 8.0);
        assert_eq!(s.carousel().index, 2);
        assert_eq!(s.current_slide().map(|sl| sl.title.as_str()), Some("Community First"));
    }

    #[test]
    fn teardown_releases_everything() {
        let (mut s, sched) = session();
        s.play(ItemId(2));
        assert_eq!(sched.live_count(), 2);
        s.teardown();
        assert_eq!(sched.live_count(), 0);
        assert_eq!(s.view(), View::List);
        run(&mut s, &sched, 20);
        assert_eq!(s.carousel().index, 0);
    }

    #[test]
    fn snapshot_serializes() {
        let (mut s, _sched) = session();
        s.set_search_term("wall");
        s.open(ItemId(2));
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["visible"], serde_json::json!([2, 101]));
        assert_eq!(json["view"]["view"], "detail");
        assert_eq!(json["view"]["item"], 2);
        assert_eq!(json["outcome"]["count"], 2);
    }
}
