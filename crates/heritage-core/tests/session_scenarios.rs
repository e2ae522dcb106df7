mod common;

use common::Harness;
use heritage_core::{
    Category, CategoryFilter, Config, FilterOutcome, ItemId, PlaybackStatus, TimerTag, View,
};

fn visible(h: &Harness) -> Vec<u32> {
    h.session.filtered_items().iter().map(|i| i.id.0).collect()
}

fn playback_timers(h: &Harness) -> Vec<TimerTag> {
    h.clock
        .active_tags()
        .into_iter()
        .filter(|t| matches!(t, TimerTag::Playback { .. }))
        .collect()
}

#[test]
fn history_plus_wall_yields_single_item() {
    let mut h = Harness::small();
    h.session.set_category("history".parse::<CategoryFilter>().unwrap());
    assert_eq!(visible(&h), vec![10, 11]);
    h.session.set_search_term("wall");
    assert_eq!(visible(&h), vec![10]);
    assert_eq!(h.session.outcome(), FilterOutcome::Results(1));
}

#[test]
fn search_only_spans_categories_in_catalog_order() {
    let mut h = Harness::small();
    h.session.set_search_term("WALL");
    assert_eq!(visible(&h), vec![10, 12]);
    h.session.set_category(CategoryFilter::Only(Category::Religious));
    assert!(h.session.filtered_items().is_empty());
    assert_eq!(h.session.outcome(), FilterOutcome::NoResults);
    assert_eq!(h.session.result_summary().as_deref(), Some("No stories found"));
}

#[test]
fn switching_items_resets_previous_and_does_not_autoplay() {
    let mut h = Harness::small();
    let (a, b) = (ItemId(10), ItemId(11));
    h.session.open(a);
    h.session.play(a);
    h.advance_secs(55);
    assert_eq!(h.session.playback_state().unwrap().progress_percent, 55.0);

    h.session.open(b);
    let state_a = h.session.playback_for(a).unwrap();
    assert_eq!(state_a.status, PlaybackStatus::Idle);
    assert_eq!(state_a.progress_percent, 0.0);
    let state_b = h.session.playback_state().unwrap();
    assert_eq!(state_b.item, b);
    assert_eq!(state_b.status, PlaybackStatus::Idle);
    assert_eq!(state_b.progress_percent, 0.0);
    assert!(playback_timers(&h).is_empty());

    // Nothing moves while b sits idle.
    h.advance_secs(10);
    assert_eq!(h.session.playback_state().unwrap().progress_percent, 0.0);
}

#[test]
fn completion_then_replay_from_zero() {
    let mut h = Harness::small();
    let a = ItemId(12);
    h.session.play(a);
    let mut last = 0.0;
    for _ in 0..100 {
        h.advance_secs(1);
        let p = h.session.playback_state().unwrap().progress_percent;
        assert!(p >= last, "progress went backwards: {last} -> {p}");
        last = p;
    }
    let done = h.session.playback_state().unwrap();
    assert_eq!(done.status, PlaybackStatus::Completed);
    assert_eq!(done.progress_percent, 100.0);
    assert_eq!(done.elapsed_label(), "1:40");

    // Completion is terminal: more time changes nothing.
    h.advance_secs(30);
    assert_eq!(h.session.playback_state().unwrap(), done);

    h.session.play(a);
    let replay = h.session.playback_state().unwrap();
    assert_eq!(replay.status, PlaybackStatus::Playing);
    assert_eq!(replay.progress_percent, 0.0);
    h.advance_secs(1);
    assert_eq!(h.session.playback_state().unwrap().progress_percent, 1.0);
}

#[test]
fn only_last_played_item_is_ticking() {
    let mut h = Harness::small();
    for id in [10, 11, 12] {
        h.session.play(ItemId(id));
    }
    let timers = playback_timers(&h);
    assert_eq!(timers.len(), 1);
    assert!(matches!(timers[0], TimerTag::Playback { item, .. } if item == ItemId(12)));

    for id in [10, 11] {
        assert_eq!(h.session.playback_for(ItemId(id)).unwrap().status, PlaybackStatus::Idle);
    }
    h.advance_secs(3);
    assert_eq!(h.session.live_playback().unwrap().progress_percent, 3.0);
}

#[test]
fn pause_twice_resumes() {
    let mut h = Harness::small();
    h.session.play(ItemId(11));
    h.advance_secs(5);
    h.session.toggle_pause();
    h.advance_secs(5);
    assert_eq!(h.session.playback_state().unwrap().status, PlaybackStatus::Paused);
    assert_eq!(h.session.playback_state().unwrap().progress_percent, 5.0);
    h.session.toggle_pause();
    h.advance_secs(5);
    let state = h.session.playback_state().unwrap();
    assert_eq!(state.status, PlaybackStatus::Playing);
    assert_eq!(state.progress_percent, 10.0);
}

#[test]
fn reopening_same_item_keeps_progress() {
    let mut h = Harness::small();
    h.session.play(ItemId(13));
    h.advance_secs(7);
    h.session.open(ItemId(13));
    assert_eq!(h.session.playback_state().unwrap().progress_percent, 7.0);
    assert_eq!(h.session.playback_state().unwrap().status, PlaybackStatus::Playing);
}

#[test]
fn close_is_idempotent_and_stops_timer() {
    let mut h = Harness::small();
    h.session.play(ItemId(10));
    h.advance_secs(2);
    h.session.close();
    assert_eq!(h.session.view(), View::List);
    assert!(playback_timers(&h).is_empty());
    h.session.close();
    assert_eq!(h.session.view(), View::List);
    assert!(h.session.live_playback().is_none());
}

#[test]
fn unknown_item_from_detail_falls_back_to_list() {
    let mut h = Harness::small();
    h.session.play(ItemId(10));
    h.session.open(ItemId(404));
    assert_eq!(h.session.view(), View::List);
    assert!(h.session.live_playback().is_none());
}

#[test]
fn carousel_previous_wraps() {
    let mut h = Harness::small();
    let mut seen = Vec::new();
    for _ in 0..3 {
        h.session.carousel_previous();
        seen.push(h.session.carousel().index);
    }
    assert_eq!(seen, vec![3, 2, 1]);
}

#[test]
fn manual_and_automatic_carousel_moves_compound() {
    let mut h = Harness::small();
    h.advance_secs(3);
    h.session.carousel_next();
    h.session.carousel_next();
    assert_eq!(h.session.carousel().index, 2);
    // Automatic tick at t=4s is not pushed back by the manual moves.
    h.advance_secs(1);
    assert_eq!(h.session.carousel().index, 3);
    h.advance_secs(4);
    assert_eq!(h.session.carousel().index, 0);
}

#[test]
fn carousel_runs_while_playback_changes() {
    let mut h = Harness::small();
    h.session.play(ItemId(10));
    h.advance_secs(4);
    h.session.open(ItemId(11));
    h.advance_secs(4);
    assert_eq!(h.session.carousel().index, 2);
}

#[test]
fn carousel_auto_advance_can_start_disabled() {
    let mut config = Config::default();
    config.carousel.auto_advance = false;
    let catalog = heritage_core::Catalog::from_toml_str(common::SMALL_CATALOG).unwrap();
    let mut h = Harness::with_config(catalog, &config);
    h.advance_secs(20);
    assert_eq!(h.session.carousel().index, 0);
    assert!(!h.session.carousel().auto_advance_enabled);
    h.session.carousel_next();
    assert_eq!(h.session.carousel().index, 1);
}

#[test]
fn teardown_stops_all_timers() {
    let mut h = Harness::bundled();
    h.session.play(ItemId(1));
    h.session.teardown();
    assert_eq!(h.clock.live_count(), 0);
    h.advance_secs(60);
    assert_eq!(h.session.carousel().index, 0);
    assert!(h.session.live_playback().is_none());
}

#[test]
fn coarse_step_clamps_at_100() {
    let mut config = Config::default();
    config.playback.step_percent = 7.0;
    let catalog = heritage_core::Catalog::from_toml_str(common::SMALL_CATALOG).unwrap();
    let mut h = Harness::with_config(catalog, &config);
    h.session.play(ItemId(13));
    h.advance_secs(14);
    assert_eq!(h.session.live_playback().unwrap().progress_percent, 98.0);
    h.advance_secs(1);
    let state = h.session.live_playback().unwrap();
    assert_eq!(state.progress_percent, 100.0);
    assert_eq!(state.status, PlaybackStatus::Completed);
}

#[test]
fn site_guides_use_configured_cadence() {
    let mut config = Config::default();
    config.playback.site = Some(heritage_core::config::CadenceConfig {
        tick_interval_ms: 100,
        step_percent: 0.5,
    });
    let catalog = heritage_core::Catalog::from_toml_str(common::SMALL_CATALOG).unwrap();
    let mut h = Harness::with_config(catalog, &config);

    h.session.play(ItemId(10));
    h.advance_secs(2);
    assert_eq!(h.session.playback_state().unwrap().progress_percent, 10.0);

    h.session.play(ItemId(11));
    h.advance_secs(2);
    assert_eq!(h.session.playback_state().unwrap().progress_percent, 2.0);
}
