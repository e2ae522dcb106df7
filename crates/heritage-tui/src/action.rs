//! Action enum: all user-initiated intents flowing from components to the App.

use heritage_core::{CategoryFilter, ItemId};

/// Unique identifier for a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    CategoryBar,
    StoryList,
    StoryDetail,
    Slideshow,
}

/// Components produce Actions; the App applies them to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Catalog ──────────────────────────────────────────────────────────────
    SetCategory(CategoryFilter),
    NextCategory,
    PrevCategory,

    // ── Search ───────────────────────────────────────────────────────────────
    OpenFilter,
    CloseFilter,
    FilterChanged(String),
    ClearFilter,

    // ── Selection ────────────────────────────────────────────────────────────
    Open(ItemId),
    Close,

    // ── Playback ─────────────────────────────────────────────────────────────
    Play(ItemId), // play/pause toggle for this item

    // ── Carousel ─────────────────────────────────────────────────────────────
    SlideNext,
    SlidePrev,
    ToggleAutoAdvance,

    // ── UI ───────────────────────────────────────────────────────────────────
    Share(ItemId),
    ToggleKeys,
    Quit,
}
