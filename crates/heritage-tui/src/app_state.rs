//! AppState: data passed read-only to all components during render/event.
//!
//! Components read the session through this, but never mutate it.
//! The App event-loop is the only thing that writes to AppState.

use heritage_core::{CatalogItem, PlaybackState, Session};

use crate::widgets::status_bar::InputMode;

pub struct AppState {
    pub session: Session,
    pub input_mode: InputMode,
    pub show_keys_bar: bool,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            input_mode: InputMode::Normal,
            show_keys_bar: true,
        }
    }

    /// The item holding the live playback slot, with its state.
    pub fn now_playing(&self) -> Option<(&CatalogItem, &PlaybackState)> {
        let state = self.session.live_playback()?;
        let item = self.session.catalog().get(state.item)?;
        Some((item, state))
    }
}
