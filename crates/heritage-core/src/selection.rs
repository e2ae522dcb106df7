use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogItem, ItemId};

/// Emitted on every view transition.  Playback consumes `Closed` to reset the
/// item that is leaving the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Opened(ItemId),
    Closed(ItemId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "item", rename_all = "snake_case")]
pub enum View {
    List,
    Detail(ItemId),
}

/// At most one open item.  The open id always resolves in the catalog.
#[derive(Debug, Clone)]
pub struct SelectionController {
    catalog: Arc<Catalog>,
    current: Option<ItemId>,
}

impl SelectionController {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            current: None,
        }
    }

    /// Enter the detail view for `id`.
    ///
    /// - same item already open: nothing happens, no events
    /// - unknown id: the view falls back to the list (closing whatever was
    ///   open)
    /// - otherwise: `Closed(previous)` (if any) then `Opened(id)`
    pub fn open(&mut self, id: ItemId) -> Vec<SelectionEvent> {
        if self.current == Some(id) {
            debug!("selection: {} already open", id);
            return Vec::new();
        }
        if !self.catalog.contains(id) {
            debug!("selection: {} not in catalog", id);
            return self.close();
        }
        let mut events = self.close();
        info!("selection: open {}", id);
        self.current = Some(id);
        events.push(SelectionEvent::Opened(id));
        events
    }

    /// Back to the list.  No-op when nothing is open.
    pub fn close(&mut self) -> Vec<SelectionEvent> {
        match self.current.take() {
            Some(id) => {
                info!("selection: close {}", id);
                vec![SelectionEvent::Closed(id)]
            }
            None => Vec::new(),
        }
    }

    pub fn current(&self) -> Option<&CatalogItem> {
        self.current.and_then(|id| self.catalog.get(id))
    }

    pub fn current_id(&self) -> Option<ItemId> {
        self.current
    }

    pub fn view(&self) -> View {
        match self.current {
            Some(id) => View::Detail(id),
            None => View::List,
        }
    }
}
