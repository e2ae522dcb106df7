//! Cursor + scroll window over a list whose contents are filtered elsewhere.

pub struct ScrollableList<T> {
    items: Vec<T>,
    selected: usize,
    scroll_offset: usize,
}

impl<T: PartialEq> ScrollableList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            scroll_offset: 0,
        }
    }

    /// Replace the rows, keeping the cursor on the same item when it is
    /// still present, otherwise clamping it into range.
    pub fn set_items(&mut self, items: Vec<T>) {
        if items == self.items {
            return;
        }
        let previous = self.items.get(self.selected);
        let keep = previous.and_then(|p| items.iter().position(|i| i == p));
        self.items = items;
        match keep {
            Some(pos) => self.selected = pos,
            None => {
                self.selected = self.selected.min(self.items.len().saturating_sub(1));
                self.scroll_offset = 0;
            }
        }
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + n).min(self.items.len() - 1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }

    /// Move the cursor onto `item` if present.
    pub fn select(&mut self, item: &T) {
        if let Some(pos) = self.items.iter().position(|i| i == item) {
            self.selected = pos;
        }
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    /// Keep the cursor inside a window of `height` rows.
    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected + 1 - height;
        }
    }

    /// Rows inside the current window.  Call `ensure_visible` first.
    pub fn visible_items(&self, height: usize) -> &[T] {
        let start = self.scroll_offset.min(self.items.len());
        let end = (start + height).min(self.items.len());
        &self.items[start..end]
    }

    pub fn selected_in_view(&self) -> usize {
        self.selected.saturating_sub(self.scroll_offset)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: PartialEq> Default for ScrollableList<T> {
    fn default() -> Self {
        Self::new()
    }
}
