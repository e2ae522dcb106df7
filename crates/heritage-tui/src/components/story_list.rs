//! StoryList component: filtered catalog with the search bar on top.

use heritage_core::{CatalogItem, FilterOutcome, ItemId, ItemKind, PlaybackStatus};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_selected, C_CATEGORY, C_MUTED, C_NARRATOR, C_PLAYING, C_PRIMARY, C_SECONDARY},
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{pane_chrome, Badge},
        progress_bar::status_glyph,
        scrollable_list::ScrollableList,
    },
};

pub struct StoryList {
    list: ScrollableList<ItemId>,
    filter_input: FilterInput,
    list_state: ListState,
}

impl StoryList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            filter_input: FilterInput::new("title, description, narrator…"),
            list_state: ListState::default(),
        }
    }

    /// Pull the current filtered view from the session.
    pub fn sync(&mut self, state: &AppState) {
        // A search cleared elsewhere empties the bar too.
        if state.session.filter().search_term.is_empty() && !self.filter_input.text().is_empty() {
            self.filter_input.clear();
        }
        let ids = state
            .session
            .filtered_items()
            .iter()
            .map(|item| item.id)
            .collect();
        self.list.set_items(ids);
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.list.selected_item().copied()
    }

    fn render_row(item: &CatalogItem, selected: bool, state: &AppState, width: u16) -> ListItem<'static> {
        let live = state
            .session
            .live_playback()
            .filter(|p| p.item == item.id && p.status != PlaybackStatus::Idle);
        let marker = match live {
            Some(p) => Span::styled(format!("{} ", status_glyph(p.status)), Style::default().fg(C_PLAYING)),
            None => Span::raw("  "),
        };
        let kind = match item.kind {
            ItemKind::Narration => "♪",
            ItemKind::Site => "⌂",
        };
        let tail = format!("  {}  {}", item.category.label(), item.duration_label());
        let room = (width as usize).saturating_sub(tail.width() + 6);
        let title = truncate(&item.title, room);

        let title_style = if selected {
            style_selected()
        } else {
            Style::default().fg(C_PRIMARY)
        };
        let mut spans = vec![
            marker,
            Span::styled(format!("{kind} "), Style::default().fg(C_SECONDARY)),
            Span::styled(title, title_style),
        ];
        if !item.narrator.is_empty() && room > item.title.width() + item.narrator.width() + 3 {
            spans.push(Span::styled(
                format!(" · {}", item.narrator),
                Style::default().fg(C_NARRATOR),
            ));
        }
        spans.push(Span::styled(tail, Style::default().fg(C_CATEGORY)));
        ListItem::new(Line::from(spans))
    }
}

impl Default for StoryList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for StoryList {
    fn id(&self) -> ComponentId {
        ComponentId::StoryList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        self.sync(state);

        if self.filter_input.is_active() {
            match key.code {
                KeyCode::Up => {
                    self.list.select_up(1);
                    return vec![];
                }
                KeyCode::Down => {
                    self.list.select_down(1);
                    return vec![];
                }
                _ => {}
            }
            return match self.filter_input.handle_key(key) {
                FilterAction::Changed(q) => vec![Action::FilterChanged(q)],
                FilterAction::Confirmed => vec![Action::CloseFilter],
                FilterAction::Cancelled => vec![Action::ClearFilter],
                FilterAction::None => vec![],
            };
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) { 5 } else { 1 };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter | KeyCode::Char('l') => {
                if let Some(id) = self.selected() {
                    return vec![Action::Open(id)];
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                if let Some(id) = self.selected() {
                    return vec![Action::Play(id)];
                }
            }
            KeyCode::Char('y') => {
                if let Some(id) = self.selected() {
                    return vec![Action::Share(id)];
                }
            }
            KeyCode::Char('/') => {
                self.filter_input.activate();
                return vec![Action::OpenFilter];
            }
            KeyCode::Esc if state.session.filter().has_search() => {
                return vec![Action::ClearFilter];
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        match action {
            Action::ClearFilter => {
                self.filter_input.clear();
                self.filter_input.deactivate();
            }
            Action::Open(id) | Action::Play(id) => {
                self.sync(state);
                self.list.select(id);
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.sync(state);

        let badge = match state.session.outcome() {
            FilterOutcome::Results(n) => Badge::new(format!("{n}/{}", state.session.catalog().len()), C_SECONDARY),
            FilterOutcome::NoResults => Badge::new("0", C_MUTED),
        };
        let block = pane_chrome("stories", focused, Some(badge));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let summary = state.session.result_summary();
        self.filter_input.draw(frame, rows[0], summary.as_deref());

        if self.list.is_empty() {
            let msg = if state.session.filter().has_search() {
                "  No stories found. Try another search or category."
            } else {
                "  Nothing in this category yet."
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(C_MUTED))),
                rows[1],
            );
            return;
        }

        let height = rows[1].height as usize;
        self.list.ensure_visible(height);
        let sel_in_view = self.list.selected_in_view();
        let catalog = state.session.catalog();
        let items: Vec<ListItem> = self
            .list
            .visible_items(height)
            .iter()
            .enumerate()
            .filter_map(|(row, id)| {
                catalog
                    .get(*id)
                    .map(|item| Self::render_row(item, row == sel_in_view, state, rows[1].width))
            })
            .collect();

        self.list_state.select(Some(sel_in_view));
        frame.render_stateful_widget(
            List::new(items).highlight_style(Style::default()),
            rows[1],
            &mut self.list_state,
        );
    }
}

/// Cut `text` to `max` display columns, adding an ellipsis when shortened.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
