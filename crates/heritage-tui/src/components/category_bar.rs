//! CategoryBar: one-row tab strip with per-category counts.

use heritage_core::CategoryFilter;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_accent, C_MUTED, C_SECONDARY},
};

#[derive(Default)]
pub struct CategoryBar;

impl CategoryBar {
    pub fn new() -> Self {
        Self
    }

    fn tab_spans(state: &AppState) -> Vec<Span<'static>> {
        let current = state.session.filter().category;
        let mut spans = vec![Span::raw(" ")];
        for (i, (filter, count)) in state.session.category_counts().into_iter().enumerate() {
            let text = format!(" {} {} ", filter.label(), count);
            let style = if filter == current {
                style_accent().add_modifier(Modifier::REVERSED)
            } else if count == 0 {
                Style::default().fg(C_MUTED)
            } else {
                Style::default().fg(C_SECONDARY)
            };
            if i > 0 {
                spans.push(Span::styled("│", Style::default().fg(C_MUTED)));
            }
            spans.push(Span::styled(text, style));
        }
        spans
    }
}

impl Component for CategoryBar {
    fn id(&self) -> ComponentId {
        ComponentId::CategoryBar
    }

    /// `[` / `]` cycle, digits jump (`0` = all).
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        match key.code {
            KeyCode::Char('[') => vec![Action::PrevCategory],
            KeyCode::Char(']') => vec![Action::NextCategory],
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let n = c as usize - '0' as usize;
                CategoryFilter::cycle()
                    .nth(n)
                    .map(|f| vec![Action::SetCategory(f)])
                    .unwrap_or_default()
            }
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        frame.render_widget(Paragraph::new(Line::from(Self::tab_spans(state))), area);
    }
}
