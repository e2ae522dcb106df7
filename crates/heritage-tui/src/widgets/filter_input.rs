//! FilterInput: the search bar above the story list, backed by tui-input.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};
use unicode_width::UnicodeWidthStr;

use crate::theme::{C_FILTER_BG, C_FILTER_FG, C_MUTED, C_SECONDARY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    Changed(String),
    Confirmed,
    Cancelled,
    None,
}

pub struct FilterInput {
    input: Input,
    active: bool,
    placeholder: String,
}

impl FilterInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            active: false,
            placeholder: placeholder.into(),
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn clear(&mut self) {
        self.input.reset();
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Esc clears the text first; a second Esc on an empty bar closes it.
    /// Enter keeps the term and leaves the bar.
    pub fn handle_key(&mut self, key: KeyEvent) -> FilterAction {
        match key.code {
            KeyCode::Esc if !self.input.value().is_empty() => {
                self.input.reset();
                FilterAction::Changed(String::new())
            }
            KeyCode::Esc => {
                self.deactivate();
                FilterAction::Cancelled
            }
            KeyCode::Enter => {
                self.deactivate();
                FilterAction::Confirmed
            }
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                if self.input.value() == before {
                    FilterAction::None
                } else {
                    FilterAction::Changed(self.input.value().to_string())
                }
            }
        }
    }

    /// Render `/ term` on the left and the result summary on the right.
    pub fn draw(&self, frame: &mut Frame, area: Rect, summary: Option<&str>) {
        if area.width < 4 || area.height == 0 {
            return;
        }
        let summary = summary.unwrap_or_default();
        let summary_w = if summary.is_empty() {
            0
        } else {
            summary.width() as u16 + 2
        };
        let text_w = area.width.saturating_sub(summary_w + 2);

        let scroll = self.input.visual_scroll(text_w as usize);
        let value = self.input.value();
        let body = if value.is_empty() && !self.active {
            Span::styled(format!("/ {}", self.placeholder), Style::default().fg(C_MUTED))
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Span::styled(format!("/ {}", visible), Style::default().fg(C_FILTER_FG))
        };

        frame.render_widget(
            Paragraph::new(Line::from(body)).style(Style::default().bg(C_FILTER_BG)),
            area,
        );
        if summary_w > 0 {
            let right = Rect {
                x: area.x + area.width.saturating_sub(summary_w),
                width: summary_w.min(area.width),
                ..area
            };
            frame.render_widget(
                Paragraph::new(Span::styled(summary, Style::default().fg(C_SECONDARY)))
                    .style(Style::default().bg(C_FILTER_BG)),
                right,
            );
        }

        if self.active {
            let cursor_x = area.x + 2 + (self.input.visual_cursor() - scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_reports_changes() {
        let mut f = FilterInput::new("search");
        f.activate();
        assert_eq!(f.handle_key(key(KeyCode::Char('w'))), FilterAction::Changed("w".into()));
        assert_eq!(f.handle_key(key(KeyCode::Char('a'))), FilterAction::Changed("wa".into()));
        assert_eq!(f.handle_key(key(KeyCode::Backspace)), FilterAction::Changed("w".into()));
        assert_eq!(f.text(), "w");
    }

    #[test]
    fn esc_clears_then_closes() {
        let mut f = FilterInput::new("search");
        f.activate();
        f.handle_key(key(KeyCode::Char('x')));
        assert_eq!(f.handle_key(key(KeyCode::Esc)), FilterAction::Changed(String::new()));
        assert!(f.is_active());
        assert_eq!(f.handle_key(key(KeyCode::Esc)), FilterAction::Cancelled);
        assert!(!f.is_active());
    }

    #[test]
    fn enter_keeps_term() {
        let mut f = FilterInput::new("search");
        f.activate();
        f.handle_key(key(KeyCode::Char('q')));
        assert_eq!(f.handle_key(key(KeyCode::Enter)), FilterAction::Confirmed);
        assert_eq!(f.text(), "q");
        assert!(!f.is_active());
    }
}
