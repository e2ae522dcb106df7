//! Slideshow: the hero carousel above the story list.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_MUTED, C_PLAYING, C_PRIMARY, C_SECONDARY},
    widgets::pane_chrome::{pane_chrome, Badge},
};

#[derive(Default)]
pub struct Slideshow;

impl Slideshow {
    pub fn new() -> Self {
        Self
    }
}

/// `●○○○` with the current slide filled.
fn dots(index: usize, len: usize) -> String {
    (0..len)
        .map(|i| if i == index { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Component for Slideshow {
    fn id(&self) -> ComponentId {
        ComponentId::Slideshow
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        match key.code {
            KeyCode::Char('<') | KeyCode::Char(',') => vec![Action::SlidePrev],
            KeyCode::Char('>') | KeyCode::Char('.') => vec![Action::SlideNext],
            KeyCode::Char('a') => vec![Action::ToggleAutoAdvance],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let carousel = state.session.carousel();
        let badge = if carousel.len < 2 {
            None
        } else if carousel.auto_advance_enabled {
            Some(Badge::new("AUTO", C_PLAYING))
        } else {
            Some(Badge::new("MANUAL", C_MUTED))
        };
        let block = pane_chrome("discover", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(slide) = state.session.current_slide() else {
            frame.render_widget(
                Paragraph::new(Span::styled("  No slides.", Style::default().fg(C_MUTED))),
                inner,
            );
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", slide.title),
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            )),
            rows[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                slide.description.clone(),
                Style::default().fg(C_PRIMARY),
            ))
            .wrap(Wrap { trim: true }),
            rows[1].inner(Margin::new(1, 0)),
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("< ", Style::default().fg(C_MUTED)),
                Span::styled(dots(carousel.index, carousel.len), Style::default().fg(C_SECONDARY)),
                Span::styled(" >", Style::default().fg(C_MUTED)),
            ]))
            .alignment(Alignment::Center),
            rows[2],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heritage_core::{Catalog, Config, ManualScheduler, Session};
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(Session::with_synthetic(
            Arc::new(Catalog::bundled().unwrap()),
            &Config::default(),
            Arc::new(ManualScheduler::new()),
        ))
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn dot_strip_marks_current() {
        assert_eq!(dots(0, 4), "● ○ ○ ○");
        assert_eq!(dots(2, 3), "○ ○ ●");
        assert_eq!(dots(0, 0), "");
    }

    #[test]
    fn keys_map_to_carousel_actions() {
        let st = state();
        let mut s = Slideshow::new();
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert_eq!(s.handle_key(key('>'), &st), vec![Action::SlideNext]);
        assert_eq!(s.handle_key(key('<'), &st), vec![Action::SlidePrev]);
        assert_eq!(s.handle_key(key('a'), &st), vec![Action::ToggleAutoAdvance]);
        assert!(s.handle_key(key('x'), &st).is_empty());
    }

    #[test]
    fn renders_current_slide() {
        let mut st = state();
        st.session.carousel_next();
        let mut s = Slideshow::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();
        terminal.draw(|f| s.draw(f, f.area(), false, &st)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("Cultural Traditions"));
        assert!(text.contains("AUTO"));
        assert!(text.contains("○ ● ○ ○"));
    }
}
