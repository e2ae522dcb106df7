//! StoryDetail component: metadata and playback for the open item.

use heritage_core::{CatalogItem, ItemKind, PlaybackStatus};
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_secondary, C_ACCENT, C_CATEGORY, C_LOCATION, C_MUTED, C_NARRATOR, C_PAUSED,
        C_PLAYING, C_PRIMARY, C_SECONDARY,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        progress_bar::draw_progress,
    },
};

#[derive(Default)]
pub struct StoryDetail;

impl StoryDetail {
    pub fn new() -> Self {
        Self
    }

    fn meta_lines(item: &CatalogItem) -> Vec<Line<'static>> {
        let label = |k: &'static str| Span::styled(format!("{k:<10}"), Style::default().fg(C_MUTED));
        let mut lines = Vec::new();

        let mut head = vec![Span::styled(
            item.category.label().to_string(),
            Style::default().fg(C_CATEGORY).add_modifier(Modifier::BOLD),
        )];
        if !item.narrator.is_empty() {
            head.push(Span::styled("  by ", style_secondary()));
            head.push(Span::styled(item.narrator.clone(), Style::default().fg(C_NARRATOR)));
        }
        if let Some(lang) = &item.details.language {
            head.push(Span::styled(format!("  · {lang}"), style_secondary()));
        }
        if let Some(plays) = &item.details.plays {
            head.push(Span::styled(format!("  · {plays} plays"), style_secondary()));
        }
        lines.push(Line::from(head));
        lines.push(Line::default());

        let rows: [(&'static str, &Option<String>); 6] = [
            ("period", &item.details.period),
            ("location", &item.details.location),
            ("distance", &item.details.distance),
            ("hours", &item.details.visiting_hours),
            ("entry", &item.details.entry_fee),
            ("status", &item.details.significance),
        ];
        for (k, v) in rows {
            if let Some(v) = v {
                let color = if k == "location" { C_LOCATION } else { C_PRIMARY };
                lines.push(Line::from(vec![
                    label(k),
                    Span::styled(v.clone(), Style::default().fg(color)),
                ]));
            }
        }
        if !item.details.features.is_empty() {
            lines.push(Line::from(vec![
                label("features"),
                Span::styled(item.details.features.join(" · "), Style::default().fg(C_PRIMARY)),
            ]));
        }
        if lines.len() > 2 {
            lines.push(Line::default());
        }

        let body = item
            .details
            .full_description
            .as_deref()
            .unwrap_or(&item.description);
        lines.push(Line::from(Span::styled(body.to_string(), Style::default().fg(C_PRIMARY))));
        lines
    }
}

impl Component for StoryDetail {
    fn id(&self) -> ComponentId {
        ComponentId::StoryDetail
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        let Some(item) = state.session.current() else {
            return vec![];
        };
        match key.code {
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Enter => vec![Action::Play(item.id)],
            KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Esc | KeyCode::Left => {
                vec![Action::Close]
            }
            KeyCode::Char('y') => vec![Action::Share(item.id)],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let Some(item) = state.session.current() else {
            return;
        };
        let playback = state.session.playback_state();
        let badge = playback.as_ref().and_then(|p| match p.status {
            PlaybackStatus::Idle => None,
            PlaybackStatus::Playing => Some(Badge::new("PLAYING", C_PLAYING)),
            PlaybackStatus::Paused => Some(Badge::new("PAUSED", C_PAUSED)),
            PlaybackStatus::Completed => Some(Badge::new("DONE", C_ACCENT)),
        });
        let block = pane_chrome(&item.title, focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        frame.render_widget(
            Paragraph::new(Self::meta_lines(item)).wrap(Wrap { trim: true }),
            rows[0],
        );

        if let Some(p) = &playback {
            draw_progress(frame, rows[1], p);
        }
        let hint = match (item.kind, playback.map(|p| p.status)) {
            (_, Some(PlaybackStatus::Playing)) => "Space pause",
            (_, Some(PlaybackStatus::Paused)) => "Space resume",
            (_, Some(PlaybackStatus::Completed)) => "Space replay",
            (ItemKind::Site, _) => "Space play audio guide",
            (ItemKind::Narration, _) => "Space play story",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(C_SECONDARY))),
            rows[2],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heritage_core::{Catalog, Config, ItemId, ManualScheduler, Session};
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn state_with_open(id: u32) -> AppState {
        let mut session = Session::with_synthetic(
            Arc::new(Catalog::bundled().unwrap()),
            &Config::default(),
            Arc::new(ManualScheduler::new()),
        );
        session.open(ItemId(id));
        AppState::new(session)
    }

    #[test]
    fn keys_map_to_playback_and_back() {
        let st = state_with_open(3);
        let mut d = StoryDetail::new();
        let key = |c| KeyEvent::new(c, KeyModifiers::NONE);
        assert_eq!(d.handle_key(key(KeyCode::Char(' ')), &st), vec![Action::Play(ItemId(3))]);
        assert_eq!(d.handle_key(key(KeyCode::Backspace), &st), vec![Action::Close]);
        assert_eq!(d.handle_key(key(KeyCode::Char('y')), &st), vec![Action::Share(ItemId(3))]);
    }

    #[test]
    fn renders_site_metadata() {
        let st = state_with_open(101);
        let mut d = StoryDetail::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| d.draw(f, f.area(), true, &st))
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("Jugol City Walls"));
        assert!(screen.contains("UNESCO World Heritage Site"));
        assert!(screen.contains("0:00"));
        assert!(screen.contains("6:15"));
    }
}
