//! Keys bar: bottom line with the input mode and the bindings for the view.

use heritage_core::View;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MODE_NORMAL, C_MODE_SEARCH, C_MUTED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "BROWSE",
            Self::Search => "SEARCH",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Search => C_MODE_SEARCH,
        }
    }
}

pub fn keys_for(mode: InputMode, view: View) -> &'static str {
    match (mode, view) {
        (InputMode::Search, _) => " type to search  ↑↓ move  Enter keep  Esc clear+close",
        (InputMode::Normal, View::List) => {
            " ↑↓/jk move  Enter open  Space play  / search  [ ] category  < > slides  a auto  y share  K keys  q quit"
        }
        (InputMode::Normal, View::Detail(_)) => {
            " Space/p play-pause  Backspace/h back  y share  [ ] category  < > slides  K keys  q quit"
        }
    }
}

pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, view: View) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(keys_for(mode, view), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
