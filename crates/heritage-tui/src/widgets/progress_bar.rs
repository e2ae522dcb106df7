//! Smooth Unicode progress bar and the one-line now-playing strip.

use heritage_core::{CatalogItem, PlaybackState, PlaybackStatus};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{C_ACCENT, C_MUTED, C_NARRATOR, C_PAUSED, C_PLAYING, C_PRIMARY, C_SECONDARY};

const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Fill `width` cells for `percent` (0..=100) with eighth-block resolution.
pub fn bar_string(percent: f64, width: usize) -> String {
    let eighths = (percent.clamp(0.0, 100.0) / 100.0 * width as f64 * 8.0) as usize;
    let full = eighths / 8;
    let partial = eighths % 8;

    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat('█').take(full));
    if full < width {
        bar.push(BLOCKS[partial]);
        bar.extend(std::iter::repeat(' ').take(width - full - 1));
    }
    bar
}

pub fn status_glyph(status: PlaybackStatus) -> &'static str {
    match status {
        PlaybackStatus::Idle => "■",
        PlaybackStatus::Playing => "▶",
        PlaybackStatus::Paused => "❚❚",
        PlaybackStatus::Completed => "✓",
    }
}

fn status_color(status: PlaybackStatus) -> ratatui::style::Color {
    match status {
        PlaybackStatus::Playing => C_PLAYING,
        PlaybackStatus::Paused => C_PAUSED,
        PlaybackStatus::Completed => C_ACCENT,
        PlaybackStatus::Idle => C_MUTED,
    }
}

/// `elapsed [bar] total`
pub fn draw_progress(frame: &mut Frame, area: Rect, state: &PlaybackState) {
    if area.width < 4 || area.height == 0 {
        return;
    }
    let left = format!("{} ", state.elapsed_label());
    let right = format!(" {}", heritage_core::catalog::format_clock(state.duration_secs));
    let label_w = (left.width() + right.width()) as u16;
    let bar_w = area.width.saturating_sub(label_w).max(4) as usize;

    let line = Line::from(vec![
        Span::styled(left, Style::default().fg(C_SECONDARY)),
        Span::styled(
            bar_string(state.progress_percent, bar_w),
            Style::default().fg(status_color(state.status)),
        ),
        Span::styled(right, Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// ` ▶ Title · Narrator · Language   1:23 / 4:32`
pub fn draw_now_playing(frame: &mut Frame, area: Rect, item: &CatalogItem, state: &PlaybackState) {
    if area.height == 0 {
        return;
    }
    let color = status_color(state.status);
    let mut spans = vec![
        Span::styled(
            format!(" {} ", status_glyph(state.status)),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(item.title.as_str(), Style::default().fg(C_PRIMARY)),
    ];
    if !item.narrator.is_empty() {
        spans.push(Span::styled(" · ", Style::default().fg(C_MUTED)));
        spans.push(Span::styled(item.narrator.as_str(), Style::default().fg(C_NARRATOR)));
    }
    if let Some(lang) = item.details.language.as_deref() {
        spans.push(Span::styled(" · ", Style::default().fg(C_MUTED)));
        spans.push(Span::styled(lang, Style::default().fg(C_SECONDARY)));
    }
    spans.push(Span::styled(
        format!("   {} / {}", state.elapsed_label(), item.duration_label()),
        Style::default().fg(C_SECONDARY),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
