//! Color palette and style constants for the heritage browser.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(20, 17, 15);
pub const C_ACCENT: Color = Color::Rgb(217, 119, 6); // amber, the landing-page highlight
pub const C_PLAYING: Color = Color::Rgb(132, 190, 110);
pub const C_PAUSED: Color = Color::Rgb(230, 180, 80);
pub const C_MUTED: Color = Color::Rgb(88, 80, 74);
pub const C_SECONDARY: Color = Color::Rgb(150, 138, 126);
pub const C_PRIMARY: Color = Color::Rgb(232, 224, 214);
pub const C_SELECTION_BG: Color = Color::Rgb(44, 36, 30);
pub const C_PANEL_BORDER: Color = Color::Rgb(58, 50, 44);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(217, 119, 6);
pub const C_FILTER_BG: Color = Color::Rgb(30, 26, 22);
pub const C_FILTER_FG: Color = Color::Rgb(250, 204, 120);
pub const C_CATEGORY: Color = Color::Rgb(190, 120, 90);
pub const C_NARRATOR: Color = Color::Rgb(120, 170, 200);
pub const C_LOCATION: Color = Color::Rgb(110, 165, 130);
pub const C_TOAST_INFO: Color = Color::Rgb(120, 170, 200);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(132, 190, 110);
pub const C_TOAST_WARNING: Color = Color::Rgb(230, 180, 80);
pub const C_MODE_NORMAL: Color = Color::Rgb(150, 138, 126);
pub const C_MODE_SEARCH: Color = Color::Rgb(250, 204, 120);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_accent() -> Style {
    Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
}

pub fn style_selected() -> Style {
    Style::default()
        .bg(C_SELECTION_BG)
        .fg(C_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}
