//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::status::ConnectionStatus;

/// App title in the header.
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD)
}

pub fn panel_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Relay connection label, colored by health.
pub fn connection_style(status: ConnectionStatus) -> Style {
    let color = match status {
        ConnectionStatus::Connected => Color::Green,
        ConnectionStatus::Connecting | ConnectionStatus::Reconnecting => Color::Yellow,
        ConnectionStatus::Failed => Color::Red,
    };
    Style::default().fg(color)
}

pub fn media_toggle_style(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(Color::LightBlue)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn own_message_style() -> Style {
    Style::default().fg(Color::LightBlue)
}

pub fn partner_message_style() -> Style {
    Style::default().fg(Color::White)
}

/// "Looking for someone..." banner.
pub fn searching_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

pub fn typing_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

pub fn stats_label_style() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn online_users_style() -> Style {
    Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD)
}

pub fn active_chats_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn input_placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn help_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
