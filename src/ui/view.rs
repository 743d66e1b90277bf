use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{session_state::SessionState, shell_state::ShellState, stats::PopulationStats};

use super::{
    conversation_rendering::{build_conversation_lines, visible_tail},
    message_input::render_message_input,
    styles,
};

const APP_TITLE: &str = "randchat";
const HELP_TEXT: &str =
    "Enter: send | Ctrl+N: new chat | Ctrl+V: video | Ctrl+A: audio | Esc/Ctrl+C: quit";

pub fn render(frame: &mut Frame<'_>, shell: &ShellState, session: &SessionState) {
    let [header_area, body_area, input_area, help_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    let [conversation_area, stats_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .areas(body_area);

    frame.render_widget(Paragraph::new(header_line(shell, session)), header_area);
    render_conversation_panel(frame, conversation_area, session);
    render_stats_panel(frame, stats_area, &session.stats);
    render_message_input(
        frame,
        input_area,
        shell.message_input(),
        session.conversation.is_connected(),
    );
    frame.render_widget(
        Paragraph::new(Span::styled(HELP_TEXT, styles::help_style())),
        help_area,
    );
}

fn render_conversation_panel(frame: &mut Frame<'_>, area: Rect, session: &SessionState) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    let lines = visible_tail(
        build_conversation_lines(&session.conversation, inner_width),
        inner_height,
    );

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title("Random Chat")
            .borders(Borders::ALL)
            .border_style(styles::panel_border_style()),
    );
    frame.render_widget(panel, area);
}

fn render_stats_panel(frame: &mut Frame<'_>, area: Rect, stats: &PopulationStats) {
    let panel = Paragraph::new(stats_lines(stats)).block(
        Block::default()
            .title("Live Stats")
            .borders(Borders::ALL)
            .border_style(styles::panel_border_style()),
    );
    frame.render_widget(panel, area);
}

fn stats_lines(stats: &PopulationStats) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled("Online Users ", styles::stats_label_style()),
            Span::styled(stats.online_users.to_string(), styles::online_users_style()),
        ]),
        Line::from(vec![
            Span::styled("Active Chats ", styles::stats_label_style()),
            Span::styled(stats.active_chats.to_string(), styles::active_chats_style()),
        ]),
    ]
}

fn header_line(shell: &ShellState, session: &SessionState) -> Line<'static> {
    let media = shell.media();
    let on_off = |enabled: bool| if enabled { "on" } else { "off" };

    Line::from(vec![
        Span::styled(APP_TITLE, styles::title_style()),
        Span::raw(" | relay: "),
        Span::styled(
            session.connection.as_label(),
            styles::connection_style(session.connection),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("video: {}", on_off(media.video)),
            styles::media_toggle_style(media.video),
        ),
        Span::raw(" "),
        Span::styled(
            format!("audio: {}", on_off(media.audio)),
            styles::media_toggle_style(media.audio),
        ),
    ])
}
