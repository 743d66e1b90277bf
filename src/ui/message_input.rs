//! Message input field rendering.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::domain::message_input_state::MessageInputState;

use super::styles;

const PLACEHOLDER_TEXT: &str = "Type a message...";
const DISABLED_TEXT: &str = "Waiting for a partner...";
const PROMPT_SYMBOL: &str = "> ";

/// Renders the input box. It only accepts text while a partner is paired.
pub fn render_message_input(
    frame: &mut Frame<'_>,
    area: Rect,
    input_state: &MessageInputState,
    enabled: bool,
) {
    let paragraph = Paragraph::new(build_input_line(input_state, enabled)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::panel_border_style()),
    );
    frame.render_widget(paragraph, area);

    if enabled {
        frame.set_cursor_position((cursor_x(area, input_state), area.y.saturating_add(1)));
    }
}

/// Column of the text cursor, kept on the last inner column when the text is
/// wider than the box.
fn cursor_x(area: Rect, input_state: &MessageInputState) -> u16 {
    let before_cursor: String = input_state
        .text()
        .chars()
        .take(input_state.cursor_position())
        .collect();
    let offset = PROMPT_SYMBOL.width() + before_cursor.width();

    let first_column = area.x.saturating_add(1);
    let last_column = area
        .x
        .saturating_add(area.width.saturating_sub(2))
        .max(first_column);

    first_column
        .saturating_add(u16::try_from(offset).unwrap_or(u16::MAX))
        .min(last_column)
}

fn build_input_line(input_state: &MessageInputState, enabled: bool) -> Line<'static> {
    let prompt = Span::styled(PROMPT_SYMBOL.to_owned(), styles::input_prompt_style());

    let body = if !enabled {
        Span::styled(DISABLED_TEXT.to_owned(), styles::input_placeholder_style())
    } else if input_state.is_empty() {
        Span::styled(PLACEHOLDER_TEXT.to_owned(), styles::input_placeholder_style())
    } else {
        Span::styled(input_state.text().to_owned(), styles::input_text_style())
    };

    Line::from(vec![prompt, body])
}
