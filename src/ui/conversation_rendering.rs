//! Conversation panel content.
//!
//! Own messages hug the right edge, partner and system lines the left. Long
//! texts are wrapped to three quarters of the panel width, and only the
//! newest lines that fit are shown so the view always follows the tail.

use ratatui::{
    layout::Alignment,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::domain::{conversation_state::ConversationState, message::Message};

use super::styles;

pub const SEARCHING_TEXT: &str = "Looking for someone to chat with...";
pub const TYPING_TEXT: &str = "Stranger is typing...";

pub fn build_conversation_lines(
    conversation: &ConversationState,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if !conversation.is_connected() {
        lines.push(
            Line::from(Span::styled(SEARCHING_TEXT, styles::searching_style()))
                .alignment(Alignment::Center),
        );
        lines.push(Line::default());
    }

    let bubble_width = (width * 3 / 4).max(1);
    for message in conversation.history() {
        lines.extend(message_lines(message, bubble_width));
    }

    if conversation.typing_indicator() {
        lines.push(Line::from(Span::styled(TYPING_TEXT, styles::typing_style())));
    }

    lines
}

/// Keeps the last `height` lines.
pub fn visible_tail(mut lines: Vec<Line<'static>>, height: usize) -> Vec<Line<'static>> {
    let overflow = lines.len().saturating_sub(height);
    lines.drain(..overflow);
    lines
}

fn message_lines(message: &Message, width: usize) -> Vec<Line<'static>> {
    let (style, alignment) = if message.is_self {
        (styles::own_message_style(), Alignment::Right)
    } else {
        (styles::partner_message_style(), Alignment::Left)
    };

    wrap_text(&message.text, width)
        .into_iter()
        .map(|segment| Line::from(Span::styled(segment, style)).alignment(alignment))
        .collect()
}

/// Splits text into rows no wider than `width` display columns.
///
/// Control characters other than line breaks never reach the terminal: tabs
/// become a space and the rest are dropped, so escape sequences in partner
/// text render as inert characters.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.split('\n') {
        let mut row = String::new();
        let mut row_width = 0;

        for ch in paragraph.chars().filter_map(printable) {
            let ch_width = ch.width().unwrap_or(0);
            if row_width + ch_width > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            row.push(ch);
            row_width += ch_width;
        }

        rows.push(row);
    }

    rows
}

fn printable(ch: char) -> Option<char> {
    match ch {
        '\t' => Some(' '),
        ch if ch.is_control() => None,
        ch => Some(ch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn paired_with(messages: &[Message]) -> ConversationState {
        let mut conversation = ConversationState::default();
        conversation.set_connected(true);
        for message in messages {
            conversation.push(message.clone());
        }
        conversation
    }

    #[test]
    fn shows_searching_banner_when_unpaired() {
        let lines = build_conversation_lines(&ConversationState::default(), 40);

        assert_eq!(line_text(&lines[0]), SEARCHING_TEXT);
    }

    #[test]
    fn keeps_history_below_banner_after_partner_leaves() {
        let mut conversation = paired_with(&[Message::partner("hey")]);
        conversation.set_connected(false);
        conversation.push(Message::partner_disconnected());

        let texts: Vec<String> = build_conversation_lines(&conversation, 80)
            .iter()
            .map(line_text)
            .collect();

        assert_eq!(
            texts,
            [SEARCHING_TEXT, "", "hey", "Your partner has disconnected."]
        );
    }

    #[test]
    fn aligns_by_author() {
        let lines = build_conversation_lines(
            &paired_with(&[Message::own("mine"), Message::partner("theirs")]),
            40,
        );

        assert_eq!(lines[0].alignment, Some(Alignment::Right));
        assert_eq!(lines[1].alignment, Some(Alignment::Left));
    }

    #[test]
    fn appends_typing_line_last() {
        let mut conversation = paired_with(&[Message::partner("hello")]);
        conversation.show_typing_until(std::time::Instant::now());

        let lines = build_conversation_lines(&conversation, 40);

        assert_eq!(lines.last().map(line_text), Some(TYPING_TEXT.to_owned()));
    }

    #[test]
    fn wraps_by_display_width() {
        assert_eq!(wrap_text("abcdefg", 3), ["abc", "def", "g"]);
        assert_eq!(wrap_text("日本語", 4), ["日本", "語"]);
        assert_eq!(wrap_text("a\n\nb", 10), ["a", "", "b"]);
        assert_eq!(wrap_text("", 10), [""]);
    }

    #[test]
    fn strips_terminal_control_characters() {
        assert_eq!(wrap_text("a\u{1b}[2Jb\u{7}c", 40), ["a[2Jbc"]);
        assert_eq!(wrap_text("x\ty\r", 40), ["x y"]);
        assert_eq!(wrap_text("\u{1b}]52;c;aGk=\u{7}", 40), ["]52;c;aGk="]);
    }

    #[test]
    fn tail_keeps_newest_lines() {
        let lines = vec![Line::from("1"), Line::from("2"), Line::from("3")];

        let tail = visible_tail(lines, 2);

        assert_eq!(tail.iter().map(line_text).collect::<Vec<_>>(), ["2", "3"]);
    }

    #[test]
    fn tail_shorter_than_height_is_untouched() {
        let tail = visible_tail(vec![Line::from("only")], 10);

        assert_eq!(tail.len(), 1);
    }
}
