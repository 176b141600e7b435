//! Chat panel widget for the TUI.
//!
//! Displays the conversation, the SQL caption under each answer and the
//! warnings of failed questions.

use crate::tui::app::ChatMessage;
use crate::tui::text::wrap_lines;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Chat panel widget.
pub struct ChatPanel<'a> {
    messages: &'a [ChatMessage],
    scroll: usize,
    focused: bool,
}

impl<'a> ChatPanel<'a> {
    /// Creates a new chat panel widget.
    ///
    /// `scroll` counts lines up from the bottom.
    pub fn new(messages: &'a [ChatMessage], scroll: usize, focused: bool) -> Self {
        Self {
            messages,
            scroll,
            focused,
        }
    }

    /// Lays out all messages as wrapped lines for the given width.
    pub fn build_lines(messages: &[ChatMessage], width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for (i, message) in messages.iter().enumerate() {
            // Captions stick to the answer above them.
            if i > 0 && !matches!(message, ChatMessage::Sql(_)) {
                lines.push(Line::from(""));
            }

            if let Some(label) = message.label() {
                let color = match message {
                    ChatMessage::Human(_) => Color::Green,
                    _ => Color::Magenta,
                };
                lines.push(Line::from(Span::styled(
                    label,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )));
            }

            let style = match message {
                ChatMessage::Human(_) | ChatMessage::Assistant(_) => Style::default(),
                ChatMessage::Sql(_) => Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
                ChatMessage::Warning(_) => Style::default().fg(Color::Yellow),
            };

            lines.extend(
                wrap_lines(message.text(), width)
                    .into_iter()
                    .map(|text| Line::from(Span::styled(text, style))),
            );
        }

        lines
    }
}

impl Widget for ChatPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Chat with MySQL ");

        let inner_width = area.width.saturating_sub(2) as usize;
        let inner_height = area.height.saturating_sub(2) as usize;

        let lines = Self::build_lines(self.messages, inner_width);
        let max_offset = lines.len().saturating_sub(inner_height);
        let offset = max_offset.saturating_sub(self.scroll.min(max_offset));

        Paragraph::new(lines)
            .block(block)
            .scroll((offset.min(u16::MAX as usize) as u16, 0))
            .render(area, buf);
    }
}
