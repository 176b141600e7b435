//! Sidebar widget for the TUI.
//!
//! Renders the "Settings" connection form: five fields, the Connect button
//! and the status of the last connect attempt.

use crate::app::ConnectStatus;
use crate::tui::app::{Focus, FormField, SidebarForm};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Introductory text under the sidebar title.
const INTRO: &str =
    "This is a simple chat application using MySQL. Connect to the database and start chatting.";

/// Sidebar widget for the connection form.
pub struct Sidebar<'a> {
    form: &'a SidebarForm,
    focus: Focus,
}

impl<'a> Sidebar<'a> {
    /// Creates a new sidebar widget.
    pub fn new(form: &'a SidebarForm, focus: Focus) -> Self {
        Self { form, focus }
    }

    /// Text shown for a field; the password is masked.
    fn display_value(&self, field: FormField) -> String {
        let value = &self.form.field(field).text;
        match field {
            FormField::Password => "*".repeat(value.chars().count()),
            _ => value.clone(),
        }
    }

    fn field_lines(&self, field: FormField) -> Vec<Line<'static>> {
        let focused = self.focus == Focus::Field(field);
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if focused { "> " } else { "  " };

        let mut lines = vec![Line::from(Span::styled(
            format!("{marker}{}", field.label()),
            label_style,
        ))];
        lines.push(Line::from(vec![
            Span::raw("  ["),
            Span::styled(self.display_value(field), Style::default().fg(Color::White)),
            Span::raw("]"),
        ]));
        if focused {
            lines.push(Line::from(Span::styled(
                format!("  {}", field.help()),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines
    }

    fn status_line(status: &ConnectStatus) -> Line<'static> {
        let color = if status.is_connected() {
            Color::Green
        } else {
            Color::Yellow
        };
        Line::from(Span::styled(
            status.text().to_string(),
            Style::default().fg(color),
        ))
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focus.in_sidebar() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Settings ");

        let mut lines = vec![
            Line::from(Span::styled(INTRO, Style::default().fg(Color::Gray))),
            Line::from(""),
        ];

        for field in FormField::ALL {
            lines.extend(self.field_lines(field));
        }

        lines.push(Line::from(""));
        let button_style = if self.focus == Focus::Connect {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        lines.push(Line::from(Span::styled("[ Connect ]", button_style)));

        if let Some(status) = &self.form.status {
            lines.push(Line::from(""));
            lines.push(Self::status_line(status));
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionConfig;

    fn form() -> SidebarForm {
        SidebarForm::from_config(&ConnectionConfig::new(
            "localhost", "3306", "root", "secret", "chinook",
        ))
    }

    #[test]
    fn test_password_is_masked() {
        let form = form();
        let sidebar = Sidebar::new(&form, Focus::Input);
        assert_eq!(sidebar.display_value(FormField::Password), "******");
        assert_eq!(sidebar.display_value(FormField::Host), "localhost");
    }

    #[test]
    fn test_help_shown_for_focused_field() {
        let form = form();
        let sidebar = Sidebar::new(&form, Focus::Field(FormField::Port));
        assert_eq!(sidebar.field_lines(FormField::Port).len(), 3);
        assert_eq!(sidebar.field_lines(FormField::Host).len(), 2);
    }
}
