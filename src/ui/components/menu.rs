use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
}

impl MenuItem {
    pub fn new(key: &str, label: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            description: description.to_string(),
        }
    }
}

/// A titled, bordered list of choices with one highlighted row. Used for the
/// language picker and the practice mode picker.
pub struct Menu<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub items: Vec<MenuItem>,
    pub selected: Option<usize>,
    /// Inline message under the list, drawn in the error color.
    pub message: Option<&'a str>,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(title: &'a str, subtitle: &'a str, items: Vec<MenuItem>, theme: &'a Theme) -> Self {
        Self {
            title,
            subtitle,
            items,
            selected: None,
            message: None,
            theme,
        }
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.title,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(self.subtitle, Style::default().fg(colors.fg()))),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let row_height = if self.items.iter().any(|i| !i.description.is_empty()) {
            2
        } else {
            1
        };
        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(row_height))
                    .collect::<Vec<_>>(),
            )
            .split(layout[1]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = self.selected == Some(i);
            let indicator = if is_selected { ">" } else { " " };
            let label_text = if item.key.is_empty() {
                format!(" {indicator} {}", item.label)
            } else {
                format!(" {indicator} [{}] {}", item.key, item.label)
            };

            let mut lines = vec![Line::from(Span::styled(
                label_text,
                Style::default()
                    .fg(if is_selected { colors.accent() } else { colors.fg() })
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
            ))];
            if !item.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("     {}", item.description),
                    Style::default().fg(colors.muted()),
                )));
            }

            if i < menu_layout.len() {
                Paragraph::new(lines).render(menu_layout[i], buf);
            }
        }

        if let Some(message) = self.message {
            Paragraph::new(Line::from(Span::styled(
                message,
                Style::default().fg(colors.error()),
            )))
            .alignment(Alignment::Center)
            .render(layout[2], buf);
        }
    }
}
