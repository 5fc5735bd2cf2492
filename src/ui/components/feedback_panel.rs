use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::practice::controller::Feedback;
use crate::ui::theme::Theme;

/// Side panel for the practice screen: the glyph to copy, the result of the
/// last check and the coach's hint.
pub struct FeedbackPanel<'a> {
    pub character: &'a str,
    pub position: (usize, usize),
    /// Matched attempts and total attempts in this mode.
    pub matched: (usize, usize),
    pub feedback: Option<&'a Feedback>,
    pub hint: Option<&'a str>,
    pub checking: bool,
    pub hinting: bool,
    pub theme: &'a Theme,
}

impl FeedbackPanel<'_> {
    fn lines(&self) -> Vec<Line<'_>> {
        let colors = &self.theme.colors;
        let (index, len) = self.position;
        let mut lines = vec![
            Line::from(Span::styled(
                format!("{} / {}", index + 1, len),
                Style::default().fg(colors.muted()),
            )),
            Line::from(match self.matched {
                (_, 0) => Span::raw(""),
                (matched, total) => Span::styled(
                    format!("Matched {matched} of {total}"),
                    Style::default().fg(colors.muted()),
                ),
            }),
            Line::from(Span::styled(
                self.character,
                Style::default()
                    .fg(colors.glyph())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        if self.checking {
            lines.push(Line::from(Span::styled(
                "Checking...",
                Style::default().fg(colors.warning()),
            )));
        } else if let Some(feedback) = self.feedback {
            let (verdict, color) = if feedback.result.is_match {
                ("Correct!", colors.success())
            } else {
                ("Try Again", colors.error())
            };
            lines.push(Line::from(Span::styled(
                verdict,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                feedback.result.feedback.as_str(),
                Style::default().fg(colors.fg()),
            )));
            lines.push(Line::from(Span::styled(
                format!("Confidence: {:.1}%", feedback.result.confidence * 100.0),
                Style::default().fg(colors.muted()),
            )));
        }

        if self.hinting {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Thinking...",
                Style::default().fg(colors.warning()),
            )));
        } else if let Some(hint) = self.hint {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Coach",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(hint, Style::default().fg(colors.fg()))));
        }
        lines
    }
}

impl Widget for FeedbackPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Write this ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
