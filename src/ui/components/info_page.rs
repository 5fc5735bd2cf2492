use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub struct InfoSection {
    pub heading: &'static str,
    pub body: &'static [&'static str],
}

pub const ABOUT: &[InfoSection] = &[
    InfoSection {
        heading: "About Chalk",
        body: &[
            "Chalk started as a way for someone who never went to school to learn to \
             read and write late in life, at home and at their own pace.",
        ],
    },
    InfoSection {
        heading: "Who it is for",
        body: &[
            "Adults who missed out on schooling but have a computer at hand.",
            "Children learning their first letters and numbers.",
            "Anyone who learns better with spoken feedback.",
        ],
    },
    InfoSection {
        heading: "How it works",
        body: &[
            "Pick a language, write each character on the canvas with the mouse and \
             have it checked. Results are read aloud in your language, and a coach \
             looks at your attempts to suggest what to work on.",
        ],
    },
];

pub const CONTACT: &[InfoSection] = &[InfoSection {
    heading: "Coming Soon",
    body: &[
        "A way to get in touch is on its way.",
        "Check back soon!",
    ],
}];

/// A static page of headed paragraphs.
pub struct InfoPage<'a> {
    pub title: &'a str,
    pub sections: &'a [InfoSection],
    pub theme: &'a Theme,
}

impl Widget for InfoPage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();
        for section in self.sections {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                section.heading,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )));
            for paragraph in section.body {
                lines.push(Line::from(Span::styled(
                    *paragraph,
                    Style::default().fg(colors.fg()),
                )));
            }
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
