use crate::cards::{Card, IcdSection};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

const BORDER: Color = Color::DarkGray;

/// Lays a card out as box-drawn lines fitting `width` columns.
pub fn card_lines(card: &Card, width: u16) -> Vec<Line<'static>> {
    let border = Style::default().fg(BORDER);
    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("┌─ ", border),
        Span::styled(
            card.title.clone(),
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    let key_width = card.key_width();
    let value_width = (width as usize).saturating_sub(key_width + 5).max(10);

    for (key, value) in &card.fields {
        for (i, chunk) in wrap(value, value_width).into_iter().enumerate() {
            let label = if i == 0 {
                let pad = key_width.saturating_sub(key.width()) + 1;
                format!("{}{}", key, " ".repeat(pad))
            } else {
                " ".repeat(key_width + 1)
            };
            lines.push(Line::from(vec![
                Span::styled("│ ", border),
                Span::styled(label, Style::default().fg(Color::Gray)),
                Span::styled(chunk.into_owned(), Style::default().fg(Color::White)),
            ]));
        }
    }

    if !card.matched_on.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("│ ", border),
            Span::styled(
                format!("matched on: {}", card.matched_on.join(", ")),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    lines.push(Line::from(Span::styled("└─", border)));
    lines
}

pub fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default()
            .fg(Color::LightMagenta)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

pub fn muted(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    ))
}

pub fn error_line(text: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            "✖ ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(text.to_string(), Style::default().fg(Color::Red)),
    ])
}

pub fn icd_lines(section: &IcdSection, width: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match section {
        IcdSection::Cards(cards) => {
            lines.push(heading(format!("ICD-11 matches ({})", cards.len())));
            for card in cards {
                lines.extend(card_lines(card, width));
            }
        }
        IcdSection::Text(text) => {
            lines.push(heading("ICD-11 matches"));
            for line in text {
                for chunk in wrap(line, (width as usize).max(10)) {
                    lines.push(Line::from(chunk.into_owned()));
                }
            }
        }
        IcdSection::Empty => {
            lines.push(heading("ICD-11 matches"));
            lines.push(muted("No ICD-11 matches found"));
        }
    }
    lines
}
