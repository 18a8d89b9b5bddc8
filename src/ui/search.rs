use crate::app::{App, SearchFocus, SearchForm};
use crate::cards::{cards_from_records, IcdSection};
use crate::ui::result_card::{card_lines, error_line, heading, icd_lines, muted};
use crate::ui::{input_box, max_scroll, scrolled};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_search(f: &mut Frame, app: &mut App, area: Rect) {
    let form = &mut app.search;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    let query_focused = form.focus == SearchFocus::Query;
    input_box(
        f,
        chunks[0],
        " Search NAMASTE / ICD-11 ",
        &form.query,
        query_focused,
    );
    draw_tags(f, form, chunks[1]);
    form.indicator.render(f, chunks[2]);

    let lines = result_lines(form, chunks[3].width);
    form.max_scroll = max_scroll(lines.len(), chunks[3].height);
    form.scroll = form.scroll.min(form.max_scroll);
    f.render_widget(scrolled(lines, chunks[3], form.scroll), chunks[3]);
}

fn draw_tags(f: &mut Frame, form: &SearchForm, area: Rect) {
    let focused = form.focus == SearchFocus::Systems;
    let mut spans = Vec::new();
    for (i, tag) in form.tags.iter().enumerate() {
        let mark = if tag.selected { "[x]" } else { "[ ]" };
        let mut style = if tag.selected {
            Style::default().fg(Color::LightGreen)
        } else {
            Style::default().fg(Color::Gray)
        };
        if focused && i == form.tag_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(format!("{} {}", mark, tag.name), style));
        spans.push(Span::raw("  "));
    }
    if form.selected_systems().is_none() {
        spans.push(Span::styled(
            "(all systems)",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let border_color = if focused { Color::Yellow } else { Color::DarkGray };
    let tags = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Systems "),
    );
    f.render_widget(tags, area);
}

pub fn result_lines(form: &SearchForm, width: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(error) = &form.error {
        lines.push(error_line(error));
        return lines;
    }
    if form.loading() {
        return lines;
    }

    let Some(results) = &form.results else {
        lines.push(muted(
            "Type a term or code and press Enter. Down moves to the system filters.",
        ));
        return lines;
    };

    if results.namaste_matches.is_empty() && results.icd11_matches.is_empty() {
        lines.push(muted(format!("No matches found for \"{}\"", results.query)));
        return lines;
    }

    lines.push(heading(format!(
        "NAMASTE matches ({})",
        results.namaste_matches.len()
    )));
    if results.namaste_matches.is_empty() {
        lines.push(muted("No NAMASTE matches found"));
    }
    for card in cards_from_records(&results.namaste_matches, "Match") {
        lines.extend(card_lines(&card, width));
    }

    lines.push(Line::from(""));
    lines.extend(icd_lines(&IcdSection::from(&results.icd11_matches), width));
    lines
}
