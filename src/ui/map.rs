use crate::app::{App, MapForm};
use crate::cards::{Card, IcdSection};
use crate::ui::result_card::{card_lines, error_line, heading, icd_lines, muted};
use crate::ui::{input_box, max_scroll, scrolled};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    Frame,
};

pub fn draw_map(f: &mut Frame, app: &mut App, area: Rect) {
    let form = &mut app.map;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    input_box(f, chunks[0], " NAMASTE code ", &form.code, true);
    form.indicator.render(f, chunks[1]);

    let lines = result_lines(form, chunks[2].width);
    form.max_scroll = max_scroll(lines.len(), chunks[2].height);
    form.scroll = form.scroll.min(form.max_scroll);
    f.render_widget(scrolled(lines, chunks[2], form.scroll), chunks[2]);
}

pub fn result_lines(form: &MapForm, width: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(error) = &form.error {
        lines.push(error_line(error));
        return lines;
    }
    if form.loading() {
        return lines;
    }

    let Some(result) = &form.result else {
        lines.push(muted("Enter a NAMASTE code (e.g. AAE-16) and press Enter."));
        return lines;
    };

    lines.push(heading(format!("NAMASTE {}", result.namaste_code)));
    match &result.namaste_info {
        Some(info) if !info.is_empty() => {
            lines.extend(card_lines(&Card::from_record(info, &result.namaste_code), width));
        }
        _ => lines.push(muted("No NAMASTE record found for this code")),
    }

    lines.push(Line::from(""));
    lines.extend(icd_lines(&IcdSection::from(&result.icd11_matches), width));
    lines
}
