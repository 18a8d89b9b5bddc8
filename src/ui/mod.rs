// src/ui/mod.rs

pub mod chat;
pub mod footer;
pub mod header;
pub mod map;
pub mod quit_confirm;
pub mod result_card;
pub mod search;

use crate::app::{App, Screen};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Renders the whole screen from the current state.
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    header::draw_header(f, chunks[0], app);
    match app.screen {
        Screen::Search => search::draw_search(f, app, chunks[1]),
        Screen::Map => map::draw_map(f, app, chunks[1]),
        Screen::Chat => chat::draw_chat(f, app, chunks[1]),
    }
    footer::draw_footer(f, chunks[2], app);

    if app.quit_confirm {
        quit_confirm::draw_quit_confirm(f, f.area());
    }
}

/// Single-line text field; the cursor follows the text when focused.
pub fn input_box(f: &mut Frame, area: Rect, title: &str, text: &str, focused: bool) {
    let border_color = if focused { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title.to_string());
    let inner = block.inner(area);

    let text_width = u16::try_from(text.width()).unwrap_or(u16::MAX);
    let visible_width = inner.width.saturating_sub(1);
    let scroll_offset = text_width.saturating_sub(visible_width);

    f.render_widget(
        Paragraph::new(text.to_string())
            .style(Style::default().fg(Color::White))
            .scroll((0, scroll_offset))
            .block(block),
        area,
    );

    if focused && inner.width > 0 && inner.height > 0 {
        let cursor_x = inner.x.saturating_add(text_width - scroll_offset);
        f.set_cursor_position((cursor_x, inner.y));
    }
}

/// Largest scroll offset that still keeps the last of `line_count` lines on
/// screen in a view `height` rows tall.
pub fn max_scroll(line_count: usize, height: u16) -> u16 {
    u16::try_from(line_count)
        .unwrap_or(u16::MAX)
        .saturating_sub(height)
}

/// Paragraph over prebuilt lines, with the scroll offset clamped so the last
/// line never leaves the bottom of `area`.
pub fn scrolled(lines: Vec<Line<'static>>, area: Rect, scroll: u16) -> Paragraph<'static> {
    let max = max_scroll(lines.len(), area.height);
    Paragraph::new(lines).scroll((scroll.min(max), 0))
}
