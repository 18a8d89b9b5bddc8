use crate::app::{App, BackendState, Screen};
use crate::constants::APP_TITLE;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

pub fn draw_header(f: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(30),
            Constraint::Min(20),
            Constraint::Length(44),
        ])
        .split(inner);

    let title = Paragraph::new(Span::styled(
        APP_TITLE,
        Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD),
    ));
    f.render_widget(title, chunks[0]);

    let tabs = Tabs::new(Screen::ALL.iter().map(|s| s.title()))
        .select(app.screen.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[1]);

    f.render_widget(
        Paragraph::new(backend_line(&app.backend)).alignment(ratatui::layout::Alignment::Right),
        chunks[2],
    );
}

pub fn backend_line(state: &BackendState) -> Line<'static> {
    let (dot, text, color) = match state {
        BackendState::Unknown => ("○", "backend not checked".to_string(), Color::DarkGray),
        BackendState::Checking => ("◐", "checking backend...".to_string(), Color::DarkGray),
        BackendState::Online(status) if status.ai_available => {
            ("●", status.summary(), Color::LightGreen)
        }
        BackendState::Online(status) => ("●", status.summary(), Color::Yellow),
        BackendState::Unreachable(_) => ("●", "backend unreachable".to_string(), Color::Red),
    };
    Line::from(vec![
        Span::styled(format!("{} ", dot), Style::default().fg(color)),
        Span::styled(text, Style::default().fg(color)),
    ])
}
