use crate::app::App;
use crate::chat::{ChatMessage, Sender};
use crate::ui::{input_box, max_scroll};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use textwrap::wrap;

pub fn draw_chat(f: &mut Frame, app: &mut App, area: Rect) {
    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
        .split(area);

    let chat_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(horizontal_chunks[0]);

    draw_messages(f, app, chat_chunks[0]);
    app.chat.indicator.render(f, chat_chunks[1]);
    input_box(f, chat_chunks[2], " Ask the assistant ", &app.chat.input, true);
    draw_logs(f, app, horizontal_chunks[1]);
}

fn draw_messages(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Conversation ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    if app.chat.conversation.is_empty() {
        lines.push(Line::from(Span::styled(
            "Ask about a NAMASTE term, an ICD-11 code or a symptom. Answers are educational, not a diagnosis.",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }
    for message in &app.chat.conversation.messages {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(message_lines(message, inner.width));
    }

    let max = max_scroll(lines.len(), inner.height);
    app.chat.scroll_back = app.chat.scroll_back.min(max);
    let scroll = max - app.chat.scroll_back;

    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}

fn base_style(message: &ChatMessage) -> Style {
    match message.sender {
        Sender::User => Style::default().fg(Color::Rgb(255, 223, 128)),
        Sender::Assistant if message.fallback => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::DIM),
        Sender::Assistant => Style::default().fg(Color::Rgb(144, 238, 144)),
        Sender::Error => Style::default().fg(Color::Red),
    }
}

/// Header with sender and time, then the body wrapped to `width`.
pub fn message_lines(message: &ChatMessage, width: u16) -> Vec<Line<'static>> {
    let style = base_style(message);
    let indent = if message.sender == Sender::User { "  " } else { "" };
    let label = match message.sender {
        Sender::User => "You",
        Sender::Assistant if message.fallback => "Assistant (offline)",
        Sender::Assistant => "Assistant",
        Sender::Error => "Error",
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{}┌─", indent), style),
        Span::styled(label.to_string(), style.add_modifier(Modifier::BOLD)),
        Span::styled(" ", style),
        Span::styled(
            message.timestamp.format("%H:%M").to_string(),
            style.add_modifier(Modifier::DIM),
        ),
    ])];

    let wrap_width = (width as usize).saturating_sub(indent.len() + 2).max(10);
    for text_line in message.content.lines() {
        if text_line.trim().is_empty() {
            lines.push(Line::from(Span::styled(format!("{}│", indent), style)));
            continue;
        }
        for chunk in wrap(text_line, wrap_width) {
            lines.push(Line::from(vec![
                Span::styled(format!("{}│ ", indent), style),
                Span::styled(chunk.into_owned(), style),
            ]));
        }
    }
    lines
}

fn draw_logs(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Activity ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = log_lines(app.logs.entries.iter().map(String::as_str), inner.width);
    let scroll = max_scroll(lines.len(), inner.height);
    let logs_para = Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .scroll((scroll, 0));
    f.render_widget(logs_para, inner);
}

/// Bulleted activity entries, wrapped to `width` so each row on screen is one
/// line here and the tail can be pinned to the bottom.
fn log_lines<'a>(entries: impl Iterator<Item = &'a str>, width: u16) -> Vec<Line<'static>> {
    let bullet = Style::default().fg(Color::DarkGray);
    let wrap_width = (width as usize).saturating_sub(2).max(10);
    let mut lines = Vec::new();
    for entry in entries {
        for (i, chunk) in wrap(entry, wrap_width).into_iter().enumerate() {
            let prefix = if i == 0 { "• " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(prefix, bullet),
                Span::raw(chunk.into_owned()),
            ]));
        }
    }
    lines
}
