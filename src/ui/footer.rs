use crate::app::{App, Screen, SearchFocus};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Draws the footer with dynamic instructions
pub fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &App) {
    let footer = Paragraph::new(instructions(app))
        .style(Style::default().fg(Color::LightCyan))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(footer, area);
}

pub fn instructions(app: &App) -> &'static str {
    if app.quit_confirm {
        return "Press 'y' to confirm quit or 'n' to cancel.";
    }
    match app.screen {
        Screen::Search if app.search.focus == SearchFocus::Systems => {
            "←/→ pick system · Space toggle · Enter search · ↑/↓ back to query · Tab next screen · Ctrl+R status · Esc quit"
        }
        Screen::Search => {
            "Enter search · ↓ system filters · PgUp/PgDn scroll · Tab next screen · Ctrl+R status · Esc quit"
        }
        Screen::Map => "Enter map code · Ctrl+U clear · PgUp/PgDn scroll · Tab next screen · Esc quit",
        Screen::Chat => "Enter send · ↑/↓ PgUp/PgDn scroll · Ctrl+U clear · Tab next screen · Esc quit",
    }
}
