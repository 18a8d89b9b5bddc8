use crate::app::{ApiRequest, App, Screen, SearchFocus};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Applies one key press to the UI state. Returns the backend call the key
/// triggered, if any; performing it is the caller's job.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<ApiRequest> {
    if app.quit_confirm {
        handle_quit_confirm_input(key, app);
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => {
                app.quit_confirm = true;
                None
            }
            KeyCode::Char('r') => app.check_status(),
            KeyCode::Char('u') => {
                clear_input(app);
                None
            }
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => {
            app.quit_confirm = true;
            return None;
        }
        KeyCode::Tab => {
            app.next_screen();
            return None;
        }
        KeyCode::BackTab => {
            app.prev_screen();
            return None;
        }
        KeyCode::PageUp => {
            app.scroll_up();
            return None;
        }
        KeyCode::PageDown => {
            app.scroll_down();
            return None;
        }
        _ => {}
    }

    match app.screen {
        Screen::Search => handle_search_input(key, app),
        Screen::Map => handle_map_input(key, app),
        Screen::Chat => handle_chat_input(key, app),
    }
}

fn handle_search_input(key: KeyEvent, app: &mut App) -> Option<ApiRequest> {
    match (app.search.focus, key.code) {
        (_, KeyCode::Enter) => app.submit_search(),
        (_, KeyCode::Up) | (_, KeyCode::Down) => {
            app.search.toggle_focus();
            None
        }
        (SearchFocus::Query, KeyCode::Char(c)) => {
            app.search.query.push(c);
            None
        }
        (SearchFocus::Query, KeyCode::Backspace) => {
            app.search.query.pop();
            None
        }
        (SearchFocus::Systems, KeyCode::Left) => {
            app.search.tag_left();
            None
        }
        (SearchFocus::Systems, KeyCode::Right) => {
            app.search.tag_right();
            None
        }
        (SearchFocus::Systems, KeyCode::Char(' ')) => {
            app.search.toggle_tag();
            None
        }
        _ => None,
    }
}

fn handle_map_input(key: KeyEvent, app: &mut App) -> Option<ApiRequest> {
    match key.code {
        KeyCode::Enter => app.submit_map(),
        KeyCode::Char(c) => {
            app.map.code.push(c);
            None
        }
        KeyCode::Backspace => {
            app.map.code.pop();
            None
        }
        _ => None,
    }
}

fn handle_chat_input(key: KeyEvent, app: &mut App) -> Option<ApiRequest> {
    match key.code {
        KeyCode::Enter => app.send_chat(),
        KeyCode::Char(c) => {
            app.chat.input.push(c);
            None
        }
        KeyCode::Backspace => {
            app.chat.input.pop();
            None
        }
        KeyCode::Up => {
            app.chat.scroll_back = app.chat.scroll_back.saturating_add(1);
            None
        }
        KeyCode::Down => {
            app.chat.scroll_back = app.chat.scroll_back.saturating_sub(1);
            None
        }
        _ => None,
    }
}

fn clear_input(app: &mut App) {
    match app.screen {
        Screen::Search => app.search.query.clear(),
        Screen::Map => app.map.code.clear(),
        Screen::Chat => app.chat.input.clear(),
    }
}

pub fn handle_quit_confirm_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            app.should_quit = true;
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.quit_confirm = false;
        }
        _ => {}
    }
}
