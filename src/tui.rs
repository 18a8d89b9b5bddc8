use crate::api::ApiClient;
use crate::app::{ApiRequest, App, AppEvent};
use crate::config::Config;
use crate::errors::MedmapResult;
use crate::key_handlers::handle_key;
use crate::ui;
use crossterm::{
    event::{Event as CEvent, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use log::{debug, error, info};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    io::{self, Stdout},
    time::Duration,
};
use tokio::sync::mpsc;

/// Runs the terminal UI until the user quits. The terminal is restored even
/// when the loop fails.
pub async fn run_ui(config: &Config) -> MedmapResult<()> {
    let client = ApiClient::from_config(config)?;
    let app = App::new(config);
    let tick_rate = Duration::from_millis(config.tick_rate_ms);

    let mut terminal = setup_terminal()?;
    let res = run_app(&mut terminal, app, client, tick_rate).await;
    restore_terminal(&mut terminal)?;

    if let Err(e) = &res {
        error!("UI loop ended with error: {}", e);
    }
    res
}

fn setup_terminal() -> MedmapResult<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> MedmapResult<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Main loop of the application.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    client: ApiClient,
    tick_rate: Duration,
) -> MedmapResult<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(32);
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(tick_rate);

    info!("Talking to backend at {}", client.base_url());
    if let Some(request) = app.check_status() {
        dispatch(&client, request, tx.clone());
    }

    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(CEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(request) = handle_key(&mut app, key) {
                        dispatch(&client, request, tx.clone());
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(event) = rx.recv() => app.apply(event),
            _ = ticker.tick() => app.tick(),
        }

        if app.should_quit {
            break;
        }
    }

    info!("Quitting");
    Ok(())
}

/// Performs the request on its own task; the outcome comes back over `tx`.
fn dispatch(client: &ApiClient, request: ApiRequest, tx: mpsc::Sender<AppEvent>) {
    let client = client.clone();
    tokio::spawn(async move {
        let event = execute_request(&client, request).await;
        if tx.send(event).await.is_err() {
            debug!("UI closed before a response could be delivered");
        }
    });
}

pub async fn execute_request(client: &ApiClient, request: ApiRequest) -> AppEvent {
    match request {
        ApiRequest::Search(req) => {
            AppEvent::Search(client.search(&req).await.map_err(|e| e.to_string()))
        }
        ApiRequest::Map(req) => {
            AppEvent::Map(client.map_code(&req).await.map_err(|e| e.to_string()))
        }
        ApiRequest::Chat(req) => {
            AppEvent::Chat(client.chat(&req).await.map_err(|e| e.to_string()))
        }
        ApiRequest::Status => AppEvent::Status(client.status().await.map_err(|e| e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{BackendState, Screen};
    use crate::chat::Sender;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn app_for(server: &MockServer) -> (App, ApiClient) {
        let config = Config {
            api_base_url: server.uri(),
            ..Config::default()
        };
        (App::new(&config), ApiClient::from_config(&config).unwrap())
    }

    fn press(app: &mut App, code: KeyCode) -> Option<ApiRequest> {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn test_typing_query_and_search_renders_items() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_json(json!({"query": "kasa"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": "kasa",
                "systems": null,
                "namaste_matches": [
                    {"NAMC_CODE": "AAC-1", "NAMC_TERM": "kAsaH"},
                    {"NAMC_CODE": "AAC-2", "NAMC_TERM": "vAtajakAsaH"}
                ],
                "icd11_matches": [{"title": "Cough", "theCode": "MD12"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (mut app, client) = app_for(&mock_server);
        type_text(&mut app, "kasa");
        let request = press(&mut app, KeyCode::Enter).expect("search request");
        assert!(press(&mut app, KeyCode::Enter).is_none());

        let event = execute_request(&client, request).await;
        app.apply(event);

        let results = app.search.results.as_ref().expect("results");
        assert_eq!(results.namaste_matches.len(), 2);
        assert!(app.search.error.is_none());
        assert!(!app.search.loading());
    }

    #[tokio::test]
    async fn test_map_failure_shows_error_string() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/map"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not Found"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (mut app, client) = app_for(&mock_server);
        app.screen = Screen::Map;
        type_text(&mut app, "NOPE-1");
        let request = press(&mut app, KeyCode::Enter).expect("map request");

        app.apply(execute_request(&client, request).await);
        assert_eq!(app.map.error.as_deref(), Some("Server error 404: Not Found"));
        assert!(app.map.result.is_none());
    }

    #[tokio::test]
    async fn test_chat_fallback_and_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "AI unavailable, but raw search is working.",
                "source": "system"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ai_available": false,
                "dataset_loaded": true,
                "dataset_size": 3,
                "dataset_columns": [],
                "timestamp": 0.0
            })))
            .mount(&mock_server)
            .await;

        let (mut app, client) = app_for(&mock_server);
        let status = app.check_status().expect("status request");
        app.apply(execute_request(&client, status).await);
        assert!(matches!(app.backend, BackendState::Online(_)));

        app.screen = Screen::Chat;
        type_text(&mut app, "what is kasa?");
        let request = press(&mut app, KeyCode::Enter).expect("chat request");
        app.apply(execute_request(&client, request).await);

        let last = app.chat.conversation.messages.last().unwrap();
        assert_eq!(last.sender, Sender::Assistant);
        assert!(last.fallback);
        assert!(!app.chat.thinking());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_reported() {
        let config = Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            ..Config::default()
        };
        let client = ApiClient::from_config(&config).unwrap();
        let mut app = App::new(&config);

        let request = app.check_status().unwrap();
        app.apply(execute_request(&client, request).await);
        match &app.backend {
            BackendState::Unreachable(msg) => assert!(msg.starts_with("Request failed")),
            other => panic!("unexpected state {:?}", other),
        }
    }
}
