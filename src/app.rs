use crate::chat::{ChatMessage, Conversation, Sender};
use crate::config::Config;
use crate::log_view::LogView;
use crate::models::{
    BackendStatus, ChatRequest, ChatResponse, MapRequest, MapResponse, SearchRequest,
    SearchResponse,
};
use crate::status_indicator::StatusIndicator;

pub const EMPTY_QUERY_ERROR: &str = "Please enter a search query";
pub const EMPTY_CODE_ERROR: &str = "Please enter a NAMASTE code";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Search,
    Map,
    Chat,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Search, Screen::Map, Screen::Chat];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Search => "Search",
            Screen::Map => "Map code",
            Screen::Chat => "Assistant",
        }
    }

    pub fn index(self) -> usize {
        Screen::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Screen {
        Screen::ALL[(self.index() + 1) % Screen::ALL.len()]
    }

    pub fn prev(self) -> Screen {
        Screen::ALL[(self.index() + Screen::ALL.len() - 1) % Screen::ALL.len()]
    }
}

/// Work the UI wants done against the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    Search(SearchRequest),
    Map(MapRequest),
    Chat(ChatRequest),
    Status,
}

/// Completion of an [`ApiRequest`], errors already rendered to display text.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Search(Result<SearchResponse, String>),
    Map(Result<MapResponse, String>),
    Chat(Result<ChatResponse, String>),
    Status(Result<BackendStatus, String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendState {
    Unknown,
    Checking,
    Online(BackendStatus),
    Unreachable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    Query,
    Systems,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTag {
    pub name: String,
    pub selected: bool,
}

#[derive(Debug)]
pub struct SearchForm {
    pub query: String,
    pub focus: SearchFocus,
    pub tags: Vec<SystemTag>,
    pub tag_cursor: usize,
    pub error: Option<String>,
    pub results: Option<SearchResponse>,
    pub scroll: u16,
    /// Furthest `scroll` can go, as measured by the last draw.
    pub max_scroll: u16,
    pub indicator: StatusIndicator,
}

impl SearchForm {
    pub fn new(systems: &[String]) -> Self {
        Self {
            query: String::new(),
            focus: SearchFocus::Query,
            tags: systems
                .iter()
                .map(|name| SystemTag {
                    name: name.clone(),
                    selected: false,
                })
                .collect(),
            tag_cursor: 0,
            error: None,
            results: None,
            scroll: 0,
            max_scroll: 0,
            indicator: StatusIndicator::new(),
        }
    }

    pub fn loading(&self) -> bool {
        self.indicator.is_busy()
    }

    /// Selected tags in display order, `None` when nothing is selected.
    pub fn selected_systems(&self) -> Option<Vec<String>> {
        let selected: Vec<String> = self
            .tags
            .iter()
            .filter(|t| t.selected)
            .map(|t| t.name.clone())
            .collect();
        if selected.is_empty() {
            None
        } else {
            Some(selected)
        }
    }

    pub fn toggle_tag(&mut self) {
        if let Some(tag) = self.tags.get_mut(self.tag_cursor) {
            tag.selected = !tag.selected;
        }
    }

    pub fn tag_left(&mut self) {
        if self.tags.is_empty() {
            return;
        }
        self.tag_cursor = if self.tag_cursor == 0 {
            self.tags.len() - 1
        } else {
            self.tag_cursor - 1
        };
    }

    pub fn tag_right(&mut self) {
        if self.tags.is_empty() {
            return;
        }
        self.tag_cursor = (self.tag_cursor + 1) % self.tags.len();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            SearchFocus::Query => SearchFocus::Systems,
            SearchFocus::Systems => SearchFocus::Query,
        };
    }

    pub fn submit(&mut self) -> Option<SearchRequest> {
        if self.loading() {
            return None;
        }
        let query = self.query.trim();
        if query.is_empty() {
            self.error = Some(EMPTY_QUERY_ERROR.to_string());
            return None;
        }

        let request = SearchRequest {
            query: query.to_string(),
            systems: self.selected_systems(),
        };
        self.error = None;
        self.results = None;
        self.scroll = 0;
        self.indicator.set_busy(true);
        self.indicator
            .set_status(format!("Searching for \"{}\"...", request.query));
        Some(request)
    }

    fn finish(&mut self, result: Result<SearchResponse, String>) {
        self.indicator.set_busy(false);
        self.indicator.clear_status();
        match result {
            Ok(resp) => {
                self.error = None;
                self.results = Some(resp);
            }
            Err(e) => {
                self.results = None;
                self.error = Some(e);
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct MapForm {
    pub code: String,
    pub error: Option<String>,
    pub result: Option<MapResponse>,
    pub scroll: u16,
    pub max_scroll: u16,
    pub indicator: StatusIndicator,
}

impl MapForm {
    pub fn loading(&self) -> bool {
        self.indicator.is_busy()
    }

    pub fn submit(&mut self) -> Option<MapRequest> {
        if self.loading() {
            return None;
        }
        let code = self.code.trim();
        if code.is_empty() {
            self.error = Some(EMPTY_CODE_ERROR.to_string());
            return None;
        }

        let request = MapRequest {
            namaste_code: code.to_string(),
        };
        self.error = None;
        self.result = None;
        self.scroll = 0;
        self.indicator.set_busy(true);
        self.indicator
            .set_status(format!("Mapping {} to ICD-11...", request.namaste_code));
        Some(request)
    }

    fn finish(&mut self, result: Result<MapResponse, String>) {
        self.indicator.set_busy(false);
        self.indicator.clear_status();
        match result {
            Ok(resp) => {
                self.error = None;
                self.result = Some(resp);
            }
            Err(e) => {
                self.result = None;
                self.error = Some(e);
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ChatPanel {
    pub conversation: Conversation,
    pub input: String,
    /// Lines scrolled up from the newest message; 0 keeps the view pinned.
    pub scroll_back: u16,
    pub indicator: StatusIndicator,
}

impl ChatPanel {
    pub fn thinking(&self) -> bool {
        self.indicator.is_busy()
    }

    pub fn send(&mut self, history_limit: usize) -> Option<ChatRequest> {
        if self.thinking() {
            return None;
        }
        let query = self.input.trim().to_string();
        if query.is_empty() {
            return None;
        }

        let conversation_history = self.conversation.history(history_limit);
        self.conversation
            .push(ChatMessage::new(Sender::User, query.clone()));
        self.input.clear();
        self.scroll_back = 0;
        self.indicator.set_busy(true);
        self.indicator.set_status("Thinking...");

        Some(ChatRequest {
            query,
            conversation_history,
        })
    }

    fn finish(&mut self, result: Result<ChatResponse, String>) {
        self.indicator.set_busy(false);
        self.indicator.clear_status();
        let message = match result {
            Ok(resp) if resp.is_fallback() => ChatMessage::fallback(resp.response),
            Ok(resp) => ChatMessage::new(Sender::Assistant, resp.response),
            Err(e) => ChatMessage::new(Sender::Error, e),
        };
        self.conversation.push(message);
        self.scroll_back = 0;
    }
}

pub struct App {
    pub screen: Screen,
    pub quit_confirm: bool,
    pub should_quit: bool,
    pub search: SearchForm,
    pub map: MapForm,
    pub chat: ChatPanel,
    pub logs: LogView,
    pub backend: BackendState,
    pub api_base_url: String,
    pub history_limit: usize,
}

impl App {
    pub fn new(config: &Config) -> App {
        App {
            screen: Screen::Search,
            quit_confirm: false,
            should_quit: false,
            search: SearchForm::new(&config.systems),
            map: MapForm::default(),
            chat: ChatPanel::default(),
            logs: LogView::new(),
            backend: BackendState::Unknown,
            api_base_url: config.api_base_url.clone(),
            history_limit: config.chat_history_limit,
        }
    }

    pub fn submit_search(&mut self) -> Option<ApiRequest> {
        let request = self.search.submit()?;
        self.logs.add(format!("POST /search \"{}\"", request.query));
        Some(ApiRequest::Search(request))
    }

    pub fn submit_map(&mut self) -> Option<ApiRequest> {
        let request = self.map.submit()?;
        self.logs
            .add(format!("POST /map {}", request.namaste_code));
        Some(ApiRequest::Map(request))
    }

    pub fn send_chat(&mut self) -> Option<ApiRequest> {
        let request = self.chat.send(self.history_limit)?;
        self.logs.add(format!(
            "POST /chat ({} prior turns)",
            request.conversation_history.len()
        ));
        Some(ApiRequest::Chat(request))
    }

    pub fn check_status(&mut self) -> Option<ApiRequest> {
        if self.backend == BackendState::Checking {
            return None;
        }
        self.backend = BackendState::Checking;
        self.logs.add(format!("GET /status on {}", self.api_base_url));
        Some(ApiRequest::Status)
    }

    /// Folds a finished request back into the UI state.
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Search(result) => {
                match &result {
                    Ok(resp) => self.logs.add(format!(
                        "Search \"{}\": {} NAMASTE, {} ICD-11",
                        resp.query,
                        resp.namaste_matches.len(),
                        resp.icd11_matches.len()
                    )),
                    Err(e) => self.logs.add(format!("Search failed: {}", e)),
                }
                self.search.finish(result);
            }
            AppEvent::Map(result) => {
                match &result {
                    Ok(resp) => self.logs.add(format!(
                        "Mapped {}: {} ICD-11",
                        resp.namaste_code,
                        resp.icd11_matches.len()
                    )),
                    Err(e) => self.logs.add(format!("Map failed: {}", e)),
                }
                self.map.finish(result);
            }
            AppEvent::Chat(result) => {
                match &result {
                    Ok(resp) if resp.is_fallback() => {
                        self.logs.add("Assistant offline, backend sent a fallback reply")
                    }
                    Ok(resp) => self.logs.add(format!(
                        "Assistant replied ({} chars)",
                        resp.response.chars().count()
                    )),
                    Err(e) => self.logs.add(format!("Chat failed: {}", e)),
                }
                self.chat.finish(result);
            }
            AppEvent::Status(result) => {
                self.backend = match result {
                    Ok(status) => {
                        self.logs.add(format!("Backend: {}", status.summary()));
                        BackendState::Online(status)
                    }
                    Err(e) => {
                        self.logs.add(format!("Backend unreachable: {}", e));
                        BackendState::Unreachable(e)
                    }
                };
            }
        }
    }

    pub fn tick(&mut self) {
        self.search.indicator.update_spinner();
        self.map.indicator.update_spinner();
        self.chat.indicator.update_spinner();
    }

    pub fn next_screen(&mut self) {
        self.screen = self.screen.next();
    }

    pub fn prev_screen(&mut self) {
        self.screen = self.screen.prev();
    }

    pub fn scroll_up(&mut self) {
        match self.screen {
            Screen::Search => self.search.scroll = self.search.scroll.saturating_sub(5),
            Screen::Map => self.map.scroll = self.map.scroll.saturating_sub(5),
            Screen::Chat => self.chat.scroll_back = self.chat.scroll_back.saturating_add(5),
        }
    }

    pub fn scroll_down(&mut self) {
        match self.screen {
            Screen::Search => {
                let form = &mut self.search;
                form.scroll = form.scroll.saturating_add(5).min(form.max_scroll);
            }
            Screen::Map => {
                let form = &mut self.map;
                form.scroll = form.scroll.saturating_add(5).min(form.max_scroll);
            }
            Screen::Chat => self.chat.scroll_back = self.chat.scroll_back.saturating_sub(5),
        }
    }
}
