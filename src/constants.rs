// UI Constants
pub const APP_TITLE: &str = "medmap · NAMASTE ⇄ ICD-11";
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
pub const MAX_LOG_ENTRIES: usize = 200;

// API Constants
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const SEARCH_ENDPOINT: &str = "/search";
pub const MAP_ENDPOINT: &str = "/map";
pub const CHAT_ENDPOINT: &str = "/chat";
pub const STATUS_ENDPOINT: &str = "/status";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// NAMASTE systems served by the backend datasets
pub const DEFAULT_SYSTEMS: [&str; 3] = ["AYURVEDA", "SIDDHA", "UNANI"];

// Record fields with special meaning in result cards
pub const MATCHED_COLUMNS_KEY: &str = "matched_columns";
pub const TITLE_KEYS: [&str; 4] = ["NAMC_TERM", "title", "NAMC_CODE", "theCode"];
