// src/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A backend row rendered generically, keys kept in the order they arrived.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub systems: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(default)]
    pub systems: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub namaste_matches: Vec<Record>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icd11_matches: Icd11Matches,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRequest {
    pub namaste_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapResponse {
    pub namaste_code: String,
    #[serde(default)]
    pub namaste_info: Option<Record>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icd11_matches: Icd11Matches,
}

/// ICD-11 matches arrive either as a list of entities or as a preformatted
/// text block, depending on the backend build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Icd11Matches {
    List(Vec<Record>),
    Text(String),
}

impl Default for Icd11Matches {
    fn default() -> Self {
        Icd11Matches::List(Vec::new())
    }
}

impl Icd11Matches {
    pub fn is_empty(&self) -> bool {
        match self {
            Icd11Matches::List(items) => items.is_empty(),
            Icd11Matches::Text(text) => text.trim().is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Icd11Matches::List(items) => items.len(),
            Icd11Matches::Text(text) => text.lines().filter(|l| !l.trim().is_empty()).count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub conversation_history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default = "default_source")]
    pub source: String,
}

impl ChatResponse {
    /// The backend answers with `source = "system"` when its model is offline.
    pub fn is_fallback(&self) -> bool {
        self.source == "system"
    }
}

fn default_source() -> String {
    "ai".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendStatus {
    #[serde(default)]
    pub ai_available: bool,
    #[serde(default)]
    pub dataset_loaded: bool,
    #[serde(default)]
    pub dataset_size: u64,
    #[serde(default)]
    pub dataset_columns: Vec<String>,
    #[serde(default)]
    pub timestamp: f64,
}

impl BackendStatus {
    pub fn summary(&self) -> String {
        let ai = if self.ai_available {
            "AI online"
        } else {
            "AI offline"
        };
        let data = if self.dataset_loaded {
            format!("{} NAMASTE records", self.dataset_size)
        } else {
            "no dataset loaded".to_string()
        };
        format!("{} · {}", ai, data)
    }
}

/// Logs details of each API call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCallLog {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub request_summary: String,
    pub response_status: u16,
    pub response_time_ms: u128,
}

impl fmt::Display for ApiCallLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} - Status: {} - Time: {}ms",
            self.timestamp.to_rfc3339(),
            self.endpoint,
            self.request_summary,
            self.response_status,
            self.response_time_ms
        )
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
