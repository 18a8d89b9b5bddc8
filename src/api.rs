use crate::{
    config::Config,
    constants::{CHAT_ENDPOINT, MAP_ENDPOINT, SEARCH_ENDPOINT, STATUS_ENDPOINT},
    errors::{MedmapError, MedmapResult},
    models::{
        ApiCallLog, BackendStatus, ChatRequest, ChatResponse, MapRequest, MapResponse,
        SearchRequest, SearchResponse,
    },
};
use chrono::Utc;
use log::{info, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Thin JSON client for the NAMASTE/ICD-11 backend. One call, one request:
/// nothing is retried or cached.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> MedmapResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &Config) -> MedmapResult<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn search(&self, request: &SearchRequest) -> MedmapResult<SearchResponse> {
        let summary = match &request.systems {
            Some(systems) => format!("query={:?} systems={}", request.query, systems.join(",")),
            None => format!("query={:?}", request.query),
        };
        self.post(SEARCH_ENDPOINT, &summary, request).await
    }

    pub async fn map_code(&self, request: &MapRequest) -> MedmapResult<MapResponse> {
        let summary = format!("namaste_code={:?}", request.namaste_code);
        self.post(MAP_ENDPOINT, &summary, request).await
    }

    pub async fn chat(&self, request: &ChatRequest) -> MedmapResult<ChatResponse> {
        let summary = format!(
            "query_len={} history={}",
            request.query.chars().count(),
            request.conversation_history.len()
        );
        self.post(CHAT_ENDPOINT, &summary, request).await
    }

    pub async fn status(&self) -> MedmapResult<BackendStatus> {
        let builder = self.client.get(self.url(STATUS_ENDPOINT));
        self.execute(STATUS_ENDPOINT, "status check", builder).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn post<B, T>(&self, endpoint: &str, summary: &str, body: &B) -> MedmapResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.client.post(self.url(endpoint)).json(body);
        self.execute(endpoint, summary, builder).await
    }

    async fn execute<T>(
        &self,
        endpoint: &str,
        summary: &str,
        builder: RequestBuilder,
    ) -> MedmapResult<T>
    where
        T: DeserializeOwned,
    {
        let start_time = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} {} failed before a response arrived: {}", endpoint, summary, e);
                return Err(MedmapError::Http(e));
            }
        };

        let status = response.status().as_u16();
        let result = read_body(response).await;

        let call = ApiCallLog {
            timestamp: Utc::now(),
            endpoint: endpoint.to_string(),
            request_summary: summary.to_string(),
            response_status: status,
            response_time_ms: start_time.elapsed().as_millis(),
        };
        match &result {
            Ok(_) => info!("{}", call),
            Err(e) => warn!("{} - {}", call, e),
        }

        result
    }
}

async fn read_body<T: DeserializeOwned>(response: Response) -> MedmapResult<T> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = error_message(&text)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
        return Err(MedmapError::api_error(status.as_u16(), message));
    }

    Ok(serde_json::from_str(&text)?)
}

/// Pulls a human-readable message out of an error body. FastAPI puts it in
/// `detail`, either as a string or as a list of validation errors.
pub fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        match &value["detail"] {
            Value::String(detail) => return Some(detail.clone()),
            Value::Array(items) => {
                let msgs: Vec<&str> = items.iter().filter_map(|i| i["msg"].as_str()).collect();
                if !msgs.is_empty() {
                    return Some(msgs.join("; "));
                }
            }
            _ => {}
        }
        for key in ["error", "message"] {
            if let Some(msg) = value[key].as_str() {
                return Some(msg.to_string());
            }
        }
    }

    let mut message: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        message.push('…');
    }
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HistoryEntry, Icd11Matches, Role};
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_search_posts_once_and_parses_matches() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_json(json!({"query": "jvara", "systems": ["AYURVEDA"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": "jvara",
                "systems": ["AYURVEDA"],
                "namaste_matches": [
                    {"NAMC_CODE": "AAE-16", "NAMC_TERM": "jvaraH", "matched_columns": ["NAMC_TERM"]}
                ],
                "icd11_matches": [{"title": "Fever, unspecified", "theCode": "MG26"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let resp = client
            .search(&SearchRequest {
                query: "jvara".to_string(),
                systems: Some(vec!["AYURVEDA".to_string()]),
            })
            .await
            .unwrap();

        assert_eq!(resp.namaste_matches.len(), 1);
        assert_eq!(resp.namaste_matches[0]["NAMC_CODE"], json!("AAE-16"));
        assert_eq!(resp.icd11_matches.len(), 1);
    }

    #[tokio::test]
    async fn test_map_code_parses_text_icd_block() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/map"))
            .and(body_json(json!({"namaste_code": "SR11"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "namaste_code": "SR11",
                "namaste_info": {"NAMC_CODE": "SR11", "NAMC_TERM": "Vali Azhal"},
                "icd11_matches": "No ICD-11 matches found"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let resp = client_for(&mock_server)
            .map_code(&MapRequest {
                namaste_code: "SR11".to_string(),
            })
            .await
            .unwrap();

        assert!(resp.namaste_info.is_some());
        assert_eq!(
            resp.icd11_matches,
            Icd11Matches::Text("No ICD-11 matches found".to_string())
        );
    }

    #[tokio::test]
    async fn test_chat_sends_history() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({
                "query": "and in Siddha?",
                "conversation_history": [
                    {"role": "user", "content": "what is jvara"},
                    {"role": "assistant", "content": "Fever."}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "In Siddha it is Suram.",
                "source": "ai"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let resp = client_for(&mock_server)
            .chat(&ChatRequest {
                query: "and in Siddha?".to_string(),
                conversation_history: vec![
                    HistoryEntry {
                        role: Role::User,
                        content: "what is jvara".to_string(),
                    },
                    HistoryEntry {
                        role: Role::Assistant,
                        content: "Fever.".to_string(),
                    },
                ],
            })
            .await
            .unwrap();

        assert_eq!(resp.response, "In Siddha it is Suram.");
    }

    #[tokio::test]
    async fn test_non_success_surfaces_detail() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/map"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"detail": "Not Found"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .map_code(&MapRequest {
                namaste_code: "XYZ".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Server error 404: Not Found");
    }

    #[tokio::test]
    async fn test_non_success_without_body_uses_reason() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .search(&SearchRequest {
                query: "x".to_string(),
                systems: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Server error 500: Internal Server Error");
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).status().await.unwrap_err();
        assert!(matches!(err, MedmapError::Decode(_)));
    }

    #[tokio::test]
    async fn test_status_parses() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ai_available": true,
                "dataset_loaded": true,
                "dataset_size": 12,
                "dataset_columns": ["NAMC_CODE"],
                "timestamp": 1718000000.5
            })))
            .mount(&mock_server)
            .await;

        let status = client_for(&mock_server).status().await.unwrap();
        assert!(status.ai_available);
        assert_eq!(status.dataset_size, 12);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8000/ ", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/map"), "http://localhost:8000/map");
    }

    #[test]
    fn test_error_message_variants() {
        assert_eq!(
            error_message(r#"{"detail": [{"loc": ["body", "query"], "msg": "field required"}]}"#),
            Some("field required".to_string())
        );
        assert_eq!(
            error_message(r#"{"error": "boom"}"#),
            Some("boom".to_string())
        );
        assert_eq!(error_message("Bad gateway"), Some("Bad gateway".to_string()));
        assert_eq!(error_message("   "), None);

        let long = "x".repeat(500);
        let msg = error_message(&long).unwrap();
        assert_eq!(msg.chars().count(), MAX_ERROR_BODY_CHARS + 1);
    }
}
