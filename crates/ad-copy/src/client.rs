//! Gemini API Client

use crate::prompt::{build_prompt, SYSTEM_INSTRUCTION};
use crate::AdCopyError;
use feature_encoder::RawInput;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Header carrying the API key; kept out of the URL so transport errors
/// never echo it
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Returned when the API answers without any text
pub const FALLBACK_TEXT: &str = "Could not generate description.";

/// Ad copy client configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdCopyConfig {
    /// Gemini API key; generation is disabled without one
    pub api_key: Option<String>,
    /// API root, without the `/models/...` suffix
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Total attempts per request
    pub max_retries: u32,
    /// Delay before the first retry; doubles each attempt
    pub base_delay_ms: u64,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Enable Google Search grounding
    pub google_search: bool,
}

impl Default for AdCopyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash-preview-09-2025".to_string(),
            max_retries: 3,
            base_delay_ms: 1000,
            timeout_secs: 30,
            google_search: true,
        }
    }
}

impl fmt::Debug for AdCopyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdCopyConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .field("base_delay_ms", &self.base_delay_ms)
            .field("timeout_secs", &self.timeout_secs)
            .field("google_search", &self.google_search)
            .finish()
    }
}

/// Delay before retrying after failed attempt `attempt` (0-based)
pub fn backoff_delay(base_delay_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(base_delay_ms.saturating_mul(1u64 << attempt.min(16)))
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Client for generating classified-ad descriptions
pub struct AdCopyClient {
    client: Client,
    config: AdCopyConfig,
    api_key: String,
}

impl AdCopyClient {
    /// Create a client; fails when no API key is configured
    pub fn new(config: AdCopyConfig) -> Result<Self, AdCopyError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AdCopyError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdCopyError::Client(e.to_string()))?;

        info!("Creating ad copy client for model {}", config.model);
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn payload(&self, prompt: &str) -> Value {
        let mut payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
        });
        if self.config.google_search {
            payload["tools"] = json!([{ "google_search": {} }]);
        }
        payload
    }

    /// Generate an ad description for a car at the given display price
    pub async fn generate(
        &self,
        input: &RawInput,
        formatted_price: &str,
    ) -> Result<String, AdCopyError> {
        let payload = self.payload(&build_prompt(input, formatted_price));
        let attempts = self.config.max_retries.max(1);
        let mut last_error = String::new();

        for attempt in 0..attempts {
            match self.send(&payload).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    last_error = e.to_string();
                    if attempt + 1 < attempts {
                        let delay = backoff_delay(self.config.base_delay_ms, attempt);
                        warn!(
                            "Ad copy attempt {} failed: {}. Retrying in {}ms",
                            attempt + 1,
                            e,
                            delay.as_millis()
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        error!("Ad copy generation failed after {} attempts", attempts);
        Err(AdCopyError::RetriesExhausted {
            attempts,
            last_error,
        })
    }

    async fn send(&self, payload: &Value) -> Result<String, AdCopyError> {
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(payload)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdCopyError::Status(status.as_u16()));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(request_error)?;

        debug!("Ad copy response with {} candidate(s)", body.candidates.len());
        Ok(body.first_text().unwrap_or_else(|| FALLBACK_TEXT.to_string()))
    }
}

fn request_error(e: reqwest::Error) -> AdCopyError {
    AdCopyError::Request(e.without_url().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};

    fn config_with_key() -> AdCopyConfig {
        AdCopyConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(1000, 0), Duration::from_millis(1000));
        assert_eq!(backoff_delay(1000, 1), Duration::from_millis(2000));
        assert_eq!(backoff_delay(1000, 2), Duration::from_millis(4000));
    }

    #[test]
    fn test_requires_api_key() {
        assert!(matches!(
            AdCopyClient::new(AdCopyConfig::default()),
            Err(AdCopyError::MissingApiKey)
        ));
        let blank = AdCopyConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(AdCopyClient::new(blank), Err(AdCopyError::MissingApiKey)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", config_with_key());
        assert!(!rendered.contains("test-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_endpoint_and_payload() {
        let client = AdCopyClient::new(AdCopyConfig {
            base_url: "http://localhost:8000/v1beta/".to_string(),
            google_search: false,
            ..config_with_key()
        })
        .unwrap();

        assert_eq!(
            client.endpoint(),
            "http://localhost:8000/v1beta/models/gemini-2.5-flash-preview-09-2025:generateContent"
        );
        let payload = client.payload("hello");
        assert_eq!(payload["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(payload["systemInstruction"]["parts"][0]["text"], SYSTEM_INSTRUCTION);
        assert!(payload.get("tools").is_none());
    }

    #[test]
    fn test_response_text_extraction() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "A gleaming convertible."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(body.first_text().as_deref(), Some("A gleaming convertible."));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert_eq!(empty.first_text(), None);
    }

    #[tokio::test]
    async fn test_retries_exhausted_on_unreachable_endpoint() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = AdCopyClient::new(AdCopyConfig {
            api_key: Some("SECRET-KEY-123".to_string()),
            base_url: format!("http://{}/v1beta", addr),
            max_retries: 2,
            base_delay_ms: 1,
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        let err = client.generate(&RawInput::default(), "$1.00").await.unwrap_err();
        assert!(matches!(err, AdCopyError::RetriesExhausted { attempts: 2, .. }));

        let rendered = format!("{} {:?}", err, err);
        assert!(!rendered.contains("SECRET-KEY-123"));
        assert!(!rendered.contains("generateContent"));
    }

    /// Scripted stand-in for the Gemini endpoint
    struct Upstream {
        /// Status per call; calls past the end answer 200
        statuses: Vec<u16>,
        body: Value,
        /// (api key header, query string) per call
        requests: Mutex<Vec<(Option<String>, Option<String>)>>,
    }

    impl Upstream {
        fn new(statuses: Vec<u16>, body: Value) -> Arc<Self> {
            Arc::new(Self {
                statuses,
                body,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    async fn respond(
        State(upstream): State<Arc<Upstream>>,
        headers: HeaderMap,
        uri: Uri,
    ) -> (StatusCode, Json<Value>) {
        let mut requests = upstream.requests.lock().unwrap();
        requests.push((
            headers
                .get(API_KEY_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            uri.query().map(str::to_string),
        ));
        let status = upstream.statuses.get(requests.len() - 1).copied().unwrap_or(200);
        (StatusCode::from_u16(status).unwrap(), Json(upstream.body.clone()))
    }

    async fn serve(upstream: Arc<Upstream>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(respond).with_state(upstream);
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}/v1beta", addr)
    }

    fn client_for(base_url: String, max_retries: u32) -> AdCopyClient {
        AdCopyClient::new(AdCopyConfig {
            base_url,
            max_retries,
            base_delay_ms: 1,
            timeout_secs: 5,
            ..config_with_key()
        })
        .unwrap()
    }

    fn text_body(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    #[tokio::test]
    async fn test_retries_after_server_error() {
        let upstream = Upstream::new(vec![500], text_body("Low miles, one owner."));
        let client = client_for(serve(upstream.clone()).await, 3);

        let text = client.generate(&RawInput::default(), "$19,500.00").await.unwrap();
        assert_eq!(text, "Low miles, one owner.");
        assert_eq!(upstream.calls(), 2);

        for (key, query) in upstream.requests.lock().unwrap().iter() {
            assert_eq!(key.as_deref(), Some("test-key"));
            assert!(query.as_deref().map_or(true, |q| !q.contains("test-key")));
        }
    }

    #[tokio::test]
    async fn test_empty_candidates_use_fallback_text() {
        let upstream = Upstream::new(vec![], json!({ "candidates": [] }));
        let client = client_for(serve(upstream.clone()).await, 3);

        let text = client.generate(&RawInput::default(), "$1.00").await.unwrap();
        assert_eq!(text, FALLBACK_TEXT);
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn test_status_error_until_retries_exhausted() {
        let upstream = Upstream::new(vec![503, 503, 503], json!({}));
        let client = client_for(serve(upstream.clone()).await, 2);

        let payload = client.payload("hello");
        assert!(matches!(client.send(&payload).await, Err(AdCopyError::Status(503))));

        let err = client.generate(&RawInput::default(), "$1.00").await.unwrap_err();
        match err {
            AdCopyError::RetriesExhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 2);
                assert!(last_error.contains("503"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(upstream.calls(), 3);
    }
}
