//! Gemini Generation Provider
//!
//! Implementation of `GenerationService` over the Generative Language REST
//! API (`models/{model}:generateContent`).

use async_trait::async_trait;
use jarvis_core::{
    error::{ChatError, Result, ServiceError, ServiceResult},
    provider::{GenerationOptions, GenerationService, ServiceInfo},
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Finish reasons for which the SDKs refuse to return text
const BLOCKED_FINISH_REASONS: [&str; 5] =
    ["SAFETY", "RECITATION", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

/// Gemini provider configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key, sent as `x-goog-api-key`
    pub api_key: String,

    /// API root, without trailing slash
    pub base_url: String,

    /// Request timeout in seconds (ignored on wasm32)
    pub timeout_secs: u64,

    /// Model and sampling parameters
    pub options: GenerationOptions,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            options: GenerationOptions::default(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("options", &self.options)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.options.model = model.into();
        self
    }

    /// Load from `GEMINI_API_KEY`, `GEMINI_MODEL`, `GEMINI_BASE_URL` and
    /// `GEMINI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_blank("GEMINI_API_KEY")
            .ok_or_else(|| ChatError::Config("GEMINI_API_KEY is not set".into()))?;

        let mut config = Self::new(api_key.trim());
        if let Some(model) = non_blank("GEMINI_MODEL") {
            config.options.model = model.trim().to_string();
        }
        if let Some(base_url) = non_blank("GEMINI_BASE_URL") {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        config.timeout_secs = non_blank("GEMINI_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(config)
    }
}

// Wire types

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Gemini generation provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create from configuration
    pub fn from_config(config: GeminiConfig) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(GeminiConfig::from_env()?)
    }

    /// Create with a caller-supplied HTTP client
    pub fn with_client(config: GeminiConfig, client: Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn model_url(&self) -> String {
        let model = self.config.options.model.trim_start_matches("models/");
        format!("{}/models/{}", self.config.base_url, model)
    }

    fn build_request(prompt: &str, options: &GenerationOptions) -> GenerateRequest {
        GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                top_p: options.top_p,
                max_output_tokens: options.max_tokens,
                stop_sequences: options.stop_sequences.clone(),
            },
        }
    }

    /// Pull the reply text out of a response body
    fn extract_text(response: GenerateResponse) -> ServiceResult<String> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map_or_else(
                    || "No candidates returned".to_string(),
                    |reason| format!("Text not available. Response was blocked due to {reason}"),
                );
            return Err(ServiceError::EmptyResponse(reason));
        };

        if let Some(reason) = candidate
            .finish_reason
            .as_deref()
            .filter(|r| BLOCKED_FINISH_REASONS.contains(r))
        {
            return Err(ServiceError::EmptyResponse(format!(
                "Text not available. Candidate was blocked due to {reason}"
            )));
        }

        Ok(candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client(config: &GeminiConfig) -> Result<Client> {
    Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| ChatError::Config(format!("Failed to build HTTP client: {e}")))
}

#[cfg(target_arch = "wasm32")]
fn build_client(_config: &GeminiConfig) -> Result<Client> {
    Ok(Client::new())
}

/// Map a non-success response to a service error
fn api_error(status: StatusCode, url: &str, body: &str) -> ServiceError {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let message = format!("Error fetching from {url}: [{status}] {detail}");

    if status == StatusCode::NOT_FOUND {
        ServiceError::NotFound(message)
    } else {
        ServiceError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Transport(format!("Error fetching from {url}: request timed out"))
    } else {
        ServiceError::Transport(format!("Error fetching from {url}: {}", err.without_url()))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl GenerationService for GeminiProvider {
    fn info(&self) -> ServiceInfo {
        ServiceInfo {
            name: "Gemini".into(),
            model: self.config.options.model.clone(),
        }
    }

    async fn health_check(&self) -> ServiceResult<bool> {
        let url = self.model_url();
        match self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => Ok(true),
            Ok(response) => {
                tracing::warn!(status = %response.status(), model = %self.config.options.model, "Gemini health check failed");
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(error = %transport_error(&url, e), "Gemini health check failed");
                Ok(false)
            }
        }
    }

    async fn generate(&self, prompt: &str) -> ServiceResult<String> {
        let url = format!("{}:generateContent", self.model_url());
        let request = Self::build_request(prompt, &self.config.options);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(&url, e))?;

        if !status.is_success() {
            return Err(api_error(status, &url, &body));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::Other(format!("Invalid response from {url}: {e}")))?;
        let text = Self::extract_text(parsed)?;
        tracing::debug!(model = %self.config.options.model, chars = text.len(), "Gemini reply received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use jarvis_core::FailureKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn test_provider(base_url: String) -> GeminiProvider {
        let config = GeminiConfig {
            base_url,
            ..GeminiConfig::new("test-key")
        };
        let client = Client::builder().no_proxy().build().unwrap();
        GeminiProvider::with_client(config, client)
    }

    /// Accept one connection, capture the request, answer with `status` and `body`.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (format!("http://{addr}/v1beta"), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_config_defaults() {
        let config = GeminiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.options.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_config_requires_api_key() {
        let err = GeminiConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
        assert!(GeminiConfig::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_config_overrides() {
        let config = GeminiConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "abc"),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
            ("GEMINI_BASE_URL", "http://localhost:8080/v1/"),
            ("GEMINI_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "abc");
        assert_eq!(config.options.model, "gemini-1.5-pro");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_config_bad_timeout_falls_back() {
        let config = GeminiConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "abc"),
            ("GEMINI_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap();
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", GeminiConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_request_body_shape() {
        let request = GeminiProvider::build_request("hello", &GenerationOptions::default());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 2048);
        assert!(json["generationConfig"].get("stopSequences").is_none());
    }

    #[test]
    fn test_model_url_strips_prefix() {
        let provider = test_provider("http://host/v1beta".into());
        assert_eq!(provider.model_url(), "http://host/v1beta/models/gemini-1.5-flash");

        let config = GeminiConfig::new("k").with_model("models/gemini-pro");
        let provider = GeminiProvider::with_client(config, Client::new());
        assert!(provider.model_url().ends_with("/models/gemini-pro"));
    }

    #[test]
    fn test_extract_text_concatenates_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello, "},{"text":"world"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(GeminiProvider::extract_text(response).unwrap(), "Hello, world");
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        let err = GeminiProvider::extract_text(response).unwrap_err();
        assert_eq!(
            err,
            ServiceError::EmptyResponse("Text not available. Response was blocked due to SAFETY".into())
        );
    }

    #[test]
    fn test_extract_text_blocked_candidate() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"RECITATION"}]}"#).unwrap();
        let err = GeminiProvider::extract_text(response).unwrap_err();
        assert!(err.to_string().contains("blocked due to RECITATION"));
    }

    #[test]
    fn test_api_error_mapping() {
        let body = r#"{"error":{"code":404,"message":"models/gemini-x is not found for API version v1beta","status":"NOT_FOUND"}}"#;
        let err = api_error(StatusCode::NOT_FOUND, "http://host/x", body);
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(
            err.to_string(),
            "Error fetching from http://host/x: [404 Not Found] models/gemini-x is not found for API version v1beta"
        );

        let err = api_error(StatusCode::FORBIDDEN, "http://host/x", "denied");
        assert_eq!(err.status(), Some(403));
        assert_eq!(FailureKind::classify(&err), FailureKind::Other);
    }

    #[tokio::test]
    async fn test_generate_success_round_trip() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"world"}]},"finishReason":"STOP"}]}"#,
        )
        .await;
        let provider = test_provider(base_url);

        let text = provider.generate("hello").await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(text, "world");
        assert!(request.starts_with("POST /v1beta/models/gemini-1.5-flash:generateContent HTTP/1.1"));
        assert!(request.to_lowercase().contains("x-goog-api-key: test-key"));
        assert!(request.contains(r#""text":"hello""#));
    }

    #[tokio::test]
    async fn test_generate_not_found_is_unavailable() {
        let (base_url, server) = serve_once(
            "404 Not Found",
            r#"{"error":{"code":404,"message":"models/gemini-1.5-flash is not found","status":"NOT_FOUND"}}"#,
        )
        .await;
        let provider = test_provider(base_url);

        let err = provider.generate("hello").await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(FailureKind::classify(&err), FailureKind::Unavailable);
    }

    #[tokio::test]
    async fn test_generate_server_error_is_status() {
        let (base_url, server) = serve_once(
            "500 Internal Server Error",
            r#"{"error":{"code":500,"message":"Internal error encountered.","status":"INTERNAL"}}"#,
        )
        .await;
        let provider = test_provider(base_url);

        let err = provider.generate("hello").await.unwrap_err();
        server.await.unwrap();

        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().ends_with("Internal error encountered."));
    }

    #[tokio::test]
    async fn test_generate_connection_refused_is_transport() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let provider = test_provider(format!("http://{addr}/v1beta"));

        let err = provider.generate("hello").await.unwrap_err();

        assert!(matches!(err, ServiceError::Transport(_)));
        assert!(err.to_string().starts_with("Error fetching from http://"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let (base_url, server) = serve_once("200 OK", r#"{"name":"models/gemini-1.5-flash"}"#).await;
        let provider = test_provider(base_url);

        assert!(provider.health_check().await.unwrap());
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /v1beta/models/gemini-1.5-flash HTTP/1.1"));

        let (base_url, server) = serve_once("404 Not Found", "{}").await;
        let provider = test_provider(base_url);
        assert!(!provider.health_check().await.unwrap());
        server.await.unwrap();
    }
}
