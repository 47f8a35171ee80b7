//! OpenAI-compatible chat completions backend.
//!
//! Works with OpenAI, OpenRouter, Ollama, vLLM and anything else exposing
//! `/chat/completions`. The system instruction and the assembled prompt go
//! out as a system and a user message; the reply is the first choice's
//! content.

use async_trait::async_trait;
use niagate_core::completion::{CompletionBackend, CompletionRequest};
use niagate_core::error::CompletionError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::http;

pub struct OpenAiCompatBackend {
    name: String,
    model: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatBackend {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        Ok(Self {
            name: name.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: http::build_client(timeout)?,
        })
    }

    /// OpenAI itself (convenience constructor).
    pub fn openai(
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        Self::new("openai", "https://api.openai.com/v1", model, api_key, timeout)
    }

    fn request_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
            stream: false,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiCompatBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(backend = %self.name, model = %self.model, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(&request))
            .send()
            .await
            .map_err(http::send_error)?;

        let response = http::check_status(&self.name, response).await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(format!("chat completion: {e}")))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| CompletionError::MalformedResponse("No choices in response".into()))
    }
}

// --- OpenAI wire types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::HeaderMap, routing::post};

    fn backend(base_url: &str) -> OpenAiCompatBackend {
        OpenAiCompatBackend::new("local", base_url, "gpt-test", "sk-test", Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn openai_constructor() {
        let b = OpenAiCompatBackend::openai("gpt-4o-mini", "sk", Duration::from_secs(1)).unwrap();
        assert_eq!(b.name(), "openai");
        assert!(b.base_url.contains("api.openai.com"));
    }

    #[test]
    fn body_has_system_then_user() {
        let b = backend("http://localhost/v1/");
        assert_eq!(b.base_url, "http://localhost/v1");

        let req = CompletionRequest::new("SYS", "USER").with_generation(0.5, 100);
        let body = serde_json::to_value(b.request_body(&req)).unwrap();
        assert_eq!(body["model"], "gpt-test");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "SYS");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "USER");
        assert_eq!(body["max_tokens"], 100);
        assert_eq!(body["stream"], false);
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn round_trip_against_local_server() {
        let app = Router::new().route(
            "/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let content = format!("{auth} | {}", body["messages"][1]["content"].as_str().unwrap_or(""));
                Json(serde_json::json!({
                    "choices": [{"message": {"role": "assistant", "content": content}}]
                }))
            }),
        );
        let base = serve(app).await;

        let text = backend(&base)
            .complete(CompletionRequest::new("s", "hello"))
            .await
            .unwrap();
        assert_eq!(text, "Bearer sk-test | hello");
    }

    #[tokio::test]
    async fn empty_choices_is_malformed() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { Json(serde_json::json!({"choices": []})) }),
        );
        let base = serve(app).await;

        let err = backend(&base)
            .complete(CompletionRequest::new("s", "p"))
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_failure() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { axum::http::StatusCode::UNAUTHORIZED }),
        );
        let base = serve(app).await;

        let err = backend(&base)
            .complete(CompletionRequest::new("s", "p"))
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::AuthenticationFailed(_)));
    }
}
