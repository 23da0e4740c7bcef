//! Chat-completion transport.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::GptConfig;
use crate::error::{GptError, Result};

/// Reply used when a successful response carries no recognizable text.
pub const NO_RESPONSE: &str = "No response";

pub type ChatFuture = Pin<Box<dyn Future<Output = Result<String>> + Send + 'static>>;

/// Sends one prompt as a single user message and resolves to the reply text.
pub trait ChatClient: Send + Sync + 'static {
    fn complete(&self, prompt: String) -> ChatFuture;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Pull the reply text out of a response body.
///
/// Endpoints disagree on the shape, so this tries, in order: a top-level
/// `response` field, OpenAI-style `choices[0].message.content`, then a
/// top-level `content` field. Empty strings count as absent.
pub fn extract_reply(body: &Value) -> Option<String> {
    let non_empty = |v: &Value| v.as_str().filter(|s| !s.is_empty()).map(str::to_string);

    body.get("response")
        .and_then(non_empty)
        .or_else(|| body.pointer("/choices/0/message/content").and_then(non_empty))
        .or_else(|| body.get("content").and_then(non_empty))
}

/// [`ChatClient`] over HTTP (reqwest, async).
#[derive(Clone)]
pub struct HttpChatClient {
    http: reqwest::Client,
    config: Arc<GptConfig>,
}

impl HttpChatClient {
    pub fn new(config: GptConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(GptError::Config("endpoint must not be empty".into()));
        }

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &GptConfig {
        &self.config
    }

    async fn send(http: reqwest::Client, config: Arc<GptConfig>, prompt: String) -> Result<String> {
        let body = ChatRequest {
            model: config.model.as_deref(),
            messages: [ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let mut request = http.post(&config.endpoint).json(&body);
        if let Some(key) = &config.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!("POST {} ({} prompt chars)", config.endpoint, prompt.len());
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(GptError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let value: Value = serde_json::from_str(&text)?;
        Ok(extract_reply(&value).unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}

impl ChatClient for HttpChatClient {
    fn complete(&self, prompt: String) -> ChatFuture {
        Box::pin(Self::send(self.http.clone(), Arc::clone(&self.config), prompt))
    }
}
