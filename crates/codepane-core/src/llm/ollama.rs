use crate::config::Settings;
use crate::constants::endpoints::{CHAT_PATH, OLLAMA_BASE_URL, TAGS_PATH};
use crate::error::CodepaneError;
use crate::llm::traits::*;
use futures::channel::mpsc;
use futures::StreamExt;
use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Client for a local Ollama server, speaking its HTTP API directly.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

/// A model entry from `GET /api/tags`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelSummary {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelSummary>,
}

#[derive(Debug, Deserialize)]
struct StreamLine {
    #[serde(default)]
    message: Option<LineMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LineMessage {
    #[serde(default)]
    content: String,
}

impl OllamaClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: OLLAMA_BASE_URL.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, CodepaneError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(settings.ollama.connect_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: normalize_base_url(&settings.ollama_base_url()),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(&url.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<reqwest::Response, CodepaneError> {
        let response = self
            .client
            .post(self.url(CHAT_PATH))
            .json(request)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        check_status(response).await
    }

    fn unreachable(&self, e: reqwest::Error) -> CodepaneError {
        CodepaneError::Llm(format!("Ollama not reachable at {}: {e}", self.base_url))
    }

    /// Installed models with their sizes.
    pub async fn list_local_models(&self) -> Result<Vec<ModelSummary>, CodepaneError> {
        let response = self
            .client
            .get(self.url(TAGS_PATH))
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        let response = check_status(response).await?;
        let body: TagsResponse = response
            .json()
            .await
            .map_err(|e| CodepaneError::Llm(format!("Failed to parse Ollama model list: {e}")))?;
        Ok(body.models)
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CodepaneError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(CodepaneError::Llm(format!("Ollama API error ({status}): {text}")))
}

/// Decode one NDJSON line of a streaming reply.
///
/// Lines that are blank or fail to parse yield no events.
pub fn decode_stream_line(line: &str) -> Vec<StreamEvent> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    let parsed: StreamLine = match serde_json::from_str(line) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("skipping unparsable stream line: {e}");
            return Vec::new();
        }
    };

    let mut events = Vec::new();
    if let Some(error) = parsed.error {
        events.push(StreamEvent::Error(error));
    }
    if let Some(message) = parsed.message {
        if !message.content.is_empty() {
            events.push(StreamEvent::TextDelta(message.content));
        }
    }
    if parsed.done {
        events.push(StreamEvent::Done);
    }
    events
}

/// Forward the events of one line. Returns `true` once the stream is over,
/// either because the server said so or because nobody is listening.
fn forward_line(tx: &mpsc::UnboundedSender<StreamEvent>, line: &[u8]) -> bool {
    for event in decode_stream_line(&String::from_utf8_lossy(line)) {
        let done = event == StreamEvent::Done;
        if tx.unbounded_send(event).is_err() || done {
            return true;
        }
    }
    false
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, CodepaneError> {
        let request = ChatRequest {
            stream: false,
            ..request
        };
        let response = self.post_chat(&request).await?;
        response
            .json()
            .await
            .map_err(|e| CodepaneError::Llm(format!("Failed to parse Ollama response: {e}")))
    }

    async fn chat_stream(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> Result<mpsc::UnboundedReceiver<StreamEvent>, CodepaneError> {
        let request = request.streaming();
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(CodepaneError::Cancelled),
            response = self.post_chat(&request) => response?,
        };

        let (tx, rx) = mpsc::unbounded();
        let mut stream = response.bytes_stream();

        tokio::spawn(async move {
            let mut buffer: Vec<u8> = Vec::new();

            loop {
                let next = tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("chat stream cancelled");
                        return;
                    }
                    next = stream.next() => next,
                };
                let chunk = match next {
                    Some(Ok(chunk)) => chunk,
                    Some(Err(e)) => {
                        let _ = tx.unbounded_send(StreamEvent::Error(e.to_string()));
                        return;
                    }
                    None => break,
                };

                buffer.extend_from_slice(&chunk);
                while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    if forward_line(&tx, &line) {
                        return;
                    }
                }
            }

            // The body may end without a trailing newline or a done marker.
            if !forward_line(&tx, &buffer) {
                let _ = tx.unbounded_send(StreamEvent::Done);
            }
        });

        Ok(rx)
    }

    async fn list_models(&self) -> Result<Vec<String>, CodepaneError> {
        Ok(self
            .list_local_models()
            .await?
            .into_iter()
            .map(|m| m.name)
            .collect())
    }
}
