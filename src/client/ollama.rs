use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{BaseFetcher, ChatMessage, Summarizer, summary_messages};
use crate::{config::GeneratorConfig, error::NotesError};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatMessage>,
}

// local Ollama server, /api/chat
pub struct OllamaSummarizer {
    base: BaseFetcher,
    model: String,
}

impl OllamaSummarizer {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            base: BaseFetcher::new(config.base_url(), config.retries),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, NotesError> {
        let body = ChatRequest {
            model: &self.model,
            messages: summary_messages(text),
            stream: false,
        };

        let request = self
            .base
            .client
            .post(self.base.url("/api/chat"))
            .json(&body);

        let response: ChatResponse = self.base.fetch_with_retry(request).await?;
        let content = response.message.map(|m| m.content).unwrap_or_default();

        if content.trim().is_empty() {
            return Err(NotesError::EmptyResponse(self.source_name()));
        }

        Ok(content)
    }

    fn source_name(&self) -> &'static str {
        "Ollama"
    }
}
