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
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Any endpoint speaking the OpenAI chat completions API.
pub struct OpenAiSummarizer {
    base: BaseFetcher,
    api_key: String,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            base: BaseFetcher::new(config.base_url(), config.retries),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, NotesError> {
        let body = ChatRequest {
            model: &self.model,
            messages: summary_messages(text),
            stream: false,
        };

        let mut request = self
            .base
            .client
            .post(self.base.url("/chat/completions"))
            .json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response: ChatResponse = self.base.fetch_with_retry(request).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(NotesError::EmptyResponse(self.source_name()));
        }

        Ok(content)
    }

    fn source_name(&self) -> &'static str {
        "OpenAI"
    }
}
