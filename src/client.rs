use std::time::Duration;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    config::{GeneratorConfig, GeneratorMode},
    error::NotesError,
};

mod ollama;
mod openai;

pub use ollama::OllamaSummarizer;
pub use openai::OpenAiSummarizer;

/// Written in place of a note when the text generation service fails.
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable: the text generation service failed.";

const SYSTEM_PROMPT: &str = "You are an assistant summarizing text for students.";

/// Turns cleaned transcript text into note prose.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, NotesError>;
    fn source_name(&self) -> &'static str;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// System and user messages asking for student notes on `text`.
pub fn summary_messages(text: &str) -> Vec<ChatMessage> {
    // keep the prompt short, it is sent with every transcript
    let prompt = format!(
        "Summarize the following text for a student's notes. \
         Include key details but keep it structured and readable. \
         Use a mix of bullet points and short paragraphs where needed. \
         Highlight important definitions, concepts, and takeaways:\n\n{text}"
    );

    vec![
        ChatMessage::new("system", SYSTEM_PROMPT),
        ChatMessage::new("user", prompt),
    ]
}

// shared HTTP plumbing
struct BaseFetcher {
    client: reqwest::Client,
    base_url: String,
    retries: u8,
}

impl BaseFetcher {
    fn new(base_url: &str, retries: u8) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            retries,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // transport errors are retried, HTTP error statuses are not
    async fn fetch_with_retry<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, NotesError> {
        let mut attempt = 0;
        loop {
            let response = request
                .try_clone()
                .ok_or(NotesError::RequestNotCloneable)?
                .send()
                .await;
            tracing::debug!("REQUEST: {:?} \n RESPONSE: {:?}", request, response);
            match response {
                Ok(res) => return Ok(res.error_for_status()?.json::<T>().await?),
                Err(e) if attempt < self.retries => {
                    tracing::warn!("request failed (attempt {}): {}", attempt + 1, e);
                    tokio::time::sleep(backoff(attempt)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Wait before retry number `attempt + 1`: 1s, 2s, 4s, ... capped at 64s.
fn backoff(attempt: u8) -> Duration {
    Duration::from_secs(1 << attempt.min(6))
}

/// Builds the summarizer selected by `config.mode`.
pub fn summarizer_from_config(config: &GeneratorConfig) -> Box<dyn Summarizer> {
    match config.mode {
        GeneratorMode::Openai => Box::new(OpenAiSummarizer::new(config)),
        GeneratorMode::Ollama => Box::new(OllamaSummarizer::new(config)),
    }
}

/// Summarizes `text`, falling back to [`SUMMARY_UNAVAILABLE`] on any failure.
pub async fn summarize_or_sentinel(summarizer: &dyn Summarizer, text: &str) -> String {
    match summarizer.summarize(text).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!("{} failed: {}", summarizer.source_name(), e);
            SUMMARY_UNAVAILABLE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl Summarizer for Failing {
        async fn summarize(&self, _text: &str) -> Result<String, NotesError> {
            Err(NotesError::EmptyResponse("failing"))
        }

        fn source_name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn messages_carry_text() {
        let messages = summary_messages("photosynthesis");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.ends_with("\n\nphotosynthesis"));
    }

    #[test]
    fn picks_implementation_by_mode() {
        let mut config = GeneratorConfig::default();
        assert_eq!(summarizer_from_config(&config).source_name(), "OpenAI");
        config.mode = GeneratorMode::Ollama;
        assert_eq!(summarizer_from_config(&config).source_name(), "Ollama");
    }

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff(0), Duration::from_secs(1));
        assert_eq!(backoff(3), Duration::from_secs(8));
        assert_eq!(backoff(6), Duration::from_secs(64));
        assert_eq!(backoff(200), Duration::from_secs(64));
    }

    #[tokio::test]
    async fn failures_become_sentinel() {
        assert_eq!(
            summarize_or_sentinel(&Failing, "text").await,
            SUMMARY_UNAVAILABLE
        );
    }
}
