use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("provider returned no text")]
    Empty,
}

/// A hosted model that turns one prompt into one text reply.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// `provider:model`, used in logs and to tag where an itinerary came from.
    fn label(&self) -> String;

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ProviderError::Status { status, body });
    }
    Ok(resp.json().await?)
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

pub struct GeminiProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn label(&self) -> String {
        format!("gemini:{}", self.model)
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({ "contents": [{ "parts": [{ "text": prompt }] }] }))
            .send()
            .await?;

        let body: GeminiResponse = read_json(resp).await?;
        gemini_text(body).ok_or(ProviderError::Empty)
    }
}

/// Text of the first candidate with its parts joined; `None` when blank.
fn gemini_text(body: GeminiResponse) -> Option<String> {
    let text: String = body
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    (!text.trim().is_empty()).then_some(text)
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// OpenAI-compatible chat completions endpoint (Groq).
pub struct GroqProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GroqProvider {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl ModelProvider for GroqProvider {
    fn label(&self) -> String {
        format!("groq:{}", self.model)
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let payload = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await?;

        let body: ChatResponse = read_json(resp).await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ProviderError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_reply_joins_parts() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "{\"days\""}, {"text": ": []}"}]}}]}"#;
        let body: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(gemini_text(body).as_deref(), Some("{\"days\": []}"));
    }

    #[test]
    fn blocked_gemini_reply_has_no_text() {
        let body: GeminiResponse = serde_json::from_str(r#"{"promptFeedback": {}}"#).unwrap();
        assert_eq!(gemini_text(body), None);
    }

    #[test]
    fn whitespace_only_parts_are_blank() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "  "}, {"text": "\n"}]}}]}"#;
        let body: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(gemini_text(body), None);
    }

    #[test]
    fn chat_reply_parses() {
        let raw = r#"{"choices": [{"message": {"role": "assistant", "content": "hi"}}]}"#;
        let body: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.choices[0].message.content.as_deref(), Some("hi"));
    }
}
