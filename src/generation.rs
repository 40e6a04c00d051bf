//! Content-generation client.
//!
//! Turns a topic into a `{title, summary, content}` suggestion by asking the
//! Gemini `generateContent` endpoint for a JSON-shaped reply.
//!
//! # Request
//!
//! ```text
//! POST {endpoint}/v1beta/models/{model}:generateContent
//! x-goog-api-key: <credential>
//!
//! { "contents": [{ "parts": [{ "text": "<instruction with topic>" }] }],
//!   "generationConfig": { "responseMimeType": "application/json" } }
//! ```
//!
//! # Failure policy
//!
//! One request, no retry, no timeout, no partial results. The credential is
//! checked before anything touches the network. Every failure is a
//! [`GenerationError`]; callers show [`GenerationError::user_message`], which
//! singles out the missing credential and folds the rest into one generic
//! message.
//!
//! The HTTP call sits behind [`Transport`] so the parsing and precondition
//! logic can be exercised without a network.

use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Longest slice of an error body kept in [`GenerationError::Service`].
const MAX_ERROR_BODY: usize = 320;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("no API key configured for the content-generation service")]
    MissingCredential,
    #[error("request to the content-generation service failed: {0}")]
    Transport(String),
    #[error("content-generation service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },
    #[error("content-generation service returned an empty reply")]
    EmptyReply,
    #[error("content-generation reply is not a JSON object: {0}")]
    MalformedReply(String),
}

impl GenerationError {
    /// What the person at the keyboard should see.
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerationError::MissingCredential => {
                "AI generation is not configured: set the API_KEY environment variable \
                 (or generation.api_key in the config file) and try again."
            }
            _ => "AI content generation failed. Check your API key settings and try again.",
        }
    }
}

/// A generated suggestion. A field the reply omitted (or sent as a
/// non-string) is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeneratedContent {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
}

impl GeneratedContent {
    /// Parse the model's reply text. It must be a JSON object; extra keys are
    /// ignored.
    pub fn from_reply(text: &str) -> Result<Self, GenerationError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| GenerationError::MalformedReply(e.to_string()))?;
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(GenerationError::MalformedReply(format!(
                    "expected an object, got {}",
                    json_kind(&other)
                )));
            }
        };
        let field = |name: &str| fields.get(name).and_then(Value::as_str).map(str::to_string);
        Ok(Self {
            title: field("title"),
            summary: field("summary"),
            content: field("content"),
        })
    }
}

pub trait ContentGenerator {
    fn generate(&self, topic: &str) -> Result<GeneratedContent, GenerationError>;
}

/// Raw HTTP outcome handed back by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

pub trait Transport {
    fn post_json(
        &self,
        url: &str,
        api_key: &str,
        payload: &Value,
    ) -> Result<HttpReply, GenerationError>;
}

/// Blocking reqwest transport with the client-side timeout disabled.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, GenerationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn post_json(
        &self,
        url: &str,
        api_key: &str,
        payload: &Value,
    ) -> Result<HttpReply, GenerationError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(payload)
            .send()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        Ok(HttpReply { status, body })
    }
}

/// Where and how to reach the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl GeminiSettings {
    /// The credential, if set to something other than whitespace.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn generate_url(&self) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        if endpoint.contains(":generateContent") {
            endpoint.to_string()
        } else {
            format!("{endpoint}/v1beta/models/{}:generateContent", self.model)
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient<T: Transport> {
    settings: GeminiSettings,
    transport: T,
}

impl GeminiClient<ReqwestTransport> {
    pub fn connect(settings: GeminiSettings) -> Result<Self, GenerationError> {
        Ok(Self::new(settings, ReqwestTransport::new()?))
    }
}

impl<T: Transport> GeminiClient<T> {
    pub fn new(settings: GeminiSettings, transport: T) -> Self {
        Self {
            settings,
            transport,
        }
    }
}

impl<T: Transport> ContentGenerator for GeminiClient<T> {
    fn generate(&self, topic: &str) -> Result<GeneratedContent, GenerationError> {
        let api_key = self
            .settings
            .credential()
            .ok_or(GenerationError::MissingCredential)?;

        let url = self.settings.generate_url();
        tracing::info!(model = %self.settings.model, topic, "requesting generated post");
        let reply = self
            .transport
            .post_json(&url, api_key, &request_payload(topic))?;

        if !(200..300).contains(&reply.status) {
            tracing::warn!(status = reply.status, "generation service error");
            return Err(GenerationError::Service {
                status: reply.status,
                body: truncate(&reply.body, MAX_ERROR_BODY),
            });
        }

        let text = reply_text(&reply.body)?;
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyReply);
        }
        let content = GeneratedContent::from_reply(&text)?;
        tracing::debug!(
            has_title = content.title.is_some(),
            has_summary = content.summary.is_some(),
            has_content = content.content.is_some(),
            "generated post parsed"
        );
        Ok(content)
    }
}

/// The instruction sent to the model, topic interpolated.
pub fn prompt(topic: &str) -> String {
    format!(
        r#"اكتب مقالاً احترافياً باللغة العربية حول الموضوع التالي: "{topic}".
يجب أن يتضمن المقال:
1. عنواناً جذاباً.
2. ملخصاً قصيراً.
3. محتوى المقال مقسماً إلى فقرات.

تنسيق الرد يجب أن يكون JSON كالتالي:
{{
  "title": "العنوان هنا",
  "summary": "الملخص هنا",
  "content": "المحتوى الكامل هنا"
}}"#
    )
}

pub fn request_payload(topic: &str) -> Value {
    json!({
        "contents": [
            {
                "parts": [
                    { "text": prompt(topic) }
                ]
            }
        ],
        "generationConfig": {
            "responseMimeType": "application/json"
        }
    })
}

/// Concatenated text parts of the first candidate. A missing candidate
/// yields an empty string, which the caller reports as an empty reply.
fn reply_text(body: &str) -> Result<String, GenerationError> {
    let envelope: Value = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedReply(format!("response envelope: {e}")))?;
    Ok(envelope["candidates"]
        .as_array()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate["content"]["parts"].as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect::<String>()
        })
        .unwrap_or_default())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
