//! Completion endpoint client
//!
//! Talks to the Gemini `generateContent` REST API. The API key travels in
//! the request URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::render::FALLBACK_ANSWER;
use crate::error::{Error, Result};

/// Request body of `generateContent`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Single user turn: the text part first, then every inline file
    pub fn user(text: impl Into<String>, files: Vec<InlineData>) -> Self {
        let mut parts = vec![Part::Text { text: text.into() }];
        parts.extend(files.into_iter().map(|inline_data| Part::InlineData { inline_data }));
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Standard base64
    pub data: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, or the fixed
    /// fallback when there is none
    pub fn answer(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.clone())
            .unwrap_or_else(|| FALLBACK_ANSWER.to_string())
    }
}

/// Produces answers from text and file inputs
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Model or backend name, for logs
    fn name(&self) -> &str;

    /// A non-success response is [`Error::CompletionApi`]
    async fn generate(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse>;
}

/// [`CompletionClient`] for the Gemini REST API
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Endpoint without the key query parameter
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let url = self.endpoint();
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            let message = serde_json::from_str::<ErrorWrapper>(&body)
                .ok()
                .and_then(|w| w.error.message)
                .unwrap_or(body);
            return Err(Error::CompletionApi {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
