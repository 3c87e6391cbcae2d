//! Client for the intranet knowledge endpoints
//!
//! `/ask` and `/upload` are protected by the bearer token the login flow
//! stores. Both calls fail with [`Error::NotAuthenticated`] when no token
//! is stored.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::chat::Attachment;
use crate::error::{Error, Result};
use crate::storage::{StoredToken, TokenStore};

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: Option<String>,
}

/// Body of `/upload` responses and of backend errors
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Set by the auth layer when the token is rejected
    #[serde(default)]
    pub msg: Option<String>,
}

impl StatusResponse {
    fn text(&self) -> Option<String> {
        self.message.clone().or_else(|| self.msg.clone())
    }
}

/// Authenticated client for `/ask` and `/upload`
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn token(&self) -> Result<String> {
        StoredToken::read(self.store.as_ref())?.ok_or(Error::NotAuthenticated)
    }

    /// Ask a question against the uploaded documents
    pub async fn ask(&self, query: &str) -> Result<String> {
        let token = self.token()?;
        let url = self.url("ask");
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(backend_error(status, response.text().await?));
        }

        let body: AskResponse = response.json().await?;
        body.answer
            .ok_or_else(|| Error::Http("Ask response did not include an answer".to_string()))
    }

    /// Upload files for indexing; returns the backend's status message
    pub async fn upload(&self, files: &[Attachment]) -> Result<String> {
        let token = self.token()?;
        let url = self.url("upload");

        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let part = reqwest::multipart::Part::bytes(file.read_bytes().await?)
                .file_name(file.name.clone())
                .mime_str(&file.mime_type)?;
            form = form.part("files", part);
        }

        info!("Uploading {} file(s) to {}", files.len(), url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(backend_error(status, response.text().await?));
        }

        let body: StatusResponse = response.json().await?;
        Ok(body.text().unwrap_or_else(|| format!("{} file(s) uploaded.", files.len())))
    }
}

fn backend_error(status: reqwest::StatusCode, body: String) -> Error {
    let message = serde_json::from_str::<StatusResponse>(&body)
        .ok()
        .and_then(|r| r.text())
        .unwrap_or(body);
    Error::Backend {
        status: status.as_u16(),
        message,
    }
}
