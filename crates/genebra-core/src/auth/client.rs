//! Login endpoint client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Shown when the backend rejects a login without saying why
pub const GENERIC_LOGIN_ERROR: &str = "Error while trying to log in.";

/// Username/password pair posted to `/login`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Exchanges credentials for a bearer token
#[async_trait]
pub trait LoginClient: Send + Sync {
    /// Returns the access token on success.
    ///
    /// A non-success response is [`Error::AuthRejected`] carrying the
    /// server's `msg` (or [`GENERIC_LOGIN_ERROR`]).
    async fn login(&self, credentials: &Credentials) -> Result<String>;
}

/// Body of both success and failure responses
#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: Option<String>,
    msg: Option<String>,
}

/// [`LoginClient`] posting JSON to `{base_url}/login`
pub struct HttpLoginClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLoginClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn login_url(&self) -> String {
        format!("{}/login", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LoginClient for HttpLoginClient {
    async fn login(&self, credentials: &Credentials) -> Result<String> {
        let url = self.login_url();
        debug!("POST {} as {}", url, credentials.username);

        let response = self.client.post(&url).json(credentials).send().await?;
        let status = response.status();

        // The body is JSON on both paths and is parsed before the status check
        let body: LoginResponse = response.json().await?;

        if !status.is_success() {
            let message = body
                .msg
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_LOGIN_ERROR.to_string());
            return Err(Error::AuthRejected(message));
        }

        body.access_token
            .ok_or_else(|| Error::Http("Login response did not include an access token".to_string()))
    }
}
