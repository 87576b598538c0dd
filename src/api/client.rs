//! HTTP gateway to the six cities REST API.
//!
//! Every request reads the session token and sends it as `X-Token`. A 401
//! answer clears the token and fires the de-authentication hook before the
//! error reaches the caller, so no operation has to handle it on its own.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::token::TokenStore;
use super::types::{Credentials, ErrorBody, Offer, Review, ReviewDraft, User};

pub const DEFAULT_BASE_URL: &str = "https://14.design.htmlacademy.pro/six-cities";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);
pub const TOKEN_HEADER: &str = "X-Token";

/// Errors that can occur while talking to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Connection-level failure (DNS, refused, reset).
    Network(String),
    /// No answer within the configured timeout.
    Timeout,
    /// The server rejected the session (HTTP 401). The token is already gone.
    Unauthorized,
    /// Any other non-2xx answer. `message` is the server's `message` field
    /// when it sent one, otherwise the raw body.
    Api { status: u16, message: String },
    /// The body did not match the expected shape.
    Parse(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => {
                write!(f, "Failed to load data. Server is unavailable ({msg})")
            }
            ApiError::Timeout => write!(f, "Failed to load data. Server did not respond in time"),
            ApiError::Unauthorized => write!(f, "not authorized"),
            ApiError::Api { status, message } => write!(f, "API error (HTTP {status}): {message}"),
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Called after a 401 has cleared the stored token.
pub type UnauthorizedHandler = Arc<dyn Fn() + Send + Sync>;

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
    on_unauthorized: Option<UnauthorizedHandler>,
}

impl ApiClient {
    /// Creates a client for `base_url` (no trailing slash needed).
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            tokens,
            on_unauthorized: None,
        })
    }

    /// Registers the hook fired on every 401. Replaces any previous hook.
    pub fn set_unauthorized_handler(&mut self, handler: UnauthorizedHandler) {
        self.on_unauthorized = Some(handler);
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `method path` with an optional JSON body and decodes the answer.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        info!("{} {}", method, path);

        let mut builder = self.client.request(method.clone(), &url);
        if let Some(token) = self.tokens.load() {
            builder = builder.header(TOKEN_HEADER, token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, path, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        debug!("{} {} -> {}", method, path, status);

        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("{} {} rejected the session, signing out", method, path);
            self.tokens.clear();
            if let Some(handler) = &self.on_unauthorized {
                handler();
            }
            return Err(ApiError::Unauthorized);
        }

        let text = response.text().await.map_err(ApiError::from)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.message)
                .unwrap_or(text);
            warn!("{} {} returned {}: {}", method, path, status, message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!("{} {} returned an unexpected body: {}", method, path, e);
            ApiError::Parse(e.to_string())
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn fetch_offers(&self) -> Result<Vec<Offer>, ApiError> {
        self.get("/offers").await
    }

    pub async fn fetch_offer(&self, id: &str) -> Result<Offer, ApiError> {
        self.get(&format!("/offers/{id}")).await
    }

    /// Session probe. Fails with `Unauthorized` when there is no session.
    pub async fn check_login(&self) -> Result<User, ApiError> {
        self.get("/login").await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.request(Method::POST, "/login", Some(credentials)).await
    }

    pub async fn fetch_favorites(&self) -> Result<Vec<Offer>, ApiError> {
        self.get("/favorite").await
    }

    pub async fn set_favorite(&self, id: &str, is_favorite: bool) -> Result<Offer, ApiError> {
        let flag = u8::from(is_favorite);
        self.request::<Offer, ()>(Method::POST, &format!("/favorite/{id}/{flag}"), None)
            .await
    }

    pub async fn fetch_reviews(&self, id: &str) -> Result<Vec<Review>, ApiError> {
        self.get(&format!("/comments/{id}")).await
    }

    pub async fn post_review(&self, id: &str, draft: &ReviewDraft) -> Result<Review, ApiError> {
        self.request(Method::POST, &format!("/comments/{id}"), Some(draft))
            .await
    }
}
