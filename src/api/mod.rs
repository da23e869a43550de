//! Thin REST client for the campaign/donation/withdrawal backend.
//!
//! One `ApiClient` is built at startup and cloned cheaply. Binding it to a session
//! store with `with_session` makes every call carry the stored token as a bearer
//! credential, and makes a 401 from the backend clear that store.

use std::time::Duration;

use reqwest::{
    Method, RequestBuilder, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{config::AppConfig, session::SessionState};

pub mod auth;
pub mod campaigns;
pub mod donations;
pub mod organizers;
pub mod withdrawals;

/// ApiError
///
/// Every way a backend call can fail. `message` fields carry the backend's own
/// `message` when the error body had one.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("cannot connect to backend at {base_url}: {source}")]
    Network {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("backend error ({status}): {message}")]
    Server { status: StatusCode, message: String },
    #[error("request failed ({status}): {message}")]
    Status { status: StatusCode, message: String },
    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("invalid request: {0}")]
    InvalidRequest(#[source] reqwest::Error),
}

/// ApiClient
///
/// Wraps a pooled `reqwest::Client` and the backend base URL.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Option<SessionState>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(ApiError::InvalidRequest)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session: None,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(&config.backend_url, config.backend_timeout)
    }

    /// with_session
    ///
    /// A clone of this client that authenticates with, and on 401 clears, `store`.
    pub fn with_session(&self, store: SessionState) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            session: Some(store),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));

        let token = self
            .session
            .as_ref()
            .and_then(|store| store.read().token)
            .filter(|token| !token.is_empty());

        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(path, self.request(Method::GET, path)).await
    }

    async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(path, self.request(Method::GET, path).query(query))
            .await
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(path, self.request(method, path).json(body)).await
    }

    async fn send_empty<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, ApiError> {
        self.send(path, self.request(method, path)).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|source| {
            tracing::error!(
                base_url = %self.base_url,
                endpoint = %path,
                error = %source,
                "cannot connect to backend"
            );
            ApiError::Network {
                base_url: self.base_url.clone(),
                source,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(ApiError::Decode);
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("message")?.as_str().map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        Err(self.classify(path, status, message))
    }

    fn classify(&self, path: &str, status: StatusCode, message: String) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED => {
                // The token is no longer valid: same cleanup as a corrupt session.
                if let Some(store) = &self.session {
                    store.clear();
                }
                tracing::warn!(endpoint = %path, "backend rejected credentials, session cleared");
                ApiError::Unauthorized(message)
            }
            StatusCode::FORBIDDEN => {
                tracing::error!(endpoint = %path, message = %message, "access forbidden");
                ApiError::Forbidden(message)
            }
            StatusCode::NOT_FOUND => {
                tracing::error!(
                    endpoint = %path,
                    full_url = %format!("{}{}", self.base_url, path),
                    "API endpoint or resource not found"
                );
                ApiError::NotFound(message)
            }
            status if status.is_server_error() => {
                tracing::error!(endpoint = %path, status = %status, message = %message, "backend server error");
                ApiError::Server { status, message }
            }
            status => ApiError::Status { status, message },
        }
    }
}

/// Percent-encodes a path segment taken from caller input.
fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}
