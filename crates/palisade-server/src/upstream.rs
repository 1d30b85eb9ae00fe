//! HTTP client for the proxied backend service.

use axum::http::StatusCode;
use thiserror::Error;
use tracing::debug;

/// Upstream request errors.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The request could not be sent or the response body read.
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// A response from the backend, reduced to what the gateway forwards.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// The backend's status code, forwarded as-is.
    pub status: StatusCode,
    /// The backend's body text, sanitized before forwarding.
    pub body: String,
}

/// Client for the backend catalogue service.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    base_url: String,
    http: reqwest::Client,
}

impl UpstreamClient {
    /// Creates a client for the given base URL (e.g. `http://127.0.0.1:3001`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forwards a GET, passing the raw query string through unmodified.
    pub async fn get(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = match query {
            Some(q) if !q.is_empty() => format!("{}{}?{}", self.base_url, path, q),
            _ => format!("{}{}", self.base_url, path),
        };
        debug!(%url, "forwarding GET to upstream");
        let response = self.http.get(&url).send().await?;
        Self::into_response(response).await
    }

    /// Forwards a POST with a JSON body.
    pub async fn post_json(
        &self,
        path: &str,
        body: String,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "forwarding POST to upstream");
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        Self::into_response(response).await
    }

    async fn into_response(response: reqwest::Response) -> Result<UpstreamResponse, UpstreamError> {
        // Status conversion goes through u16 so the gateway does not depend
        // on reqwest and axum agreeing on an http crate version.
        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.text().await?;
        Ok(UpstreamResponse { status, body })
    }
}
