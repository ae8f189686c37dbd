//! HTTP Transport
//!
//! The client speaks to the server through the [`Transport`] trait so request
//! building stays independent of the HTTP stack. [`ReqwestTransport`] is the
//! production implementation.

use crate::error::{CloudantError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

/// A request relative to the server base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path segments, percent-encoded individually when the URL is built
    pub path: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new<I, S>(method: Method, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            path: path.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, path)
    }

    pub fn put<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::PUT, path)
    }

    pub fn post<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, path)
    }

    pub fn delete<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::DELETE, path)
    }

    pub fn head<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::HEAD, path)
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// `/a/b` form of the path, for logging.
    pub fn display_path(&self) -> String {
        format!("/{}", self.path.join("/"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail with the mapped server error on a non-2xx status.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(CloudantError::from_status(self.status, &self.body))
        }
    }

    /// Check the status then decode the body.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.error_for_status()?;
        serde_json::from_slice(&response.body).map_err(|e| {
            CloudantError::MalformedPayload(format!("Failed to parse response: {}", e))
        })
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Basic-auth credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

fn map_http_error(error: reqwest::Error) -> CloudantError {
    if error.is_timeout() {
        CloudantError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        CloudantError::Transport(format!("Connection error: {}", error))
    } else {
        CloudantError::Transport(format!("HTTP error: {}", error))
    }
}

/// `reqwest`-backed transport
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl ReqwestTransport {
    pub fn new(
        base_url: &str,
        credentials: Option<Credentials>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| CloudantError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// Parse a server URL, rejecting ones that cannot carry a path.
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url)
        .map_err(|e| CloudantError::InvalidArgument(format!("Invalid URL {}: {}", base_url, e)))?;
    if url.cannot_be_a_base() {
        return Err(CloudantError::InvalidArgument(format!(
            "URL cannot be used as a base: {}",
            base_url
        )));
    }
    Ok(url)
}

/// Append encoded path segments and query pairs to `base`.
pub fn build_url(base: &Url, request: &HttpRequest) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| CloudantError::InvalidArgument(format!("URL cannot be a base: {}", base)))?
        .pop_if_empty()
        .extend(request.path.iter());
    if !request.query.is_empty() {
        url.query_pairs_mut().extend_pairs(request.query.iter());
    }
    Ok(url)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = build_url(&self.base_url, &request)?;
        let path = request.display_path();
        let method = request.method.clone();

        let mut builder = self
            .client
            .request(request.method, url)
            .header("Accept", "application/json");
        if let Some(credentials) = &self.credentials {
            builder = builder.basic_auth(&credentials.username, credentials.password.as_ref());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let start = Instant::now();
        let response = builder.send().await.map_err(map_http_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_http_error)?.to_vec();

        debug!(
            method = %method,
            path = %path,
            status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );

        Ok(HttpResponse { status, body })
    }
}

/// Transport returning canned responses and recording requests
#[cfg(test)]
pub struct MockTransport {
    responses: parking_lot::Mutex<std::collections::VecDeque<HttpResponse>>,
    requests: parking_lot::Mutex<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self {
            responses: parking_lot::Mutex::new(std::collections::VecDeque::new()),
            requests: parking_lot::Mutex::new(Vec::new()),
        })
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.responses.lock().push_back(HttpResponse {
            status,
            body: body.to_string().into_bytes(),
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[cfg(test)]
#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().push(request);
        Ok(self.responses.lock().pop_front().unwrap_or(HttpResponse {
            status: 500,
            body: br#"{"error":"mock","reason":"no response queued"}"#.to_vec(),
        }))
    }
}
