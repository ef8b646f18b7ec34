//! Retrying HTTP transport.
//!
//! [`Transport`] turns a [`RequestDescriptor`] into a [`RawResponse`]. It
//! classifies every failure into the error taxonomy and retries the
//! retryable kinds with backoff. The actual HTTP exchange is delegated to an
//! [`HttpBackend`], by default [`ReqwestBackend`].

use std::sync::{Arc, RwLock};
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::config::{ClientConfig, Timeout};
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestDescriptor, RequestMethod};
use crate::response::RawResponse;
use crate::retry::{RetryConfig, RetryPolicy};
use crate::security::redact_params;

/// A fully resolved HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: RequestMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Get a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Performs one HTTP exchange.
///
/// Implementations return any received response, whatever its status, and
/// fail only when no response arrived (`Transport` or `Timeout`).
pub trait HttpBackend: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<RawResponse>;
}

/// Blocking reqwest backend with connection pooling.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    inner: reqwest::blocking::Client,
}

impl ReqwestBackend {
    /// Build the underlying HTTP client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let inner = reqwest::blocking::Client::builder()
            .timeout(config.timeout.request())
            .connect_timeout(config.timeout.connect())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config, format!("Failed to build HTTP client: {e}"), e))?;

        Ok(Self { inner })
    }
}

impl HttpBackend for ReqwestBackend {
    fn execute(&self, request: &HttpRequest) -> Result<RawResponse> {
        let mut req = self.inner.request(request.method.to_reqwest(), &request.url);

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            req = req.body(body.clone());
        }

        let response = req.send()?;
        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response.bytes()?;

        Ok(RawResponse::new(status, headers, body))
    }
}

/// Supplies a bearer token that may change over the transport's lifetime.
///
/// Consulted before every idempotent request. Implementations may call back
/// into `transport` for non-idempotent requests such as a token exchange.
pub trait TokenSource: Send + Sync {
    /// The access token to send, renewed first if it has expired.
    fn access_token(&self, transport: &Transport) -> Result<String>;
}

/// HTTP transport with retry, backoff and error classification.
///
/// Holds only immutable settings and the backend handle, so one instance can
/// be shared across threads. [`close`](Self::close) drops the backend and
/// with it any pooled connections.
pub struct Transport {
    base_url: String,
    timeout: Timeout,
    retry: RetryConfig,
    headers: Vec<(String, String)>,
    bearer_token: Option<String>,
    token_source: Option<Arc<dyn TokenSource>>,
    backend: RwLock<Option<Arc<dyn HttpBackend>>>,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[REDACTED]"))
            .field("token_source", &self.token_source.is_some())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Create a transport backed by reqwest.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let backend = ReqwestBackend::new(config)?;
        Self::with_backend(config, Arc::new(backend))
    }

    /// Create a transport over a custom backend.
    pub fn with_backend(config: &ClientConfig, backend: Arc<dyn HttpBackend>) -> Result<Self> {
        config.validate()?;

        let mut headers = vec![("User-Agent".to_string(), config.user_agent.clone())];
        headers.extend(config.extra_headers.iter().cloned());

        Ok(Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout,
            retry: config.retry.clone(),
            headers,
            bearer_token: config.access_token().map(str::to_string),
            token_source: None,
            backend: RwLock::new(Some(backend)),
        })
    }

    /// Attach the bearer token sent with every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Attach a token source. It takes precedence over a fixed bearer token
    /// for idempotent requests.
    pub fn with_token_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.token_source = Some(source);
        self
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns true if a bearer token or token source is attached.
    pub fn has_bearer_token(&self) -> bool {
        self.bearer_token.is_some() || self.token_source.is_some()
    }

    /// Release the backend. Calling this more than once is a no-op.
    pub fn close(&self) {
        let mut guard = self.backend.write().unwrap_or_else(|e| e.into_inner());
        if guard.take().is_some() {
            debug!(base_url = %self.base_url, "Transport closed");
        }
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.backend
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }

    fn backend(&self) -> Result<Arc<dyn HttpBackend>> {
        self.backend
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or_else(|| Error::config("client is closed"))
    }

    fn bearer_for(&self, request: &RequestDescriptor) -> Result<Option<String>> {
        match &self.token_source {
            Some(source) if request.method.is_idempotent() => source.access_token(self).map(Some),
            _ => Ok(self.bearer_token.clone()),
        }
    }

    fn prepare(&self, request: &RequestDescriptor) -> Result<HttpRequest> {
        let mut headers = self.headers.clone();
        headers.push(("Accept".to_string(), request.format.accept().to_string()));
        if let Some(token) = self.bearer_for(request)? {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let body = request.form_body()?;
        if body.is_some() {
            headers.push((
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ));
        }

        Ok(HttpRequest {
            method: request.method,
            url: request.url(&self.base_url),
            headers,
            body,
        })
    }

    /// Send a request, retrying retryable failures of idempotent methods.
    ///
    /// When retries run out the last classified error is returned.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub fn send(&self, request: &RequestDescriptor) -> Result<RawResponse> {
        let backend = self.backend()?;
        let http = self.prepare(request)?;

        debug!(
            url = %http.url,
            params = ?redact_params(request.params.iter().map(|p| (p.name.as_str(), p.value.as_str()))),
            "Sending request"
        );

        if !request.method.is_idempotent() {
            return self.attempt(backend.as_ref(), &http, 1);
        }

        let mut policy = RetryPolicy::new(self.retry.clone());
        let mut attempt = 1;

        loop {
            match self.attempt(backend.as_ref(), &http, attempt) {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() => {
                    if let Some(delay) = policy.next_delay(err.retry_after()) {
                        warn!(
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "Request failed, retrying"
                        );
                        std::thread::sleep(delay);
                        attempt += 1;
                        continue;
                    }

                    warn!(attempt, error = %err, "Retries exhausted");
                    return Err(err);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One attempt: execute and classify the outcome.
    fn attempt(
        &self,
        backend: &dyn HttpBackend,
        request: &HttpRequest,
        attempt: u32,
    ) -> Result<RawResponse> {
        let started = Instant::now();
        let outcome = backend
            .execute(request)
            .map_err(|err| self.fill_timeout(err, &request.url))
            .and_then(|response| response.error_for_status(Some(&request.url)));
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(response) => debug!(
                attempt,
                status = response.status,
                elapsed_ms,
                "Response received"
            ),
            Err(err) => info!(
                attempt,
                status = err.status(),
                elapsed_ms,
                error = %err,
                "Request attempt failed"
            ),
        }

        outcome
    }

    fn fill_timeout(&self, mut err: Error, url: &str) -> Error {
        if let ErrorKind::Timeout { timeout: None } = err.kind {
            err.kind = ErrorKind::Timeout {
                timeout: Some(self.timeout.request()),
            };
        }
        if err.envelope.url.is_none() {
            err.envelope.url = Some(url.to_string());
        }
        err
    }
}
