//! Client configuration.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::request::ResponseFormat;
use crate::retry::RetryConfig;

/// Request timeout: one overall bound, or separate connect and read bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    Total(Duration),
    Split { connect: Duration, read: Duration },
}

impl Default for Timeout {
    fn default() -> Self {
        Timeout::Total(crate::DEFAULT_TIMEOUT)
    }
}

impl Timeout {
    /// Bound on establishing the connection.
    pub fn connect(&self) -> Duration {
        match self {
            Timeout::Total(t) => *t,
            Timeout::Split { connect, .. } => *connect,
        }
    }

    /// Bound on a whole request attempt.
    pub fn request(&self) -> Duration {
        match self {
            Timeout::Total(t) => *t,
            Timeout::Split { connect, read } => connect.saturating_add(*read),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Timeout::Total(t) if t.is_zero() => {
                Err(Error::config(format!("timeout must be positive: {t:?}")))
            }
            Timeout::Split { connect, read } if connect.is_zero() || read.is_zero() => {
                Err(Error::config(format!(
                    "timeout values must be positive: ({connect:?}, {read:?})"
                )))
            }
            _ => Ok(()),
        }
    }
}

impl From<Duration> for Timeout {
    fn from(d: Duration) -> Self {
        Timeout::Total(d)
    }
}

impl From<(Duration, Duration)> for Timeout {
    fn from((connect, read): (Duration, Duration)) -> Self {
        Timeout::Split { connect, read }
    }
}

/// Configuration for the OpenF1 client.
///
/// Built once through [`ClientConfigBuilder`] and immutable afterwards.
/// Credential fields are redacted in Debug output.
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the data API.
    pub base_url: String,
    /// OAuth2 token endpoint.
    pub token_url: String,
    /// Request timeout.
    pub timeout: Timeout,
    /// Retry configuration.
    pub retry: RetryConfig,
    /// Response format used when a call does not ask for one.
    pub default_format: ResponseFormat,
    /// Whether TLS certificates are verified.
    pub verify_tls: bool,
    /// User-Agent header value.
    pub user_agent: String,
    /// Headers added to every request.
    pub extra_headers: Vec<(String, String)>,
    /// Pool idle timeout.
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    access_token: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("default_format", &self.default_format)
            .field("verify_tls", &self.verify_tls)
            .field("user_agent", &self.user_agent)
            .field(
                "extra_headers",
                &self
                    .extra_headers
                    .iter()
                    .map(|(k, _)| k.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: crate::DEFAULT_BASE_URL.to_string(),
            token_url: crate::DEFAULT_TOKEN_URL.to_string(),
            timeout: Timeout::default(),
            retry: RetryConfig::default(),
            default_format: ResponseFormat::Json,
            verify_tls: true,
            user_agent: crate::USER_AGENT.to_string(),
            extra_headers: Vec::new(),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            access_token: None,
            username: None,
            password: None,
        }
    }
}

impl ClientConfig {
    /// Create a new client config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Caller-supplied bearer token.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Username for the password grant.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Password for the password grant.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Returns true if username and password are configured.
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Returns true if a bearer token is configured.
    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Returns true if any form of authentication is configured.
    pub fn is_authenticated(&self) -> bool {
        self.has_token() || self.has_credentials()
    }

    /// A copy of this configuration using `token` instead of any other
    /// credentials.
    pub fn with_access_token(&self, token: impl Into<String>) -> Result<Self> {
        let config = Self {
            access_token: Some(token.into()),
            username: None,
            password: None,
            ..self.clone()
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every option and option combination.
    pub fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_url("token_url", &self.token_url)?;
        self.timeout.validate()?;

        if self.user_agent.trim().is_empty() {
            return Err(Error::config("user_agent cannot be empty"));
        }

        for (name, value) in &self.extra_headers {
            reqwest::header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::config(format!("invalid header name: {name:?}")))?;
            reqwest::header::HeaderValue::from_str(value)
                .map_err(|_| Error::config(format!("invalid value for header {name:?}")))?;
        }

        match (&self.username, &self.password) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(Error::config(
                    "Both username and password must be provided together, or neither",
                ));
            }
            (Some(u), Some(p)) => {
                if u.is_empty() {
                    return Err(Error::config("Username cannot be empty"));
                }
                if p.is_empty() {
                    return Err(Error::config("Password cannot be empty"));
                }
            }
            (None, None) => {}
        }

        if let Some(token) = &self.access_token {
            if token.trim().is_empty() {
                return Err(Error::config("Access token cannot be empty"));
            }
            if self.has_credentials() {
                return Err(Error::config(
                    "Provide either an access token or username/password, not both",
                ));
            }
        }

        Ok(())
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::config(format!("{field} cannot be empty")));
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(Error::config(format!(
            "{field} must start with http:// or https://: {value}"
        )));
    }
    url::Url::parse(value)?;
    Ok(())
}

/// Builder for ClientConfig.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Override the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Override the OAuth2 token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.config.token_url = url.into();
        self
    }

    /// Set one overall request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Timeout::Total(timeout);
        self
    }

    /// Set separate connect and read timeouts.
    pub fn with_split_timeout(mut self, connect: Duration, read: Duration) -> Self {
        self.config.timeout = Timeout::Split { connect, read };
        self
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Set the number of retries, keeping the other retry settings.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.config.retry.max_retries = retries;
        self
    }

    /// Disable retries.
    pub fn without_retry(mut self) -> Self {
        self.config.retry = RetryConfig::no_retry();
        self
    }

    /// Set the default response format.
    pub fn with_default_format(mut self, format: ResponseFormat) -> Self {
        self.config.default_format = format;
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.config.verify_tls = verify;
        self
    }

    /// Set custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Set pool idle timeout.
    pub fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    pub fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    /// Authenticate with a caller-supplied bearer token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.config.access_token = Some(token.into());
        self
    }

    /// Authenticate with the OAuth2 password grant.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.config.username = Some(username.into());
        self.config.password = Some(password.into());
        self
    }

    /// Set only the username. Must be paired with [`with_password`](Self::with_password).
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self
    }

    /// Set only the password. Must be paired with [`with_username`](Self::with_username).
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    /// Validate and build the client configuration.
    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
