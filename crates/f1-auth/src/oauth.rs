//! OAuth2 resource-owner password grant.
//!
//! The exchange is a single form POST to the token endpoint. It goes through
//! the shared [`Transport`], which never retries non-idempotent requests.

use std::sync::Mutex;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use openf1_client::{Error, ErrorKind, RequestDescriptor, Result, TokenSource, Transport};

use crate::credentials::Credentials;

/// Tokens are treated as expired this many seconds early.
pub const EXPIRY_SKEW_SECS: i64 = 60;

/// Password grant request against a token endpoint.
///
/// The password is redacted in Debug output.
#[derive(Clone)]
pub struct PasswordGrant {
    token_url: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for PasswordGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordGrant")
            .field("token_url", &self.token_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl PasswordGrant {
    /// Create a new password grant.
    pub fn new(
        token_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let grant = Self {
            token_url: token_url.into(),
            username: username.into(),
            password: password.into(),
        };
        if grant.username.is_empty() {
            return Err(Error::config("Username cannot be empty"));
        }
        if grant.password.is_empty() {
            return Err(Error::config("Password cannot be empty"));
        }
        Ok(grant)
    }

    /// The token endpoint.
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Exchange the username and password for an access token.
    ///
    /// Error responses from the token endpoint become `Auth` errors with the
    /// status and body preserved. Transport failures and timeouts keep their
    /// kind.
    #[instrument(skip(self, transport), fields(token_url = %self.token_url))]
    pub fn exchange(&self, transport: &Transport) -> Result<TokenInfo> {
        let request = RequestDescriptor::post_form(
            self.token_url.clone(),
            vec![
                ("grant_type".to_string(), "password".to_string()),
                ("username".to_string(), self.username.clone()),
                ("password".to_string(), self.password.clone()),
            ],
        );

        debug!("Authenticating with password grant");
        let response = transport.send(&request).map_err(|err| {
            warn!(error = %err, "Authentication failed");
            into_auth_error(err)
        })?;

        let token: TokenResponse = response.json().map_err(|err| {
            Error::with_source(
                ErrorKind::Auth,
                "Token response is not valid JSON",
                err,
            )
            .with_status(response.status)
        })?;

        let info = TokenInfo::from_response(token, Utc::now())?;
        debug!("Authentication successful, token obtained");
        Ok(info)
    }
}

fn into_auth_error(err: Error) -> Error {
    match err.kind {
        ErrorKind::Transport | ErrorKind::Timeout { .. } | ErrorKind::Config | ErrorKind::Auth => {
            err
        }
        _ => {
            let message = format!("Authentication failed: {}", err.envelope.message);
            Error {
                kind: ErrorKind::Auth,
                envelope: openf1_client::ErrorEnvelope {
                    message,
                    ..err.envelope.clone()
                },
                source: Some(Box::new(err)),
            }
        }
    }
}

/// Token endpoint response body.
///
/// Sensitive fields are redacted in Debug output.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// An access token and what is known about its lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scope: Option<String>,
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for TokenInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenInfo")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl TokenInfo {
    /// Wrap a caller-supplied token with unknown lifetime.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
            expires_in: None,
            expires_at: None,
            scope: None,
            refresh_token: None,
        }
    }

    /// Build from a token endpoint response received at `now`.
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Result<Self> {
        let access_token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::new(ErrorKind::Auth, "Token response missing access_token"))?;

        // An expires_in outside chrono's range leaves the expiry unknown.
        let expires_at = response
            .expires_in
            .and_then(ChronoDuration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime));

        Ok(Self {
            access_token,
            token_type: response.token_type.unwrap_or_else(|| "bearer".to_string()),
            expires_in: response.expires_in,
            expires_at,
            scope: response.scope,
            refresh_token: response.refresh_token,
        })
    }

    /// Returns true if the token expired, or expires within the skew window.
    /// Tokens without a known expiry never expire.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// [`is_expired`](Self::is_expired) against an explicit clock.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) => match at.checked_sub_signed(ChronoDuration::seconds(EXPIRY_SKEW_SECS)) {
                Some(deadline) => now >= deadline,
                None => true,
            },
            None => false,
        }
    }
}

/// A password-grant token that is re-exchanged once it expires.
///
/// Attach it to a [`Transport`] with
/// [`with_token_source`](Transport::with_token_source). Refreshes are
/// serialized, so concurrent requests trigger a single exchange.
pub struct PasswordTokenSource {
    grant: PasswordGrant,
    current: Mutex<TokenInfo>,
}

impl std::fmt::Debug for PasswordTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordTokenSource")
            .field("grant", &self.grant)
            .field("current", &self.token())
            .finish()
    }
}

impl PasswordTokenSource {
    /// Start from a token already obtained through `grant`.
    pub fn new(grant: PasswordGrant, token: TokenInfo) -> Self {
        Self {
            grant,
            current: Mutex::new(token),
        }
    }

    /// Exchange the credentials and wrap the resulting token.
    pub fn authenticate(grant: PasswordGrant, transport: &Transport) -> Result<Self> {
        let token = grant.exchange(transport)?;
        Ok(Self::new(grant, token))
    }

    /// A snapshot of the current token.
    pub fn token(&self) -> TokenInfo {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Returns true if the current token has not expired.
    pub fn is_valid(&self) -> bool {
        !self.token().is_expired()
    }

    /// Exchange the credentials again, whether or not the token expired.
    pub fn refresh(&self, transport: &Transport) -> Result<TokenInfo> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = self.grant.exchange(transport)?;
        Ok(current.clone())
    }
}

impl TokenSource for PasswordTokenSource {
    fn access_token(&self, transport: &Transport) -> Result<String> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if current.is_expired() {
            debug!(expires_at = ?current.expires_at, "Token expired, re-authenticating");
            *current = self.grant.exchange(transport)?;
        }
        Ok(current.access_token.clone())
    }
}

/// Resolve credentials into a bearer token.
///
/// Anonymous credentials yield `None`. A token is used as is. Username and
/// password are exchanged once against `token_url`.
pub fn authenticate(
    credentials: &Credentials,
    token_url: &str,
    transport: &Transport,
) -> Result<Option<TokenInfo>> {
    match credentials {
        Credentials::Anonymous => Ok(None),
        Credentials::Token(token) => Ok(Some(TokenInfo::bearer(token.clone()))),
        Credentials::Password { username, password } => {
            let grant = PasswordGrant::new(token_url, username.clone(), password.clone())?;
            grant.exchange(transport).map(Some)
        }
    }
}
