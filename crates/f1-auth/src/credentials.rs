//! Credential configuration.
//!
//! `Credentials` implements a custom Debug to redact sensitive data.

use openf1_client::{ClientConfig, Error, Result};

/// Environment variable holding a bearer token.
pub const ENV_ACCESS_TOKEN: &str = "OPENF1_ACCESS_TOKEN";
/// Environment variable holding the password-grant username.
pub const ENV_USERNAME: &str = "OPENF1_USERNAME";
/// Environment variable holding the password-grant password.
pub const ENV_PASSWORD: &str = "OPENF1_PASSWORD";

/// How the client authenticates.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication. The OpenF1 historical API is public.
    #[default]
    Anonymous,
    /// A caller-supplied bearer token.
    Token(String),
    /// Username and password for the OAuth2 password grant.
    Password { username: String, password: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Anonymous => f.write_str("Anonymous"),
            Credentials::Token(_) => f.debug_tuple("Token").field(&"[REDACTED]").finish(),
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

impl Credentials {
    /// Bearer token credentials.
    pub fn token(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::config("Access token cannot be empty"));
        }
        Ok(Credentials::Token(token))
    }

    /// Password-grant credentials.
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(Error::config("Username cannot be empty"));
        }
        if password.is_empty() {
            return Err(Error::config("Password cannot be empty"));
        }
        Ok(Credentials::Password { username, password })
    }

    /// Combine optional parts: a token, or a username with a password, or
    /// nothing.
    pub fn from_parts(
        token: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self> {
        match (token, username, password) {
            (None, None, None) => Ok(Credentials::Anonymous),
            (Some(t), None, None) => Self::token(t),
            (None, Some(u), Some(p)) => Self::password(u, p),
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(Error::config(
                "Provide either an access token or username/password, not both",
            )),
            _ => Err(Error::config(
                "Both username and password must be provided together, or neither",
            )),
        }
    }

    /// Credentials carried by a client configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::from_parts(config.access_token(), config.username(), config.password())
    }

    /// Load credentials from environment variables.
    ///
    /// Reads `OPENF1_ACCESS_TOKEN`, or `OPENF1_USERNAME` with
    /// `OPENF1_PASSWORD`. No variables means anonymous access.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup(ENV_ACCESS_TOKEN);
        let username = lookup(ENV_USERNAME);
        let password = lookup(ENV_PASSWORD);
        Self::from_parts(token.as_deref(), username.as_deref(), password.as_deref())
    }

    /// Returns true if no authentication is configured.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Credentials::Anonymous)
    }

    /// Returns true if a token exchange is needed before the first request.
    pub fn requires_exchange(&self) -> bool {
        matches!(self, Credentials::Password { .. })
    }
}
