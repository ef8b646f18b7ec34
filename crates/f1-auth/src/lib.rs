//! # openf1-auth
//!
//! Authentication for the OpenF1 API.
//!
//! Historical data is public and needs no credentials. Real-time access
//! requires a bearer token, either supplied directly or obtained through the
//! OAuth2 password grant.
//!
//! ## Security
//!
//! - Tokens and passwords are redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Error bodies are sanitized before they are stored
//!
//! ## Example
//!
//! ```rust,no_run
//! use openf1_auth::{authenticate, Credentials};
//! use openf1_client::{ClientConfig, Transport};
//!
//! fn main() -> Result<(), openf1_client::Error> {
//!     let config = ClientConfig::default();
//!     let transport = Transport::new(&config)?;
//!
//!     let credentials = Credentials::from_env()?;
//!     if let Some(token) = authenticate(&credentials, &config.token_url, &transport)? {
//!         println!("token expires at {:?}", token.expires_at);
//!     }
//!     Ok(())
//! }
//! ```

mod credentials;
mod oauth;

pub use credentials::{Credentials, ENV_ACCESS_TOKEN, ENV_PASSWORD, ENV_USERNAME};
pub use oauth::{
    authenticate, PasswordGrant, PasswordTokenSource, TokenInfo, TokenResponse, EXPIRY_SKEW_SECS,
};

pub use openf1_client::{Error, ErrorKind, Result};
