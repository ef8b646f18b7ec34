//! # openf1-client
//!
//! Core HTTP infrastructure for the OpenF1 API.
//!
//! This crate provides:
//! - Immutable client configuration with validation
//! - The error taxonomy shared by every OpenF1 crate
//! - Request descriptors and wire-level query encoding
//! - A retrying transport with exponential backoff and Retry-After support
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (openf1-rest: resources, filters, typed records)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Transport                             │
//! │  - Bearer token + default headers                           │
//! │  - Retry policy and status classification                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HttpBackend                            │
//! │  - One raw HTTP exchange (reqwest blocking by default)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use openf1_client::{ClientConfig, QueryParam, RequestDescriptor, Transport};
//!
//! fn main() -> Result<(), openf1_client::Error> {
//!     let config = ClientConfig::builder().with_max_retries(5).build()?;
//!     let transport = Transport::new(&config)?;
//!
//!     let request = RequestDescriptor::get("laps")
//!         .with_params(vec![QueryParam::new("session_key", "9161")]);
//!     let response = transport.send(&request)?;
//!     let laps: Vec<serde_json::Value> = response.json()?;
//!     println!("{} laps", laps.len());
//!
//!     transport.close();
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod request;
mod response;
mod retry;
pub mod security;
mod transport;

pub use config::{ClientConfig, ClientConfigBuilder, Timeout};
pub use error::{classify_status, status_message, Error, ErrorEnvelope, ErrorKind, Result};
pub use request::{QueryParam, RequestDescriptor, RequestMethod, ResponseFormat};
pub use response::{parse_retry_after, RawResponse};
pub use retry::{BackoffStrategy, RetryConfig, RetryPolicy};
pub use transport::{HttpBackend, HttpRequest, ReqwestBackend, TokenSource, Transport};

/// Default base URL of the OpenF1 data API.
pub const DEFAULT_BASE_URL: &str = "https://api.openf1.org/v1";

/// Default OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://api.openf1.org/token";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("openf1-rust/", env!("CARGO_PKG_VERSION"));
