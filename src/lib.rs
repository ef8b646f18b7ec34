//! # openf1
//!
//! A typed, blocking Rust client for the [OpenF1](https://openf1.org) Formula 1
//! data API.
//!
//! The client handles filters with comparison operators, retries with
//! backoff, optional OAuth2 authentication and decoding into typed records.
//!
//! ## Security
//!
//! - Tokens and passwords are redacted in Debug output
//! - Tracing spans skip credentials and redact sensitive query values
//! - Error bodies are sanitized and truncated before they are stored
//!
//! ## Crates
//!
//! - **openf1-client** - Configuration, error taxonomy, retrying transport
//! - **openf1-auth** - Credentials and the OAuth2 password grant
//! - **openf1-rest** - Filters, typed records, endpoint accessors and the client facade
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use openf1::{ClientConfig, FilterBuilder, OpenF1Client};
//!
//! fn main() -> Result<(), openf1::Error> {
//!     openf1::init_logging("openf1=info");
//!
//!     let client = OpenF1Client::new(ClientConfig::default())?;
//!
//!     let laps = client.laps().list(
//!         &FilterBuilder::new()
//!             .eq("session_key", 9161)
//!             .eq("driver_number", 63)
//!             .lt("lap_duration", 95.0)
//!             .build(),
//!     )?;
//!
//!     for lap in laps {
//!         println!("lap {:?}: {:?}s", lap.lap_number, lap.lap_duration);
//!     }
//!
//!     Ok(())
//! }
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "auth")]
pub use openf1_auth as auth;
#[cfg(feature = "client")]
pub use openf1_client as client;
#[cfg(feature = "rest")]
pub use openf1_rest as rest;

#[cfg(feature = "auth")]
pub use openf1_auth::{Credentials, TokenInfo};
#[cfg(feature = "client")]
pub use openf1_client::{ClientConfig, Error, ErrorKind, Result, RetryConfig, Timeout};
#[cfg(feature = "rest")]
pub use openf1_rest::{FilterBuilder, FilterValue, Filters, OpenF1Client};

/// Install a global `tracing` subscriber that writes to stderr.
///
/// `RUST_LOG` takes precedence over `default_directive` (for example
/// `"openf1_client=debug"`). Returns false if a global subscriber was
/// already installed.
pub fn init_logging(default_directive: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
