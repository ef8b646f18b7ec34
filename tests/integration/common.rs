use std::time::Duration;

use openf1::client::{BackoffStrategy, ClientConfigBuilder};
use openf1::{ClientConfig, OpenF1Client, RetryConfig};

/// Session used throughout the suites (2023 Singapore Grand Prix).
pub const SESSION_KEY: i64 = 9161;

/// Config pointed at a mock server, with no retries.
pub fn config(server: &mockito::Server) -> ClientConfigBuilder {
    ClientConfig::builder()
        .with_base_url(format!("{}/v1", server.url()))
        .with_token_url(format!("{}/token", server.url()))
        .without_retry()
}

/// Retries with a short constant delay so tests stay fast.
pub fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig::default()
        .with_max_retries(max_retries)
        .with_initial_delay(Duration::from_millis(10))
        .with_backoff(BackoffStrategy::Constant)
}

/// Anonymous client against a mock server.
pub fn client(server: &mockito::Server) -> OpenF1Client {
    OpenF1Client::new(config(server).build().expect("config should build"))
        .expect("client should build")
}

/// Client against the public API, for live tests.
pub fn live_client() -> OpenF1Client {
    openf1::init_logging("openf1_client=debug");
    OpenF1Client::new(ClientConfig::default()).expect("client should build")
}
