//! Integration test suite.
//!
//! The mock-server suites run by default:
//!   cargo test --test integration
//!
//! The live suite talks to api.openf1.org and is ignored unless asked for:
//!   cargo test --test integration -- --ignored --nocapture

#[path = "integration/common.rs"]
mod common;
#[path = "integration/auth.rs"]
mod auth;
#[path = "integration/errors.rs"]
mod errors;
#[path = "integration/live.rs"]
mod live;
#[path = "integration/resources.rs"]
mod resources;
