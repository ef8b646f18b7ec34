//! Error classification and retry behavior through the full client.

use std::time::Duration;

use mockito::Matcher;

use super::common::{client, config, fast_retry};
use openf1::{ClientConfig, ErrorKind, Filters, OpenF1Client};

fn retrying_client(server: &mockito::Server, retries: u32) -> OpenF1Client {
    OpenF1Client::new(config(server).with_retry(fast_retry(retries)).build().unwrap()).unwrap()
}

#[test]
fn test_server_error_then_success_is_retried() {
    let mut server = mockito::Server::new();
    let failing = server
        .mock("GET", "/v1/pit")
        .with_status(503)
        .with_body("upstream unavailable")
        .expect(1)
        .create();
    let ok = server
        .mock("GET", "/v1/pit")
        .with_status(200)
        .with_body(r#"[{"driver_number": 44, "pit_duration": 22.4}]"#)
        .expect(1)
        .create();

    let stops = retrying_client(&server, 2)
        .pit()
        .list(&Filters::new())
        .unwrap();

    failing.assert();
    ok.assert();
    assert_eq!(stops[0].pit_duration, Some(22.4));
}

#[test]
fn test_rate_limit_is_retried() {
    let mut server = mockito::Server::new();
    let limited = server
        .mock("GET", "/v1/intervals")
        .with_status(429)
        .with_header("retry-after", "0")
        .expect(1)
        .create();
    let ok = server
        .mock("GET", "/v1/intervals")
        .with_status(200)
        .with_body(r#"[{"driver_number": 1, "interval": "+1 LAP"}]"#)
        .expect(1)
        .create();

    let intervals = retrying_client(&server, 1)
        .intervals()
        .list(&Filters::new())
        .unwrap();

    limited.assert();
    ok.assert();
    assert_eq!(intervals[0].interval.as_ref().and_then(|g| g.as_seconds()), None);
}

#[test]
fn test_oversized_retry_after_is_capped() {
    let mut server = mockito::Server::new();
    let limited = server
        .mock("GET", "/v1/stints")
        .with_status(429)
        .with_header("retry-after", "99999999999999999999999")
        .expect(1)
        .create();
    let ok = server
        .mock("GET", "/v1/stints")
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create();

    let retry = fast_retry(1).with_max_retry_after(Duration::from_millis(20));
    let client = OpenF1Client::new(config(&server).with_retry(retry).build().unwrap()).unwrap();

    assert!(client.stints().list(&Filters::new()).unwrap().is_empty());
    limited.assert();
    ok.assert();
}

#[test]
fn test_unbounded_retry_after_without_retries() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/v1/weather")
        .with_status(429)
        .with_header("retry-after", "1e30")
        .create();

    let err = client(&server).weather().list(&Filters::new()).unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(err.retry_after(), Some(Duration::MAX));
}

#[test]
fn test_exhausted_retries_surface_last_error() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/laps")
        .with_status(500)
        .with_body(r#"{"detail": "boom"}"#)
        .expect(3)
        .create();

    let err = retrying_client(&server, 2)
        .laps()
        .list(&Filters::new())
        .unwrap_err();

    mock.assert();
    assert_eq!(err.kind, ErrorKind::Server);
    assert_eq!(err.status(), Some(500));
    assert!(err.envelope.body.as_deref().unwrap_or_default().contains("boom"));
}

#[test]
fn test_not_found_is_not_retried() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/overtakes")
        .with_status(404)
        .with_body(r#"{"detail": "Not Found"}"#)
        .expect(1)
        .create();

    let err = retrying_client(&server, 3)
        .overtakes()
        .list(&Filters::new())
        .unwrap_err();

    mock.assert();
    assert!(err.is_not_found());
    assert!(!err.is_retryable());
}

#[test]
fn test_forbidden_maps_to_auth() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/v1/team_radio")
        .with_status(403)
        .with_body("real-time data requires a subscription")
        .create();

    let err = client(&server)
        .team_radio()
        .list(&Filters::new())
        .unwrap_err();
    assert!(err.is_auth_error());
    assert_eq!(err.status(), Some(403));
}

#[test]
fn test_other_client_error_maps_to_api() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/v1/location")
        .with_status(422)
        .with_body(r#"{"detail": "bad filter"}"#)
        .create();

    let err = client(&server)
        .location()
        .list(&Filters::new())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Api);
    assert_eq!(err.status(), Some(422));
}

#[test]
fn test_object_body_is_validation_error() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/v1/meetings")
        .with_status(200)
        .with_body(r#"{"detail": "not a list"}"#)
        .create();

    let err = client(&server)
        .meetings()
        .list(&Filters::new())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Validation { index: None, .. }));
    assert_eq!(err.status(), Some(200));
}

#[test]
fn test_bad_element_reports_index() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/v1/sessions")
        .with_status(200)
        .with_body(
            r#"[{"session_key": 1, "session_name": "Race"}, {"session_name": "Sprint"}]"#,
        )
        .create();

    let err = client(&server)
        .sessions()
        .list(&Filters::new())
        .unwrap_err();
    match err.kind {
        ErrorKind::Validation { index, ref field } => {
            assert_eq!(index, Some(1));
            assert_eq!(field.as_deref(), Some("session_key"));
        }
        ref other => panic!("unexpected kind: {other:?}"),
    }
}

#[test]
fn test_malformed_json_is_validation_error() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/v1/stints")
        .with_status(200)
        .with_body("[{\"stint_number\": ")
        .create();

    let err = client(&server).stints().list(&Filters::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Validation { .. }));
}

#[test]
fn test_connection_refused_is_transport_error() {
    let client = OpenF1Client::new(
        ClientConfig::builder()
            .with_base_url("http://127.0.0.1:1/v1")
            .without_retry()
            .build()
            .unwrap(),
    )
    .unwrap();

    let err = client.weather().list(&Filters::new()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transport);
    assert!(err.is_retryable());
}

#[test]
fn test_invalid_config_is_rejected_before_network() {
    let err = ClientConfig::builder()
        .with_base_url("not a url")
        .build()
        .unwrap_err();
    assert!(err.is_config_error());

    let mut server = mockito::Server::new();
    let mock = server.mock("GET", Matcher::Any).expect(0).create();
    let err = ClientConfig::builder()
        .with_base_url(format!("{}/v1", server.url()))
        .with_timeout(std::time::Duration::ZERO)
        .build()
        .unwrap_err();
    assert!(err.is_config_error());
    mock.assert();
}
