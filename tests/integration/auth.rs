//! Authentication through the client facade.

use mockito::Matcher;

use super::common::{config, fast_retry};
use openf1::{Credentials, Filters, OpenF1Client};

#[test]
fn test_password_grant_token_used_for_every_resource() {
    let mut server = mockito::Server::new();
    let token = server
        .mock("POST", "/token")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), "fan@example.com".into()),
            Matcher::UrlEncoded("password".into(), "s3cret".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"access_token": "live-token", "expires_in": 3600, "token_type": "bearer"}"#)
        .expect(1)
        .create();
    let laps = server
        .mock("GET", "/v1/laps")
        .match_header("authorization", "Bearer live-token")
        .with_status(200)
        .with_body("[]")
        .create();
    let radio = server
        .mock("GET", "/v1/team_radio")
        .match_header("authorization", "Bearer live-token")
        .with_status(200)
        .with_body("[]")
        .create();

    let client = OpenF1Client::new(
        config(&server)
            .with_credentials("fan@example.com", "s3cret")
            .build()
            .unwrap(),
    )
    .unwrap();

    client.laps().list(&Filters::new()).unwrap();
    client.team_radio().list(&Filters::new()).unwrap();

    token.assert();
    laps.assert();
    radio.assert();

    let info = client.token().unwrap();
    assert!(!info.is_expired());
}

#[test]
fn test_token_exchange_is_not_retried() {
    let mut server = mockito::Server::new();
    let token = server
        .mock("POST", "/token")
        .with_status(503)
        .expect(1)
        .create();

    let err = OpenF1Client::new(
        config(&server)
            .with_retry(fast_retry(3))
            .with_credentials("fan", "pw")
            .build()
            .unwrap(),
    )
    .unwrap_err();

    token.assert();
    assert!(err.is_auth_error());
    assert_eq!(err.status(), Some(503));
}

#[test]
fn test_token_response_without_access_token() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/token")
        .with_status(200)
        .with_body(r#"{"token_type": "bearer"}"#)
        .create();

    let err = OpenF1Client::new(
        config(&server)
            .with_credentials("fan", "pw")
            .build()
            .unwrap(),
    )
    .unwrap_err();
    assert!(err.is_auth_error());
}

#[test]
fn test_token_only_client_skips_exchange() {
    let mut server = mockito::Server::new();
    let token = server.mock("POST", "/token").expect(0).create();
    let data = server
        .mock("GET", "/v1/position")
        .match_header("authorization", "Bearer provided")
        .with_status(200)
        .with_body("[]")
        .create();

    let client =
        OpenF1Client::new(config(&server).with_access_token("provided").build().unwrap()).unwrap();
    client.position().list(&Filters::new()).unwrap();

    token.assert();
    data.assert();
}

#[test]
fn test_credentials_reject_partial_pairs() {
    assert!(Credentials::password("fan", "").is_err());
    assert!(Credentials::password("", "pw").is_err());
    assert!(Credentials::token("  ").is_err());

    let err = config(&mockito::Server::new())
        .with_username("fan")
        .build()
        .unwrap_err();
    assert!(err.is_config_error());
}
