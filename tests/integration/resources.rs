//! Resource accessors end to end: filters on the wire, decoding, CSV.

use mockito::Matcher;
use serde_json::json;

use super::common::{client, config, SESSION_KEY};
use openf1::client::ResponseFormat;
use openf1::rest::{parse_csv, Payload};
use openf1::{FilterBuilder, FilterValue, Filters, OpenF1Client};

#[test]
fn test_comparison_filters_reach_the_wire() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/car_data")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("session_key".into(), "9161".into()),
            Matcher::UrlEncoded("driver_number".into(), "55".into()),
            Matcher::UrlEncoded("speed>".into(), "315".into()),
        ]))
        .with_status(200)
        .with_body(
            json!([
                {"session_key": 9161, "driver_number": 55, "speed": 318, "drs": 12, "date": "2023-09-17T13:31:02.395000+00:00"},
                {"session_key": 9161, "driver_number": 55, "speed": 321, "drs": 8}
            ])
            .to_string(),
        )
        .create();

    let client = client(&server);
    let samples = client
        .car_data()
        .list(
            &FilterBuilder::new()
                .eq("session_key", SESSION_KEY)
                .eq("driver_number", 55)
                .gte("speed", 315)
                .build(),
        )
        .unwrap();

    mock.assert();
    assert_eq!(samples.len(), 2);
    assert!(samples[0].drs_open());
    assert!(!samples[1].drs_open());
    assert!(samples[0].timestamp().is_some());
}

#[test]
fn test_exclusive_range_and_equality_mix() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/laps")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("session_key".into(), "9161".into()),
            Matcher::UrlEncoded("lap_duration<95.5".into(), "".into()),
            Matcher::UrlEncoded("lap_duration>90".into(), "".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"lap_number": 12, "lap_duration": 93.2}]"#)
        .create();

    let filters = Filters::new()
        .with("session_key", SESSION_KEY)
        .with(
            "lap_duration",
            FilterValue::compare([("<", 95.5), (">", 90.0)]),
        );

    let laps = client(&server).laps().list(&filters).unwrap();
    mock.assert();
    assert_eq!(laps[0].lap_number, Some(12));
}

#[test]
fn test_absent_values_are_omitted() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/drivers")
        .match_query(Matcher::Exact("session_key=9161".into()))
        .with_status(200)
        .with_body(r#"[{"driver_number": 1, "name_acronym": "VER"}]"#)
        .create();

    let team: Option<&str> = None;
    let filters = Filters::new()
        .with("session_key", SESSION_KEY)
        .with("team_name", team);

    let drivers = client(&server).drivers().list(&filters).unwrap();
    mock.assert();
    assert_eq!(drivers[0].name_acronym.as_deref(), Some("VER"));
}

#[test]
fn test_filters_from_json_match_builder() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/position")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("meeting_key".into(), "1217".into()),
            Matcher::UrlEncoded("position<".into(), "3".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .expect(2)
        .create();

    let from_json =
        Filters::from_json(&json!({"meeting_key": 1217, "position": {"<=": 3}})).unwrap();
    let built = FilterBuilder::new()
        .eq("meeting_key", 1217)
        .lte("position", 3)
        .build();

    let client = client(&server);
    client.position().list(&from_json).unwrap();
    client.position().list(&built).unwrap();
    mock.assert();
}

#[test]
fn test_invalid_filter_never_reaches_network() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", Matcher::Any).expect(0).create();

    let client = client(&server);
    let err = client
        .laps()
        .list(&Filters::new().with("lap number", 1))
        .unwrap_err();
    assert!(err.is_config_error());

    let err = client
        .laps()
        .list(&Filters::new().with("lap_number", FilterValue::compare([("~", 3)])))
        .unwrap_err();
    assert!(err.is_config_error());
    assert!(err.message().contains("'~'"));

    mock.assert();
}

#[test]
fn test_first_count_and_raw() {
    let mut server = mockito::Server::new();
    let body = json!([
        {"session_key": 9161, "driver_number": 1, "lap_number": 1, "compound": "MEDIUM", "stint_number": 1},
        {"session_key": 9161, "driver_number": 1, "lap_number": 20, "compound": "HARD", "stint_number": 2, "pit_window": "open"}
    ]);
    let mock = server
        .mock("GET", "/v1/stints")
        .match_query(Matcher::UrlEncoded("driver_number".into(), "1".into()))
        .with_status(200)
        .with_body(body.to_string())
        .expect(3)
        .create();

    let client = client(&server);
    let filters = Filters::new().with("driver_number", 1);

    let first = client.stints().first(&filters).unwrap().unwrap();
    assert_eq!(first.compound.as_deref(), Some("MEDIUM"));

    assert_eq!(client.stints().count(&filters).unwrap(), 2);

    let raw = client.stints().list_raw(&filters).unwrap();
    assert_eq!(raw[1]["pit_window"], "open");

    mock.assert();
}

#[test]
fn test_unknown_fields_are_kept() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/v1/weather")
        .with_status(200)
        .with_body(r#"[{"air_temperature": 30.1, "rainfall": 0, "visibility": "good"}]"#)
        .create();

    let weather = client(&server).weather().list(&Filters::new()).unwrap();
    assert_eq!(weather[0].rainfall, Some(false));
    assert_eq!(weather[0].extra["visibility"], "good");
}

#[test]
fn test_csv_text_and_parsed_rows() {
    let mut server = mockito::Server::new();
    let csv = "driver_number,lap_number,lap_duration\n1,1,98.5\n1,2,95.1\n";
    let mock = server
        .mock("GET", "/v1/laps")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("driver_number".into(), "1".into()),
            Matcher::UrlEncoded("csv".into(), "true".into()),
        ]))
        .match_header("accept", "text/csv")
        .with_status(200)
        .with_header("content-type", "text/csv")
        .with_body(csv)
        .expect(2)
        .create();

    let client = client(&server);
    let filters = Filters::new().with("driver_number", 1);

    let text = client.laps().list_csv(&filters).unwrap();
    assert_eq!(text, csv);
    assert_eq!(parse_csv(&text).unwrap().len(), 2);

    let rows = client.laps().list_csv_parsed(&filters).unwrap();
    assert_eq!(rows[1].get("lap_duration"), Some("95.1"));

    mock.assert();
}

#[test]
fn test_default_format_csv_from_config() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/meetings")
        .match_query(Matcher::UrlEncoded("csv".into(), "true".into()))
        .with_status(200)
        .with_body("meeting_key,meeting_name\n1219,Singapore Grand Prix\n")
        .create();

    let client = OpenF1Client::new(
        config(&server)
            .with_default_format(ResponseFormat::Csv)
            .build()
            .unwrap(),
    )
    .unwrap();

    match client.meetings().fetch(&Filters::new(), None).unwrap() {
        Payload::Csv(text) => assert!(text.contains("Singapore")),
        Payload::Json(_) => panic!("expected CSV payload"),
    }
    mock.assert();
}

#[test]
fn test_convenience_queries_compose_filters() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/laps")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("session_key".into(), "9161".into()),
            Matcher::UrlEncoded("driver_number".into(), "55".into()),
        ]))
        .with_status(200)
        .with_body(
            json!([
                {"lap_number": 1, "lap_duration": null},
                {"lap_number": 2, "lap_duration": 97.4},
                {"lap_number": 3, "lap_duration": 96.9}
            ])
            .to_string(),
        )
        .create();

    let fastest = client(&server)
        .laps()
        .fastest_lap(SESSION_KEY, Some(55))
        .unwrap()
        .unwrap();
    mock.assert();
    assert_eq!(fastest.lap_number, Some(3));
}

#[test]
fn test_latest_session_literal() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/sessions")
        .match_query(Matcher::Exact("session_key=latest".into()))
        .with_status(200)
        .with_body(r#"[{"session_key": 9999, "session_name": "Race", "date_start": "2024-03-02T15:00:00+00:00"}]"#)
        .create();

    let session = client(&server).sessions().latest().unwrap().unwrap();
    mock.assert();
    assert_eq!(session.session_key, 9999);
    assert!(session.starts_at().is_some());
}
