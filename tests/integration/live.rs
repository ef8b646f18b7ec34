//! Live tests against api.openf1.org. Historical data only, no credentials.

use super::common::{live_client, SESSION_KEY};
use openf1::{FilterBuilder, Filters};

#[test]
#[ignore]
fn test_live_meetings_for_season() {
    let client = live_client();
    let meetings = client
        .meetings()
        .by_season(2023)
        .expect("meetings should load");

    assert!(!meetings.is_empty(), "2023 should have meetings");
    assert!(meetings.iter().all(|m| m.year == Some(2023)));
}

#[test]
#[ignore]
fn test_live_fast_laps_with_comparison() {
    let client = live_client();
    let laps = client
        .laps()
        .list(
            &FilterBuilder::new()
                .eq("session_key", SESSION_KEY)
                .eq("driver_number", 55)
                .lt("lap_duration", 100.0)
                .build(),
        )
        .expect("laps should load");

    assert!(laps
        .iter()
        .all(|lap| lap.lap_duration.is_some_and(|d| d < 100.0)));
}

#[test]
#[ignore]
fn test_live_csv_matches_json_count() {
    let client = live_client();
    let filters = Filters::new().with("session_key", SESSION_KEY);

    let json_count = client.weather().count(&filters).expect("count");
    let rows = client
        .weather()
        .list_csv_parsed(&filters)
        .expect("csv rows");
    assert_eq!(json_count, rows.len());
}

#[test]
#[ignore]
fn test_live_podium() {
    let client = live_client();
    let podium = client.session_result().podium(SESSION_KEY).expect("podium");

    assert_eq!(podium.len(), 3);
    assert_eq!(podium[0].position, Some(1));
}
