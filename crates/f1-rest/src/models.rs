//! Typed records returned by the OpenF1 endpoints.
//!
//! Records are permissive: every field the API may omit is an `Option`, and
//! fields this crate does not model are kept in `extra`. Timestamps are kept
//! as the ISO-8601 text the API sends; [`parse_timestamp`] converts them.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Parse an API timestamp.
///
/// Accepts RFC 3339 (`2023-09-16T13:03:35.292000+00:00`) and naive
/// timestamps, which are read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
}

macro_rules! timestamp_accessor {
    ($ty:ty, $field:ident, $method:ident) => {
        impl $ty {
            /// Parsed form of the record timestamp.
            pub fn $method(&self) -> Option<DateTime<FixedOffset>> {
                self.$field.as_deref().and_then(parse_timestamp)
            }
        }
    };
}

/// A gap in seconds, or a textual gap such as `"+1 LAP"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GapValue {
    Seconds(f64),
    Text(String),
}

impl GapValue {
    /// The gap in seconds, when numeric.
    pub fn as_seconds(&self) -> Option<f64> {
        match self {
            GapValue::Seconds(s) => Some(*s),
            GapValue::Text(_) => None,
        }
    }
}

/// A classified finishing position, or a status such as `"DNF"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Classification {
    Position(i64),
    Text(String),
}

fn bool_or_int<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Level(i64),
        Fractional(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Flag(b) => b,
        Raw::Level(n) => n != 0,
        Raw::Fractional(f) => f != 0.0,
    }))
}

/// A Grand Prix weekend or testing event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub meeting_key: i64,
    pub meeting_name: String,
    pub meeting_official_name: Option<String>,
    pub location: Option<String>,
    pub country_key: Option<i64>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub circuit_key: Option<i64>,
    pub circuit_short_name: Option<String>,
    pub date_start: Option<String>,
    pub gmt_offset: Option<String>,
    pub year: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One session within a meeting (practice, qualifying, sprint, race).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_key: i64,
    pub session_name: String,
    pub session_type: Option<String>,
    pub meeting_key: Option<i64>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub gmt_offset: Option<String>,
    pub country_key: Option<i64>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub location: Option<String>,
    pub circuit_key: Option<i64>,
    pub circuit_short_name: Option<String>,
    pub year: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    pub fn starts_at(&self) -> Option<DateTime<FixedOffset>> {
        self.date_start.as_deref().and_then(parse_timestamp)
    }

    pub fn ends_at(&self) -> Option<DateTime<FixedOffset>> {
        self.date_end.as_deref().and_then(parse_timestamp)
    }
}

/// A driver's entry for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_number: i64,
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub broadcast_name: Option<String>,
    pub full_name: Option<String>,
    pub name_acronym: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub team_name: Option<String>,
    /// Hex colour without the leading `#`.
    pub team_colour: Option<String>,
    pub headshot_url: Option<String>,
    pub country_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Car telemetry sample (about 3.7 Hz).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarData {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i64>,
    pub date: Option<String>,
    /// km/h
    pub speed: Option<i64>,
    pub rpm: Option<i64>,
    pub n_gear: Option<i64>,
    pub throttle: Option<i64>,
    pub brake: Option<i64>,
    /// 0-1 off, 8 eligible, 10-14 open.
    pub drs: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CarData {
    /// Returns true if DRS is open.
    pub fn drs_open(&self) -> bool {
        matches!(self.drs, Some(10..=14))
    }
}

/// Car position on the circuit (about 3.7 Hz).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i64>,
    pub date: Option<String>,
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub z: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Timing for one completed lap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i64>,
    pub lap_number: Option<i64>,
    pub date_start: Option<String>,
    /// Seconds.
    pub lap_duration: Option<f64>,
    pub duration_sector_1: Option<f64>,
    pub duration_sector_2: Option<f64>,
    pub duration_sector_3: Option<f64>,
    pub i1_speed: Option<i64>,
    pub i2_speed: Option<i64>,
    pub st_speed: Option<i64>,
    pub is_pit_out_lap: Option<bool>,
    pub segments_sector_1: Option<Vec<Option<i64>>>,
    pub segments_sector_2: Option<Vec<Option<i64>>>,
    pub segments_sector_3: Option<Vec<Option<i64>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Gap to the leader and to the car ahead (about every 4 s).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i64>,
    pub date: Option<String>,
    pub gap_to_leader: Option<GapValue>,
    pub interval: Option<GapValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A driver's track position at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i64>,
    pub date: Option<String>,
    pub position: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Pit lane visit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pit {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i64>,
    pub date: Option<String>,
    pub lap_number: Option<i64>,
    /// Seconds spent in the pit lane.
    pub pit_duration: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A run between pit stops on one set of tyres.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stint {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i64>,
    pub stint_number: Option<i64>,
    pub lap_start: Option<i64>,
    pub lap_end: Option<i64>,
    /// SOFT, MEDIUM, HARD, INTERMEDIATE or WET.
    pub compound: Option<String>,
    pub tyre_age_at_start: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A race control message: flags, safety car, incidents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceControl {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i64>,
    pub date: Option<String>,
    pub lap_number: Option<i64>,
    pub category: Option<String>,
    pub flag: Option<String>,
    pub scope: Option<String>,
    pub sector: Option<i64>,
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RaceControl {
    /// Returns true for safety car and virtual safety car messages.
    pub fn is_safety_car(&self) -> bool {
        self.message.as_deref().is_some_and(|m| {
            let upper = m.to_uppercase();
            upper.contains("SAFETY CAR") || upper.contains("VSC")
        })
    }
}

/// An overtake. `driver_number` is the overtaking driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overtake {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i64>,
    pub overtaken_driver_number: Option<i64>,
    pub date: Option<String>,
    pub lap_number: Option<i64>,
    pub position: Option<i64>,
    pub x: Option<i64>,
    pub y: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Weather and track conditions (about once a minute).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub date: Option<String>,
    /// Celsius.
    pub air_temperature: Option<f64>,
    /// Celsius.
    pub track_temperature: Option<f64>,
    pub humidity: Option<f64>,
    /// mbar
    pub pressure: Option<f64>,
    /// m/s
    pub wind_speed: Option<f64>,
    /// Degrees.
    pub wind_direction: Option<i64>,
    /// The API sends either a boolean or 0/1.
    #[serde(default, deserialize_with = "bool_or_int")]
    pub rainfall: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A team radio message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamRadio {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i64>,
    pub date: Option<String>,
    pub recording_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Final classification entry for a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i64>,
    pub position: Option<i64>,
    pub classified_position: Option<Classification>,
    pub status: Option<String>,
    pub points: Option<f64>,
    pub number_of_laps: Option<i64>,
    pub dnf: Option<bool>,
    pub dns: Option<bool>,
    pub dsq: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Grid slot at the start of a race or sprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartingGrid {
    pub session_key: Option<i64>,
    pub meeting_key: Option<i64>,
    pub driver_number: Option<i64>,
    pub position: Option<i64>,
    pub lap_duration: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

timestamp_accessor!(CarData, date, timestamp);
timestamp_accessor!(Location, date, timestamp);
timestamp_accessor!(Interval, date, timestamp);
timestamp_accessor!(Position, date, timestamp);
timestamp_accessor!(Pit, date, timestamp);
timestamp_accessor!(RaceControl, date, timestamp);
timestamp_accessor!(Overtake, date, timestamp);
timestamp_accessor!(Weather, date, timestamp);
timestamp_accessor!(TeamRadio, date, timestamp);
timestamp_accessor!(Lap, date_start, starts_at);
timestamp_accessor!(Meeting, date_start, starts_at);
