//! Endpoint-specific conveniences.
//!
//! Each endpoint is a [`Resource`] over its record type. The helpers here
//! are thin reductions over `list` and `first`: they add filters or sort
//! and pick from the result, and fail only where `list` fails.

use crate::filter::{FilterValue, Filters, Literal};
use crate::models::{
    CarData, Driver, Interval, Lap, Location, Meeting, Overtake, Pit, Position, RaceControl,
    Session, SessionResult, StartingGrid, Stint, TeamRadio, Weather,
};
use crate::resource::Resource;

mod car_data;
mod drivers;
mod intervals;
mod laps;
mod location;
mod meetings;
mod overtakes;
mod pit;
mod position;
mod race_control;
mod session_result;
mod sessions;
mod starting_grid;
mod stints;
mod team_radio;
mod weather;

pub use weather::TemperatureExtremes;

pub type CarDataResource = Resource<CarData>;
pub type DriversResource = Resource<Driver>;
pub type IntervalsResource = Resource<Interval>;
pub type LapsResource = Resource<Lap>;
pub type LocationResource = Resource<Location>;
pub type MeetingsResource = Resource<Meeting>;
pub type OvertakesResource = Resource<Overtake>;
pub type PitResource = Resource<Pit>;
pub type PositionResource = Resource<Position>;
pub type RaceControlResource = Resource<RaceControl>;
pub type SessionsResource = Resource<Session>;
pub type SessionResultResource = Resource<SessionResult>;
pub type StartingGridResource = Resource<StartingGrid>;
pub type StintsResource = Resource<Stint>;
pub type TeamRadioResource = Resource<TeamRadio>;
pub type WeatherResource = Resource<Weather>;

/// Value of the `session_key` and `meeting_key` filters that selects the
/// current session or meeting.
pub const LATEST: &str = "latest";

/// Filters for one session and, optionally, one driver.
fn session_filters(session_key: impl Into<Literal>, driver_number: Option<i64>) -> Filters {
    Filters::new()
        .with("session_key", FilterValue::Equals(session_key.into()))
        .with("driver_number", driver_number)
}

/// Sort by an optional integer key, missing keys last.
fn sort_by_key<T>(records: &mut [T], key: impl Fn(&T) -> Option<i64>) {
    records.sort_by_key(|r| key(r).unwrap_or(i64::MAX));
}

/// The record with the smallest finite value of `key`.
fn min_by_f64<T>(records: Vec<T>, key: impl Fn(&T) -> Option<f64>) -> Option<T> {
    records
        .into_iter()
        .filter_map(|r| key(&r).filter(|v| v.is_finite()).map(|v| (v, r)))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, r)| r)
}
