use openf1_client::Result;

use super::{min_by_f64, session_filters};
use crate::filter::{FilterValue, Literal};
use crate::models::Lap;
use crate::resource::Resource;

impl Resource<Lap> {
    /// The lap with the shortest duration. Laps without a duration are
    /// ignored.
    pub fn fastest_lap(
        &self,
        session_key: impl Into<Literal>,
        driver_number: Option<i64>,
    ) -> Result<Option<Lap>> {
        let laps = self.list(&session_filters(session_key, driver_number))?;
        Ok(min_by_f64(laps, |lap| lap.lap_duration))
    }

    /// One lap of one driver.
    pub fn lap(
        &self,
        session_key: impl Into<Literal>,
        driver_number: i64,
        lap_number: i64,
    ) -> Result<Option<Lap>> {
        let filters =
            session_filters(session_key, Some(driver_number)).with("lap_number", lap_number);
        self.first(&filters)
    }

    /// Laps `start_lap..=end_lap` of one driver.
    pub fn lap_range(
        &self,
        session_key: impl Into<Literal>,
        driver_number: i64,
        start_lap: i64,
        end_lap: i64,
    ) -> Result<Vec<Lap>> {
        let filters = session_filters(session_key, Some(driver_number)).with(
            "lap_number",
            FilterValue::compare([(">=", start_lap), ("<=", end_lap)]),
        );
        self.list(&filters)
    }

    /// Laps that did not start from the pit lane.
    pub fn flying_laps(
        &self,
        session_key: impl Into<Literal>,
        driver_number: Option<i64>,
    ) -> Result<Vec<Lap>> {
        let filters = session_filters(session_key, driver_number).with("is_pit_out_lap", false);
        self.list(&filters)
    }
}
