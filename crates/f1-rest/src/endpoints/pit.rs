use openf1_client::Result;

use super::{min_by_f64, session_filters};
use crate::filter::Literal;
use crate::models::Pit;
use crate::resource::Resource;

impl Resource<Pit> {
    pub fn driver_pit_stops(
        &self,
        session_key: impl Into<Literal>,
        driver_number: i64,
    ) -> Result<Vec<Pit>> {
        self.list(&session_filters(session_key, Some(driver_number)))
    }

    /// The shortest pit lane visit. Stops without a duration are ignored.
    pub fn fastest_pit_stop(
        &self,
        session_key: impl Into<Literal>,
        driver_number: Option<i64>,
    ) -> Result<Option<Pit>> {
        let stops = self.list(&session_filters(session_key, driver_number))?;
        Ok(min_by_f64(stops, |p| p.pit_duration))
    }

    pub fn count_pit_stops(&self, session_key: impl Into<Literal>, driver_number: i64) -> Result<usize> {
        Ok(self.driver_pit_stops(session_key, driver_number)?.len())
    }
}
