use openf1_client::Result;

use super::session_filters;
use crate::filter::{FilterValue, Literal};
use crate::models::Location;
use crate::resource::Resource;

impl Resource<Location> {
    /// Positions strictly between `start_time` and `end_time`.
    pub fn track_positions(
        &self,
        session_key: impl Into<Literal>,
        driver_number: i64,
        start_time: impl Into<Literal>,
        end_time: impl Into<Literal>,
    ) -> Result<Vec<Location>> {
        let window: [(&str, Literal); 2] = [(">", start_time.into()), ("<", end_time.into())];
        let filters = session_filters(session_key, Some(driver_number))
            .with("date", FilterValue::compare(window));
        self.list(&filters)
    }
}
