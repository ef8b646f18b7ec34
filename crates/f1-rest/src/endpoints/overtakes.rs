use openf1_client::Result;

use super::session_filters;
use crate::filter::Literal;
use crate::models::Overtake;
use crate::resource::Resource;

impl Resource<Overtake> {
    /// Overtakes made by one driver.
    pub fn driver_overtakes(
        &self,
        session_key: impl Into<Literal>,
        driver_number: i64,
    ) -> Result<Vec<Overtake>> {
        self.list(&session_filters(session_key, Some(driver_number)))
    }

    pub fn count_overtakes(
        &self,
        session_key: impl Into<Literal>,
        driver_number: Option<i64>,
    ) -> Result<usize> {
        Ok(self.list(&session_filters(session_key, driver_number))?.len())
    }
}
