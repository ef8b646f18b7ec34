use openf1_client::Result;

use super::session_filters;
use crate::filter::Literal;
use crate::models::RaceControl;
use crate::resource::Resource;

impl Resource<RaceControl> {
    /// Flag messages, optionally of one flag type.
    pub fn flags(&self, session_key: impl Into<Literal>, flag: Option<&str>) -> Result<Vec<RaceControl>> {
        let messages = self.list(&session_filters(session_key, None).with("flag", flag))?;
        Ok(messages.into_iter().filter(|m| m.flag.is_some()).collect())
    }

    /// Safety car and virtual safety car messages.
    pub fn safety_car_events(&self, session_key: impl Into<Literal>) -> Result<Vec<RaceControl>> {
        let messages = self.list(&session_filters(session_key, None))?;
        Ok(messages.into_iter().filter(RaceControl::is_safety_car).collect())
    }

    /// Messages concerning one driver.
    pub fn driver_incidents(
        &self,
        session_key: impl Into<Literal>,
        driver_number: i64,
    ) -> Result<Vec<RaceControl>> {
        self.list(&session_filters(session_key, Some(driver_number)))
    }
}
