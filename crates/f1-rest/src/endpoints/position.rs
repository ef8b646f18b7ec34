use openf1_client::Result;

use super::session_filters;
use crate::filter::Literal;
use crate::models::Position;
use crate::resource::Resource;

impl Resource<Position> {
    pub fn driver_positions(
        &self,
        session_key: impl Into<Literal>,
        driver_number: i64,
    ) -> Result<Vec<Position>> {
        self.list(&session_filters(session_key, Some(driver_number)))
    }

    /// Every record of a driver holding `position`.
    pub fn holders_of(&self, session_key: impl Into<Literal>, position: i64) -> Result<Vec<Position>> {
        self.list(&session_filters(session_key, None).with("position", position))
    }

    /// Every record of a driver leading the session.
    pub fn leaders(&self, session_key: impl Into<Literal>) -> Result<Vec<Position>> {
        self.holders_of(session_key, 1)
    }
}
