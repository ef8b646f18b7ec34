use openf1_client::Result;

use super::{session_filters, sort_by_key};
use crate::filter::{FilterValue, Literal};
use crate::models::StartingGrid;
use crate::resource::Resource;

impl Resource<StartingGrid> {
    pub fn pole_sitter(&self, session_key: impl Into<Literal>) -> Result<Option<StartingGrid>> {
        self.first(&session_filters(session_key, None).with("position", 1))
    }

    /// Grid slots one and two, in order.
    pub fn front_row(&self, session_key: impl Into<Literal>) -> Result<Vec<StartingGrid>> {
        let filters =
            session_filters(session_key, None).with("position", FilterValue::compare([("<=", 2)]));
        let mut grid = self.list(&filters)?;
        sort_by_key(&mut grid, |g| g.position);
        Ok(grid)
    }

    /// A driver's grid slot, if the driver started.
    pub fn driver_grid_position(
        &self,
        session_key: impl Into<Literal>,
        driver_number: i64,
    ) -> Result<Option<i64>> {
        Ok(self
            .first(&session_filters(session_key, Some(driver_number)))?
            .and_then(|entry| entry.position))
    }

    /// The whole grid ordered by slot.
    pub fn sorted_grid(&self, session_key: impl Into<Literal>) -> Result<Vec<StartingGrid>> {
        let mut grid = self.list(&session_filters(session_key, None))?;
        sort_by_key(&mut grid, |g| g.position);
        Ok(grid)
    }
}
