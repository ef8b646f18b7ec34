use openf1_client::Result;

use super::{session_filters, sort_by_key};
use crate::filter::{FilterValue, Literal};
use crate::models::SessionResult;
use crate::resource::Resource;

impl Resource<SessionResult> {
    /// The top three, in finishing order.
    pub fn podium(&self, session_key: impl Into<Literal>) -> Result<Vec<SessionResult>> {
        let filters =
            session_filters(session_key, None).with("position", FilterValue::compare([("<=", 3)]));
        let mut results = self.list(&filters)?;
        sort_by_key(&mut results, |r| r.position);
        Ok(results)
    }

    pub fn winner(&self, session_key: impl Into<Literal>) -> Result<Option<SessionResult>> {
        self.first(&session_filters(session_key, None).with("position", 1))
    }

    /// Drivers who scored points.
    pub fn points_finishers(&self, session_key: impl Into<Literal>) -> Result<Vec<SessionResult>> {
        let filters =
            session_filters(session_key, None).with("points", FilterValue::compare([(">", 0)]));
        self.list(&filters)
    }
}
