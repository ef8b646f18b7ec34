use openf1_client::Result;

use super::{session_filters, LATEST};
use crate::filter::{FilterValue, Filters, Literal};
use crate::models::Session;
use crate::resource::Resource;

impl Resource<Session> {
    pub fn by_key(&self, session_key: impl Into<Literal>) -> Result<Option<Session>> {
        self.first(&session_filters(session_key, None))
    }

    /// The current or most recent session.
    pub fn latest(&self) -> Result<Option<Session>> {
        self.first(&session_filters(LATEST, None))
    }

    /// Every session of a meeting.
    pub fn for_meeting(&self, meeting_key: impl Into<Literal>) -> Result<Vec<Session>> {
        self.list(&Filters::new().with("meeting_key", FilterValue::Equals(meeting_key.into())))
    }

    /// Race sessions, optionally for one season.
    pub fn races(&self, year: Option<i32>) -> Result<Vec<Session>> {
        self.named("Race", year)
    }

    /// Qualifying sessions, optionally for one season.
    pub fn qualifying(&self, year: Option<i32>) -> Result<Vec<Session>> {
        self.named("Qualifying", year)
    }

    /// Practice sessions.
    ///
    /// With a practice number only `Practice N` is requested; otherwise every
    /// session whose name contains `Practice` is kept.
    pub fn practice(
        &self,
        meeting_key: impl Into<FilterValue>,
        practice_number: Option<u8>,
    ) -> Result<Vec<Session>> {
        let filters = Filters::new().with("meeting_key", meeting_key);
        match practice_number {
            Some(n) => self.list(&filters.with("session_name", format!("Practice {n}"))),
            None => Ok(self
                .list(&filters)?
                .into_iter()
                .filter(|s| s.session_name.contains("Practice"))
                .collect()),
        }
    }

    fn named(&self, session_name: &str, year: Option<i32>) -> Result<Vec<Session>> {
        let filters = Filters::new()
            .with("session_name", session_name)
            .with("year", year);
        self.list(&filters)
    }
}
