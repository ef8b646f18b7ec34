use openf1_client::Result;

use super::LATEST;
use crate::filter::{FilterValue, Filters, Literal};
use crate::models::Meeting;
use crate::resource::Resource;

impl Resource<Meeting> {
    pub fn by_key(&self, meeting_key: impl Into<Literal>) -> Result<Option<Meeting>> {
        self.first(&Filters::new().with("meeting_key", FilterValue::Equals(meeting_key.into())))
    }

    /// The current or most recent meeting.
    pub fn latest(&self) -> Result<Option<Meeting>> {
        self.by_key(LATEST)
    }

    /// Every meeting of a season.
    pub fn by_season(&self, year: i32) -> Result<Vec<Meeting>> {
        self.list(&Filters::new().with("year", year))
    }

    pub fn by_country(&self, country_name: &str) -> Result<Vec<Meeting>> {
        self.list(&Filters::new().with("country_name", country_name))
    }
}
