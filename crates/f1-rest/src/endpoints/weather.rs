use openf1_client::Result;

use super::session_filters;
use crate::filter::Literal;
use crate::models::Weather;
use crate::resource::Resource;

/// Hottest and coldest readings by track temperature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemperatureExtremes {
    pub hottest: Option<Weather>,
    pub coldest: Option<Weather>,
}

impl Resource<Weather> {
    /// The most recent reading of a session.
    pub fn latest(&self, session_key: impl Into<Literal>) -> Result<Option<Weather>> {
        Ok(self.list(&session_filters(session_key, None))?.pop())
    }

    /// Readings taken while it was raining.
    pub fn rain_periods(&self, session_key: impl Into<Literal>) -> Result<Vec<Weather>> {
        self.list(&session_filters(session_key, None).with("rainfall", true))
    }

    /// Readings with the highest and lowest track temperature.
    pub fn temperature_extremes(
        &self,
        session_key: impl Into<Literal>,
    ) -> Result<TemperatureExtremes> {
        let readings: Vec<(f64, Weather)> = self
            .list(&session_filters(session_key, None))?
            .into_iter()
            .filter_map(|w| w.track_temperature.filter(|t| t.is_finite()).map(|t| (t, w)))
            .collect();

        let hottest = readings
            .iter()
            .max_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, w)| w.clone());
        let coldest = readings
            .iter()
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, w)| w.clone());

        Ok(TemperatureExtremes { hottest, coldest })
    }
}
