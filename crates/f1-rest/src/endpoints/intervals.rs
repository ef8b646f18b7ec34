use openf1_client::Result;

use super::session_filters;
use crate::filter::{FilterValue, Literal};
use crate::models::Interval;
use crate::resource::Resource;

impl Resource<Interval> {
    /// Samples where the gap to the car ahead is under `max_interval`
    /// seconds.
    pub fn close_battles(
        &self,
        session_key: impl Into<Literal>,
        max_interval: f64,
    ) -> Result<Vec<Interval>> {
        let filters = session_filters(session_key, None)
            .with("interval", FilterValue::compare([("<", max_interval)]));
        self.list(&filters)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::transport;
    use super::*;
    use crate::models::GapValue;
    use mockito::Matcher;

    #[test]
    fn test_close_battles() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/v1/intervals")
            .match_query(Matcher::Regex(r"interval(<|%3C)0\.5".into()))
            .with_status(200)
            .with_body(r#"[{"driver_number": 4, "interval": 0.312, "gap_to_leader": 5.125}]"#)
            .create();

        let intervals: Resource<Interval> = Resource::new(transport(&server), "intervals");
        let battles = intervals.close_battles(9165, 0.5).unwrap();
        mock.assert();
        assert_eq!(battles[0].interval, Some(GapValue::Seconds(0.312)));
    }
}
