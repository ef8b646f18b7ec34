use openf1_client::Result;

use super::session_filters;
use crate::filter::{FilterValue, Literal};
use crate::models::CarData;
use crate::resource::Resource;

impl Resource<CarData> {
    /// Samples at or above `min_speed` km/h.
    pub fn high_speed_moments(
        &self,
        session_key: impl Into<Literal>,
        driver_number: i64,
        min_speed: i64,
    ) -> Result<Vec<CarData>> {
        let filters = session_filters(session_key, Some(driver_number))
            .with("speed", FilterValue::compare([(">=", min_speed)]));
        self.list(&filters)
    }

    /// Samples with DRS open.
    pub fn drs_activations(
        &self,
        session_key: impl Into<Literal>,
        driver_number: i64,
    ) -> Result<Vec<CarData>> {
        let filters = session_filters(session_key, Some(driver_number))
            .with("drs", FilterValue::compare([(">=", 10)]));
        self.list(&filters)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::transport;
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_high_speed_moments_query() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/v1/car_data")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("session_key".into(), "9159".into()),
                Matcher::UrlEncoded("driver_number".into(), "55".into()),
                Matcher::UrlEncoded("speed>".into(), "315".into()),
            ]))
            .with_status(200)
            .with_body(r#"[{"speed": 317, "drs": 12, "n_gear": 8}]"#)
            .create();

        let car_data: Resource<CarData> = Resource::new(transport(&server), "car_data");
        let samples = car_data.high_speed_moments(9159, 55, 315).unwrap();
        mock.assert();
        assert_eq!(samples[0].speed, Some(317));
        assert!(samples[0].drs_open());
    }
}
