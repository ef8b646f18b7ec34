use openf1_client::Result;

use super::{session_filters, sort_by_key};
use crate::filter::Literal;
use crate::models::Stint;
use crate::resource::Resource;

impl Resource<Stint> {
    /// A driver's stints ordered by stint number.
    pub fn driver_stints(
        &self,
        session_key: impl Into<Literal>,
        driver_number: i64,
    ) -> Result<Vec<Stint>> {
        let mut stints = self.list(&session_filters(session_key, Some(driver_number)))?;
        sort_by_key(&mut stints, |s| s.stint_number);
        Ok(stints)
    }

    /// Stints on one compound. The compound name is upper-cased.
    pub fn by_compound(&self, session_key: impl Into<Literal>, compound: &str) -> Result<Vec<Stint>> {
        let filters = session_filters(session_key, None).with("compound", compound.to_uppercase());
        self.list(&filters)
    }

    /// The sequence of compounds a driver used.
    pub fn tyre_strategy(
        &self,
        session_key: impl Into<Literal>,
        driver_number: i64,
    ) -> Result<Vec<String>> {
        Ok(self
            .driver_stints(session_key, driver_number)?
            .into_iter()
            .filter_map(|s| s.compound)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::transport;
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_tyre_strategy_is_ordered() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/v1/stints")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("session_key".into(), "9161".into()),
                Matcher::UrlEncoded("driver_number".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"[
                    {"stint_number": 3, "compound": "SOFT"},
                    {"stint_number": 1, "compound": "MEDIUM"},
                    {"stint_number": 2, "compound": null},
                    {"stint_number": 4, "compound": "HARD"}
                ]"#,
            )
            .create();

        let stints: Resource<Stint> = Resource::new(transport(&server), "stints");
        assert_eq!(
            stints.tyre_strategy(9161, 1).unwrap(),
            vec!["MEDIUM", "SOFT", "HARD"]
        );
    }

    #[test]
    fn test_by_compound_upper_cases() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/v1/stints")
            .match_query(Matcher::UrlEncoded("compound".into(), "SOFT".into()))
            .with_status(200)
            .with_body("[]")
            .create();

        let stints: Resource<Stint> = Resource::new(transport(&server), "stints");
        stints.by_compound(9161, "soft").unwrap();
        mock.assert();
    }
}
