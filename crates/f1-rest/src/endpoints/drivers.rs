use openf1_client::Result;

use super::session_filters;
use crate::filter::Literal;
use crate::models::Driver;
use crate::resource::Resource;

impl Resource<Driver> {
    pub fn by_number(
        &self,
        session_key: impl Into<Literal>,
        driver_number: i64,
    ) -> Result<Option<Driver>> {
        self.first(&session_filters(session_key, Some(driver_number)))
    }

    /// Look up a driver by three-letter acronym. The acronym is upper-cased.
    pub fn by_acronym(
        &self,
        session_key: impl Into<Literal>,
        name_acronym: &str,
    ) -> Result<Option<Driver>> {
        let filters =
            session_filters(session_key, None).with("name_acronym", name_acronym.to_uppercase());
        self.first(&filters)
    }

    pub fn by_team(&self, session_key: impl Into<Literal>, team_name: &str) -> Result<Vec<Driver>> {
        self.list(&session_filters(session_key, None).with("team_name", team_name))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::transport;
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_by_acronym() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/v1/drivers")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("session_key".into(), "9158".into()),
                Matcher::UrlEncoded("name_acronym".into(), "VER".into()),
            ]))
            .with_status(200)
            .with_body(r#"[{"driver_number": 1, "name_acronym": "VER", "team_name": "Red Bull Racing"}]"#)
            .create();

        let drivers: Resource<Driver> = Resource::new(transport(&server), "drivers");
        let driver = drivers.by_acronym(9158, "ver").unwrap().unwrap();
        mock.assert();
        assert_eq!(driver.driver_number, 1);
        assert_eq!(driver.team_name.as_deref(), Some("Red Bull Racing"));
    }
}
