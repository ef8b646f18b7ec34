use openf1_client::Result;

use super::session_filters;
use crate::filter::Literal;
use crate::models::TeamRadio;
use crate::resource::Resource;

impl Resource<TeamRadio> {
    pub fn driver_radio(
        &self,
        session_key: impl Into<Literal>,
        driver_number: i64,
    ) -> Result<Vec<TeamRadio>> {
        self.list(&session_filters(session_key, Some(driver_number)))
    }

    /// Recording URLs, skipping messages without one.
    pub fn radio_urls(
        &self,
        session_key: impl Into<Literal>,
        driver_number: Option<i64>,
    ) -> Result<Vec<String>> {
        Ok(self
            .list(&session_filters(session_key, driver_number))?
            .into_iter()
            .filter_map(|r| r.recording_url.filter(|url| !url.is_empty()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::transport;
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_radio_urls() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/v1/team_radio")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"[
                    {"driver_number": 11, "recording_url": "https://livetiming.formula1.com/a.mp3"},
                    {"driver_number": 11, "recording_url": ""},
                    {"driver_number": 11}
                ]"#,
            )
            .create();

        let radio: Resource<TeamRadio> = Resource::new(transport(&server), "team_radio");
        assert_eq!(
            radio.radio_urls(9158, Some(11)).unwrap(),
            vec!["https://livetiming.formula1.com/a.mp3"]
        );
    }
}
