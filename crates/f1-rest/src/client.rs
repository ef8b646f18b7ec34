//! OpenF1 client facade.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use openf1_auth::{Credentials, PasswordGrant, PasswordTokenSource, TokenInfo};
use openf1_client::{ClientConfig, Error, HttpBackend, ReqwestBackend, Result, Transport};

use crate::endpoints::{
    CarDataResource, DriversResource, IntervalsResource, LapsResource, LocationResource,
    MeetingsResource, OvertakesResource, PitResource, PositionResource, RaceControlResource,
    SessionResultResource, SessionsResource, StartingGridResource, StintsResource,
    TeamRadioResource, WeatherResource,
};
use crate::resource::Resource;

/// Blocking client for the OpenF1 API.
///
/// Construction validates the configuration and, for username/password
/// credentials, exchanges them for a bearer token. That token is exchanged
/// again before any request made after it expires. Every endpoint is
/// available through an accessor sharing one [`Transport`].
///
/// # Example
///
/// ```rust,no_run
/// use openf1_rest::{FilterBuilder, OpenF1Client};
/// use openf1_client::ClientConfig;
///
/// fn main() -> Result<(), openf1_client::Error> {
///     let client = OpenF1Client::new(ClientConfig::default())?;
///
///     let laps = client.laps().list(
///         &FilterBuilder::new()
///             .eq("session_key", 9161)
///             .eq("driver_number", 63)
///             .build(),
///     )?;
///     println!("{} laps", laps.len());
///
///     if let Some(lap) = client.laps().fastest_lap(9161, None)? {
///         println!("fastest: {:?}", lap.lap_duration);
///     }
///
///     client.close();
///     Ok(())
/// }
/// ```
pub struct OpenF1Client {
    config: ClientConfig,
    transport: Arc<Transport>,
    session: Session,
    car_data: CarDataResource,
    drivers: DriversResource,
    intervals: IntervalsResource,
    laps: LapsResource,
    location: LocationResource,
    meetings: MeetingsResource,
    overtakes: OvertakesResource,
    pit: PitResource,
    position: PositionResource,
    race_control: RaceControlResource,
    sessions: SessionsResource,
    session_result: SessionResultResource,
    starting_grid: StartingGridResource,
    stints: StintsResource,
    team_radio: TeamRadioResource,
    weather: WeatherResource,
}

/// How requests are authorized.
enum Session {
    Anonymous,
    Token(TokenInfo),
    Password(Arc<PasswordTokenSource>),
}

impl std::fmt::Debug for OpenF1Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenF1Client")
            .field("base_url", &self.config.base_url)
            .field("authenticated", &self.is_authenticated())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl OpenF1Client {
    /// Create a client over reqwest.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let backend = ReqwestBackend::new(&config)?;
        Self::with_backend(config, Arc::new(backend))
    }

    /// Create a client with credentials from `OPENF1_ACCESS_TOKEN`, or
    /// `OPENF1_USERNAME` and `OPENF1_PASSWORD`, on top of the defaults.
    pub fn from_env() -> Result<Self> {
        let builder = match Credentials::from_env()? {
            Credentials::Anonymous => ClientConfig::builder(),
            Credentials::Token(token) => ClientConfig::builder().with_access_token(token),
            Credentials::Password { username, password } => {
                ClientConfig::builder().with_credentials(username, password)
            }
        };
        Self::new(builder.build()?)
    }

    /// Create a client over a custom HTTP backend.
    #[instrument(skip(config, backend), fields(base_url = %config.base_url))]
    pub fn with_backend(config: ClientConfig, backend: Arc<dyn HttpBackend>) -> Result<Self> {
        let credentials = Credentials::from_config(&config)?;
        let mut transport = Transport::with_backend(&config, backend)?;

        let session = match credentials {
            Credentials::Anonymous => Session::Anonymous,
            Credentials::Token(token) => {
                transport = transport.with_bearer_token(token.clone());
                Session::Token(TokenInfo::bearer(token))
            }
            Credentials::Password { username, password } => {
                let grant = PasswordGrant::new(&config.token_url, username, password)?;
                let source = Arc::new(PasswordTokenSource::authenticate(grant, &transport)?);
                transport = transport.with_token_source(source.clone());
                Session::Password(source)
            }
        };
        let transport = Arc::new(transport);

        debug!(
            authenticated = !matches!(session, Session::Anonymous),
            "OpenF1 client ready"
        );

        Ok(Self {
            car_data: endpoint(&transport, &config, "car_data"),
            drivers: endpoint(&transport, &config, "drivers"),
            intervals: endpoint(&transport, &config, "intervals"),
            laps: endpoint(&transport, &config, "laps"),
            location: endpoint(&transport, &config, "location"),
            meetings: endpoint(&transport, &config, "meetings"),
            overtakes: endpoint(&transport, &config, "overtakes"),
            pit: endpoint(&transport, &config, "pit"),
            position: endpoint(&transport, &config, "position"),
            race_control: endpoint(&transport, &config, "race_control"),
            sessions: endpoint(&transport, &config, "sessions"),
            session_result: endpoint(&transport, &config, "session_result"),
            starting_grid: endpoint(&transport, &config, "starting_grid"),
            stints: endpoint(&transport, &config, "stints"),
            team_radio: endpoint(&transport, &config, "team_radio"),
            weather: endpoint(&transport, &config, "weather"),
            config,
            transport,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The shared transport.
    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// Returns true if a token is held and has not expired.
    ///
    /// A password client whose token expired reports false until the next
    /// request or [`authenticate`](Self::authenticate) renews it.
    pub fn is_authenticated(&self) -> bool {
        match &self.session {
            Session::Anonymous => false,
            Session::Token(token) => !token.is_expired(),
            Session::Password(source) => source.is_valid(),
        }
    }

    /// Exchange the configured username and password for a fresh token now.
    ///
    /// A supplied access token is kept as is. Fails with a `Config` error if
    /// no credentials are configured.
    pub fn authenticate(&self) -> Result<()> {
        match &self.session {
            Session::Anonymous => Err(Error::config("No credentials configured")),
            Session::Token(_) => Ok(()),
            Session::Password(source) => source.refresh(&self.transport).map(|_| ()),
        }
    }

    /// A snapshot of the token in use, if any.
    pub fn token(&self) -> Option<TokenInfo> {
        match &self.session {
            Session::Anonymous => None,
            Session::Token(token) => Some(token.clone()),
            Session::Password(source) => Some(source.token()),
        }
    }

    /// Release pooled connections. Later requests fail with a `Config`
    /// error. Calling this more than once is a no-op.
    pub fn close(&self) {
        self.transport.close();
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }

    /// High-frequency car telemetry.
    pub fn car_data(&self) -> &CarDataResource {
        &self.car_data
    }

    pub fn drivers(&self) -> &DriversResource {
        &self.drivers
    }

    /// Gaps to the leader and the car ahead.
    pub fn intervals(&self) -> &IntervalsResource {
        &self.intervals
    }

    pub fn laps(&self) -> &LapsResource {
        &self.laps
    }

    /// Car coordinates on track.
    pub fn location(&self) -> &LocationResource {
        &self.location
    }

    pub fn meetings(&self) -> &MeetingsResource {
        &self.meetings
    }

    pub fn overtakes(&self) -> &OvertakesResource {
        &self.overtakes
    }

    pub fn pit(&self) -> &PitResource {
        &self.pit
    }

    pub fn position(&self) -> &PositionResource {
        &self.position
    }

    pub fn race_control(&self) -> &RaceControlResource {
        &self.race_control
    }

    pub fn sessions(&self) -> &SessionsResource {
        &self.sessions
    }

    pub fn session_result(&self) -> &SessionResultResource {
        &self.session_result
    }

    pub fn starting_grid(&self) -> &StartingGridResource {
        &self.starting_grid
    }

    pub fn stints(&self) -> &StintsResource {
        &self.stints
    }

    pub fn team_radio(&self) -> &TeamRadioResource {
        &self.team_radio
    }

    pub fn weather(&self) -> &WeatherResource {
        &self.weather
    }
}

fn endpoint<T: DeserializeOwned>(
    transport: &Arc<Transport>,
    config: &ClientConfig,
    path: &str,
) -> Resource<T> {
    Resource::new(Arc::clone(transport), path).with_default_format(config.default_format)
}

impl Drop for OpenF1Client {
    fn drop(&mut self) {
        self.transport.close();
    }
}
