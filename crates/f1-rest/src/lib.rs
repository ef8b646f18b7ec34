//! # openf1-rest
//!
//! Typed access to the OpenF1 REST data API.
//!
//! ## Features
//!
//! - **Filters** - Equality and comparison filters (`speed>=315`) built by
//!   hand, with [`FilterBuilder`], or from JSON
//! - **Resources** - `list`, `first`, `list_raw`, `list_csv`,
//!   `list_csv_parsed` and `count` on every endpoint
//! - **Records** - Typed models for all sixteen endpoints
//! - **Conveniences** - Fastest lap, tyre strategy, podium and friends
//!
//! ## Example
//!
//! ```rust,no_run
//! use openf1_rest::{FilterBuilder, Filters, OpenF1Client};
//! use openf1_client::ClientConfig;
//!
//! fn main() -> Result<(), openf1_rest::Error> {
//!     let client = OpenF1Client::new(ClientConfig::default())?;
//!
//!     // Car telemetry above 315 km/h
//!     let fast = client.car_data().list(
//!         &FilterBuilder::new()
//!             .eq("session_key", 9159)
//!             .eq("driver_number", 55)
//!             .gte("speed", 315)
//!             .build(),
//!     )?;
//!     println!("{} samples", fast.len());
//!
//!     // Raw CSV
//!     let csv = client
//!         .weather()
//!         .list_csv(&Filters::new().with("session_key", 9161))?;
//!     println!("{csv}");
//!
//!     // Tyre strategy
//!     let strategy = client.stints().tyre_strategy(9161, 1)?;
//!     println!("{}", strategy.join(" -> "));
//!
//!     Ok(())
//! }
//! ```

mod client;
mod endpoints;
mod filter;
mod filter_builder;
pub mod models;
mod resource;

pub use client::OpenF1Client;
pub use endpoints::{
    CarDataResource, DriversResource, IntervalsResource, LapsResource, LocationResource,
    MeetingsResource, OvertakesResource, PitResource, PositionResource, RaceControlResource,
    SessionResultResource, SessionsResource, StartingGridResource, StintsResource,
    TeamRadioResource, TemperatureExtremes, WeatherResource, LATEST,
};
pub use filter::{translate, FilterValue, Filters, Literal, Operator};
pub use filter_builder::FilterBuilder;
pub use models::{
    CarData, Classification, Driver, GapValue, Interval, Lap, Location, Meeting, Overtake, Pit,
    Position, RaceControl, Session, SessionResult, StartingGrid, Stint, TeamRadio, Weather,
};
pub use resource::{parse_csv, CsvRow, Payload, RecordDecoder, Resource, SerdeDecoder};

pub use openf1_client::{Error, ErrorKind, Result};
