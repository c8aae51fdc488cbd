//! Client library for the web API of INUMET, Uruguay's national weather service.
//!
//! This crate defines:
//! - Endpoint discovery from the service's resource index
//! - Typed accessors for stations, zones, departments, current conditions,
//!   forecast and risk alerts
//! - Nearest station/zone resolution by coordinate
//! - The forecast weather-code to condition mapping
//!
//! ```no_run
//! # async fn demo() -> inumet_core::Result<()> {
//! let client = inumet_core::InumetClient::builder()
//!     .near(-34.90, -56.16)
//!     .build()
//!     .await?;
//!
//! for item in client.forecast().await? {
//!     println!("day +{}: {:?}", item.day_offset, item.condition_label());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod condition;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod locate;
pub mod model;
pub mod transport;

pub use client::{InumetClient, InumetClientBuilder};
pub use condition::Condition;
pub use config::{ClientConfig, DefaultContext};
pub use endpoints::Endpoints;
pub use error::{InumetError, Result};
pub use model::{
    AlertBundle, Coordinates, CurrentConditions, CurrentReport, Department, ForecastItem, Station,
    Zone,
};
pub use transport::{FixtureTransport, HttpTransport, Transport};
