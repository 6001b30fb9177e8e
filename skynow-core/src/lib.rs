//! Core library for the `skynow` weather lookup.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Weather and background-image provider clients
//! - The bilingual label/description tables
//! - The interactive view state machine, its renderer and the session driving it
//!
//! It is used by `skynow-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod i18n;
pub mod location;
pub mod model;
pub mod provider;
pub mod render;
pub mod session;
pub mod view;

pub use config::{Config, ProviderConfig};
pub use error::{LocationError, WeatherError};
pub use i18n::{Label, Language};
pub use location::{FixedLocator, Locator};
pub use model::{Coordinates, LocationQuery, WeatherSnapshot};
pub use provider::{ImageProvider, ProviderId, WeatherProvider};
pub use render::{Screen, render};
pub use session::Session;
pub use view::{Phase, WeatherView};
