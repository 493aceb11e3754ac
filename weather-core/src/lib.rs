//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Domain models (readings, condition icons, search state) and the query error taxonomy
//! - The weather provider abstraction and its OpenWeather implementation
//! - A debounced search controller with stale-result protection
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;
pub mod timer;

pub use config::Config;
pub use controller::SearchController;
pub use error::QueryError;
pub use model::{ConditionIcon, SearchState, WeatherReading};
pub use provider::{WeatherProvider, provider_from_config};
