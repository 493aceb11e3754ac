use crate::{Config, QueryError, WeatherReading, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// A source of current weather readings.
///
/// One call is one attempt: implementations never retry.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherReading, QueryError>;
}

/// Construct the provider from startup config.
///
/// Fails when no credential is available, which is a configuration problem
/// rather than a per-query one.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    let provider = OpenWeatherProvider::with_endpoint(api_key.to_owned(), config.endpoint())?;

    Ok(Arc::new(provider))
}

/// Trim and validate user input before any I/O happens.
pub fn normalize_city(raw: &str) -> Result<&str, QueryError> {
    let city = raw.trim();
    if city.is_empty() { Err(QueryError::EmptyInput) } else { Ok(city) }
}
