use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    config::DEFAULT_ENDPOINT,
    error::QueryError,
    model::{ConditionIcon, WeatherReading},
    provider::normalize_city,
};

use super::WeatherProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// OpenWeather "current weather" client.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: Url,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_key: String, endpoint: &str) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid weather endpoint '{endpoint}'"))?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { api_key, endpoint, http })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

/// Error body, e.g. `{"cod":"404","message":"city not found"}`.
#[derive(Debug, Deserialize)]
struct OwErrorResponse {
    message: Option<String>,
}

impl From<OwCurrentResponse> for WeatherReading {
    fn from(parsed: OwCurrentResponse) -> Self {
        let condition_icon = parsed
            .weather
            .first()
            .map(|w| ConditionIcon::from_code(&w.icon))
            .unwrap_or(ConditionIcon::Clear);

        WeatherReading {
            temperature: parsed.main.temp.floor() as i32,
            humidity_percent: parsed.main.humidity.round().clamp(0.0, 100.0) as u8,
            // passed through as reported; displayed with a km/h label
            wind_speed_kmh: parsed.wind.speed.max(0.0),
            location_name: parsed.name,
            condition_icon,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherReading, QueryError> {
        let city = normalize_city(city)?;
        debug!(city, endpoint = %self.endpoint, "requesting current weather");

        let res = self
            .http
            .get(self.endpoint.clone())
            .query(&[("q", city), ("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!(city, error = %e, "OpenWeather request failed");
                QueryError::transport(e)
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            warn!(city, error = %e, "Failed to read OpenWeather response body");
            QueryError::transport(e)
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<OwErrorResponse>(&body)
                .ok()
                .and_then(|b| b.message);
            warn!(city, %status, body = %truncate_body(&body), "OpenWeather rejected request");
            return Err(QueryError::ProviderRejected { status: status.as_u16(), message });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(city, error = %e, body = %truncate_body(&body), "Failed to parse OpenWeather JSON");
            QueryError::transport(e)
        })?;

        Ok(parsed.into())
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
