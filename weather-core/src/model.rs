use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Weather condition bucket used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionIcon {
    Clear,
    Cloud,
    Drizzle,
    Rain,
    Snow,
}

impl ConditionIcon {
    /// Map a provider icon code (e.g. "09d") to its icon. Unknown codes are `Clear`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "01d" | "01n" => ConditionIcon::Clear,
            "02d" | "02n" | "03d" | "03n" => ConditionIcon::Cloud,
            "04d" | "04n" => ConditionIcon::Drizzle,
            "09d" | "09n" | "10d" | "10n" => ConditionIcon::Rain,
            "13d" | "13n" => ConditionIcon::Snow,
            _ => ConditionIcon::Clear,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionIcon::Clear => "clear",
            ConditionIcon::Cloud => "cloud",
            ConditionIcon::Drizzle => "drizzle",
            ConditionIcon::Rain => "rain",
            ConditionIcon::Snow => "snow",
        }
    }

    pub const fn all() -> &'static [ConditionIcon] {
        &[
            ConditionIcon::Clear,
            ConditionIcon::Cloud,
            ConditionIcon::Drizzle,
            ConditionIcon::Rain,
            ConditionIcon::Snow,
        ]
    }
}

impl std::fmt::Display for ConditionIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized weather snapshot for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature: i32,
    pub humidity_percent: u8,
    pub wind_speed_kmh: f64,
    pub location_name: String,
    pub condition_icon: ConditionIcon,
}

/// Everything the presentation layer needs to draw the current search.
///
/// Written only by [`SearchController`](crate::controller::SearchController).
/// A failed search sets `last_error` but keeps the previous `reading`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub pending: bool,
    pub reading: Option<WeatherReading>,
    pub last_error: Option<QueryError>,
    /// Text of the most recent search that settled.
    pub query: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_table_matches_provider_codes() {
        assert_eq!(ConditionIcon::from_code("01n"), ConditionIcon::Clear);
        assert_eq!(ConditionIcon::from_code("03d"), ConditionIcon::Cloud);
        assert_eq!(ConditionIcon::from_code("04n"), ConditionIcon::Drizzle);
        assert_eq!(ConditionIcon::from_code("09d"), ConditionIcon::Rain);
        assert_eq!(ConditionIcon::from_code("10n"), ConditionIcon::Rain);
        assert_eq!(ConditionIcon::from_code("13d"), ConditionIcon::Snow);
    }

    #[test]
    fn unknown_icon_code_is_clear() {
        assert_eq!(ConditionIcon::from_code("99x"), ConditionIcon::Clear);
        assert_eq!(ConditionIcon::from_code(""), ConditionIcon::Clear);
        // thunderstorm and mist are not in the table either
        assert_eq!(ConditionIcon::from_code("11d"), ConditionIcon::Clear);
        assert_eq!(ConditionIcon::from_code("50n"), ConditionIcon::Clear);
    }

    #[test]
    fn icon_serializes_lowercase() {
        let json = serde_json::to_string(&ConditionIcon::Drizzle).unwrap();
        assert_eq!(json, "\"drizzle\"");
    }
}
