use chrono::{DateTime, Local};
use crossterm::style::{Color, Stylize};
use weather_core::{ConditionIcon, SearchState, WeatherReading};

/// Light/dark display mode, toggled independently of searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn accent(&self) -> Color {
        match self {
            Theme::Light => Color::DarkBlue,
            Theme::Dark => Color::Yellow,
        }
    }

    fn text(&self) -> Color {
        match self {
            Theme::Light => Color::Black,
            Theme::Dark => Color::White,
        }
    }
}

/// Image asset shipped for each condition.
pub fn icon_asset(icon: ConditionIcon) -> &'static str {
    match icon {
        ConditionIcon::Clear => "clear.png",
        ConditionIcon::Cloud => "cloud.png",
        ConditionIcon::Drizzle => "drizzle.png",
        ConditionIcon::Rain => "rain.png",
        ConditionIcon::Snow => "snow.png",
    }
}

/// Terminal stand-in for the image asset.
pub fn icon_glyph(icon: ConditionIcon) -> &'static str {
    match icon {
        ConditionIcon::Clear => "☀",
        ConditionIcon::Cloud => "☁",
        ConditionIcon::Drizzle => "🌦",
        ConditionIcon::Rain => "🌧",
        ConditionIcon::Snow => "❄",
    }
}

/// Single reading, as printed by `weather show`.
pub fn render_reading(reading: &WeatherReading, theme: Theme) -> String {
    let icon = reading.condition_icon;
    let temperature = format!("{}°C", reading.temperature);

    format!(
        "{} {} ({})\n  {}  {}\n  Humidity {}%   Wind Speed {:.1} km/h",
        icon_glyph(icon),
        icon.as_str().with(theme.accent()),
        icon_asset(icon),
        temperature.bold().with(theme.accent()),
        reading.location_name.clone().with(theme.text()),
        reading.humidity_percent,
        reading.wind_speed_kmh,
    )
}

/// Whole search view: latest reading, error notice and pending marker.
pub fn render_state(state: &SearchState, theme: Theme, now: DateTime<Local>) -> String {
    let mut out = format!("── weather [{}] ──", theme.as_str());

    match &state.reading {
        Some(reading) => {
            out.push('\n');
            out.push_str(&render_reading(reading, theme));
        }
        None => out.push_str("\n  (no reading yet)"),
    }

    if let Some(err) = &state.last_error {
        out.push_str(&format!("\n  {} {err}", "!".with(Color::Red)));
        if let Some(query) = state.query.as_deref().filter(|q| !q.is_empty()) {
            out.push_str(&format!(" ({query})"));
        }
    }

    if state.pending {
        out.push_str("\n  … searching");
    } else {
        out.push_str(&format!("\n  updated {}", now.format("%H:%M:%S")));
    }

    out
}
