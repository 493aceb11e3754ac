use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_core::{Config, SearchController, WeatherProvider, provider_from_config};

use crate::{
    render::{Theme, render_reading},
    session::{self, Session},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather search CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the provider API key and default city.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name.
        city: String,

        /// Render with the dark theme.
        #[arg(long)]
        dark: bool,
    },

    /// Interactive search: each input line is debounced before querying.
    Search {
        /// City to look up on startup instead of the configured default.
        #[arg(long)]
        city: Option<String>,

        /// Quiet period before a typed search runs, in milliseconds.
        #[arg(long)]
        debounce_ms: Option<u64>,

        /// Start in dark mode.
        #[arg(long)]
        dark: bool,
    },
}

fn theme_for(dark: bool) -> Theme {
    if dark { Theme::Dark } else { Theme::Light }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, dark } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                show(provider.as_ref(), &city, theme_for(dark)).await
            }
            Command::Search { city, debounce_ms, dark } => {
                let mut config = Config::load()?;
                if let Some(city) = city {
                    config.default_city = Some(city);
                }
                if let Some(ms) = debounce_ms {
                    config.debounce_ms = Some(ms);
                }
                search(&config, theme_for(dark)).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("API key prompt aborted")?;

    let default_city = Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()
        .context("Default city prompt aborted")?;

    config.api_key = Some(api_key.trim().to_string());
    config.default_city = Some(default_city.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(provider: &dyn WeatherProvider, city: &str, theme: Theme) -> anyhow::Result<()> {
    let reading = provider.fetch_weather(city).await?;
    println!("{}", render_reading(&reading, theme));
    Ok(())
}

async fn search(config: &Config, theme: Theme) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let debounce: Duration = config.debounce();

    let controller = SearchController::start(provider, debounce, config.default_city());
    session::run(Session::new(controller, theme, debounce)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_flags() {
        let cli = Cli::try_parse_from([
            "weather",
            "search",
            "--city",
            "Karachi",
            "--debounce-ms",
            "250",
            "--dark",
        ])
        .expect("valid args");

        match cli.command {
            Command::Search { city, debounce_ms, dark } => {
                assert_eq!(city.as_deref(), Some("Karachi"));
                assert_eq!(debounce_ms, Some(250));
                assert!(dark);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn search_flags_are_optional() {
        let cli = Cli::try_parse_from(["weather", "search"]).expect("valid args");
        assert!(matches!(
            cli.command,
            Command::Search { city: None, debounce_ms: None, dark: false }
        ));
    }

    #[test]
    fn show_requires_city() {
        assert!(Cli::try_parse_from(["weather", "show"]).is_err());

        let cli = Cli::try_parse_from(["weather", "show", "Lahore"]).expect("valid args");
        assert!(matches!(cli.command, Command::Show { ref city, dark: false } if city == "Lahore"));
    }

    #[test]
    fn theme_flag_maps_to_theme() {
        assert_eq!(theme_for(true), Theme::Dark);
        assert_eq!(theme_for(false), Theme::Light);
    }
}
