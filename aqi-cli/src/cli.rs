use aqi_core::{Config, FetchError, city_report};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};

use crate::render::render_report;

/// Cities offered by the interactive picker.
pub const PRESET_CITIES: &[&str] = &[
    "Szczecin",
    "Bydgoszcz",
    "Torun",
    "Lublin",
    "Gorzow Wielkopolski",
    "Zielona Gora",
    "Lodz",
    "Krakow",
    "Wroclaw",
    "Opole",
    "Rzeszow",
    "Bialystok",
    "Gdansk",
    "Katowice",
    "Kielce",
    "Poznan",
    "Warszawa",
];

const CUSTOM: &str = "Custom";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "aqi", version, about = "Air quality around the world")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WAQI API token and an optional default city.
    Configure,

    /// Show current air quality and forecast for a city.
    Show {
        /// City name; falls back to the default city, then to an interactive pick.
        city: Option<String>,
    },

    /// List the preset cities.
    Cities,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => show(city).await,
            Command::Cities => {
                for city in PRESET_CITIES {
                    println!("{city}");
                }
                Ok(())
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut cfg = Config::load()?;

    let token = Password::new("WAQI API token:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://aqicn.org/data-platform/token/")
        .prompt()
        .context("Failed to read API token")?;
    cfg.set_api_token(token.trim().to_string());

    let city = Text::new("Default city (leave empty for none):")
        .with_initial_value(cfg.default_city.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read default city")?;
    cfg.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    cfg.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: Option<String>) -> Result<()> {
    let cfg = Config::load()?.with_env();
    let client = cfg.client()?;

    let city = match city.or_else(|| cfg.default_city.clone()) {
        Some(city) => city,
        None => pick_city()?,
    };
    let city = city.trim();

    match city_report(&client, city).await {
        Ok(report) => print!("{}", render_report(&report, chrono::Local::now())),
        Err(e) => eprintln!("{}", warning(city, &e)),
    }

    Ok(())
}

fn pick_city() -> Result<String> {
    let mut options = vec![CUSTOM];
    options.extend_from_slice(PRESET_CITIES);
    let last = options.len() - 1;

    let choice = Select::new("Select city:", options)
        .with_starting_cursor(last)
        .prompt()
        .context("Failed to read city selection")?;

    if choice != CUSTOM {
        return Ok(choice.to_string());
    }

    Text::new("Enter custom city:")
        .prompt()
        .context("Failed to read custom city")
}

/// What the user sees when a city could not be shown.
fn warning(city: &str, err: &FetchError) -> String {
    match err {
        FetchError::NoData(_) => format!("Warning: no AQI data available for {city}."),
        FetchError::Api(msg) => format!("Warning: the air quality service rejected {city}: {msg}"),
        FetchError::Network(msg) => {
            format!("Warning: could not reach the air quality service for {city}: {msg}")
        }
        FetchError::UnexpectedShape(msg) => {
            format!("Warning: unexpected response for {city}: {msg}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_city() {
        let cli = Cli::try_parse_from(["aqi", "show", "Zielona Gora"]).unwrap();
        assert!(matches!(cli.command, Command::Show { city: Some(ref c) } if c == "Zielona Gora"));
    }

    #[test]
    fn parses_show_without_city() {
        let cli = Cli::try_parse_from(["aqi", "show"]).unwrap();
        assert!(matches!(cli.command, Command::Show { city: None }));
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(Cli::try_parse_from(["aqi", "forecast"]).is_err());
    }

    #[test]
    fn presets_end_with_capital() {
        assert_eq!(PRESET_CITIES.len(), 17);
        assert_eq!(PRESET_CITIES.last(), Some(&"Warszawa"));
    }

    #[test]
    fn warning_names_city_and_cause() {
        let w = warning("Atlantis", &FetchError::Api("error: Unknown station".into()));
        assert!(w.contains("Atlantis"));
        assert!(w.contains("Unknown station"));

        let w = warning("Opole", &FetchError::NoData("no AQI".into()));
        assert_eq!(w, "Warning: no AQI data available for Opole.");
    }
}
