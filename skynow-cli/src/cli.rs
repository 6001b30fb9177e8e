use anyhow::{Context, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use skynow_core::{
    Config, Coordinates, FixedLocator, Language, Phase, ProviderId, Session, render,
};

use crate::interactive;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skynow", version, about = "Current weather for a city, in Portuguese or English")]
pub struct Cli {
    /// UI language: "pt" or "en". Falls back to the configured language, then "pt".
    #[arg(long, global = true)]
    pub lang: Option<Language>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for a provider ("openweather" or "unsplash").
    Configure {
        provider: String,
    },

    /// Show current weather for a city.
    Show {
        city: String,

        /// Print the raw snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show current weather at a position (flags or the configured home).
    Here {
        #[command(flatten)]
        position: Position,

        #[arg(long)]
        json: bool,
    },

    /// Search interactively. Looks up the current position first, if known.
    Interactive {
        #[command(flatten)]
        position: Position,
    },
}

#[derive(Debug, Args, Default)]
pub struct Position {
    /// Latitude in decimal degrees.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl Position {
    fn locator(&self, config: &Config) -> FixedLocator {
        let flags = self.lat.zip(self.lon).map(|(lat, lon)| Coordinates { lat, lon });
        FixedLocator(flags.or(config.home))
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Interactive { position: Position::default() });

        match command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { city, json } => {
                let (_, mut session) = open_session(self.lang)?;
                session.search(&city).await;
                finish_one_shot(session, json).await
            }
            Command::Here { position, json } => {
                let (config, mut session) = open_session(self.lang)?;
                session.mount(&position.locator(&config)).await;
                if session.view().phase() == Phase::Idle {
                    bail!(
                        "No position available.\n\
                         Hint: pass --lat/--lon or add a [home] section to {}.",
                        Config::config_file_path()?.display()
                    );
                }
                finish_one_shot(session, json).await
            }
            Command::Interactive { position } => {
                let (config, session) = open_session(self.lang)?;
                interactive::run(session, &position.locator(&config)).await
            }
        }
    }
}

/// Load config (file, then environment) and build a session in the chosen language.
fn open_session(lang: Option<Language>) -> anyhow::Result<(Config, Session)> {
    let config = Config::load()?.with_env();
    let language = lang.or(config.language).unwrap_or_default();
    let session = Session::from_config(&config, language);
    Ok((config, session))
}

async fn finish_one_shot(mut session: Session, json: bool) -> anyhow::Result<()> {
    session.settle().await;
    let view = session.view();

    if view.phase() == Phase::Failure {
        let message = view.error_text().unwrap_or_default();
        return Err(anyhow!(message));
    }

    if json {
        let snapshot = view.snapshot().context("No weather data to print")?;
        println!("{}", serde_json::to_string_pretty(snapshot)?);
    } else {
        print!("{}", render(view, chrono::Local::now().time()));
    }
    Ok(())
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    let mut config = Config::load()?;
    config.upsert_provider_api_key(id, api_key);
    config.save()?;

    println!("Saved {id} API key to {}", Config::config_file_path()?.display());
    Ok(())
}
