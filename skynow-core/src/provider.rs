use crate::{
    Config, LocationQuery, WeatherError, WeatherSnapshot,
    provider::{openweather::OpenWeatherClient, unsplash::UnsplashClient},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug, sync::Arc};

pub mod openweather;
pub mod unsplash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    Unsplash,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::Unsplash => "unsplash",
        }
    }

    /// Environment variable that supplies this provider's API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "WEATHER_API_KEY",
            ProviderId::Unsplash => "UNSPLASH_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::Unsplash]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "unsplash" => Ok(ProviderId::Unsplash),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, unsplash."
            )),
        }
    }
}

/// Source of current weather conditions.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, WeatherError>;
}

/// Source of a decorative background photo for a place name.
#[async_trait]
pub trait ImageProvider: Send + Sync + Debug {
    /// Full-resolution URL of a photo matching `query`.
    async fn random_photo(&self, query: &str) -> anyhow::Result<String>;
}

/// Construct the weather client from config.
pub fn weather_provider_from_config(
    config: &Config,
) -> Result<Arc<dyn WeatherProvider>, WeatherError> {
    let id = ProviderId::OpenWeather;
    let api_key = config.provider_api_key(id).ok_or(WeatherError::MissingCredential)?;

    let client = match config.provider_config(id).and_then(|p| p.base_url.as_deref()) {
        Some(base) => OpenWeatherClient::with_base_url(api_key.to_owned(), base),
        None => OpenWeatherClient::new(api_key.to_owned()),
    };

    Ok(Arc::new(client))
}

/// Construct the background-image client from config.
pub fn image_provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn ImageProvider>> {
    let id = ProviderId::Unsplash;
    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `skynow configure {id}` or set {}.",
            id.env_var()
        )
    })?;

    let client = match config.provider_config(id).and_then(|p| p.base_url.as_deref()) {
        Some(base) => UnsplashClient::with_base_url(api_key.to_owned(), base),
        None => UnsplashClient::new(api_key.to_owned()),
    };

    Ok(Arc::new(client))
}
