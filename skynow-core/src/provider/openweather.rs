use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::WeatherError,
    model::{Coordinates, LocationQuery, WeatherSnapshot},
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Current-conditions client for the OpenWeather `data/2.5/weather` endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn fetch_current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let mut params: Vec<(&str, String)> = match query {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coords(c) => vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())],
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        tracing::debug!(%query, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(WeatherError::transport)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::transport)?;

        if !status.is_success() {
            let parsed: OwErrorBody =
                serde_json::from_str(&body).map_err(WeatherError::transport)?;
            tracing::debug!(%status, message = %parsed.message, "weather provider rejected request");
            return Err(WeatherError::Provider(parsed.message));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(WeatherError::transport)?;

        Ok(parsed.into())
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, WeatherError> {
        self.fetch_current(query).await
    }
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    #[serde(default)]
    main: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: i64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<f64>,
    gust: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    #[serde(default)]
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    #[serde(default)]
    sys: OwSys,
    weather: Vec<OwWeather>,
    main: OwMain,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
    visibility: Option<u32>,
    dt: i64,
    #[serde(default)]
    timezone: i32,
}

impl From<OwCurrentResponse> for WeatherSnapshot {
    fn from(r: OwCurrentResponse) -> Self {
        let (description, condition, icon) = r
            .weather
            .into_iter()
            .next()
            .map(|w| (w.description, w.main, w.icon))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new(), String::new()));

        WeatherSnapshot {
            location_name: r.name,
            country: r.sys.country,
            description,
            condition,
            icon,
            temperature_c: r.main.temp,
            feels_like_c: r.main.feels_like,
            temp_min_c: r.main.temp_min,
            temp_max_c: r.main.temp_max,
            pressure_hpa: r.main.pressure,
            humidity_pct: r.main.humidity,
            wind_speed_mps: r.wind.speed,
            wind_deg: r.wind.deg,
            wind_gust_mps: r.wind.gust,
            cloud_pct: r.clouds.all,
            visibility_m: r.visibility,
            coordinates: Coordinates { lat: r.coord.lat, lon: r.coord.lon },
            sunrise: r.sys.sunrise,
            sunset: r.sys.sunset,
            observed_at: r.dt,
            timezone_offset_s: r.timezone,
        }
    }
}
