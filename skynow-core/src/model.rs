use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// What to look up: a free-text city name or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coords(Coordinates),
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::City(name) => write!(f, "city '{name}'"),
            LocationQuery::Coords(c) => write!(f, "coordinates ({}, {})", c.lat, c.lon),
        }
    }
}

/// Current conditions for one place, as returned by the weather provider.
///
/// Temperatures are Celsius and speeds m/s (metric units are always requested).
/// Times are Unix epoch seconds; `timezone_offset_s` is the place's UTC offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country: String,
    pub description: String,
    pub condition: String,
    pub icon: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub pressure_hpa: i64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub wind_deg: Option<f64>,
    pub wind_gust_mps: Option<f64>,
    pub cloud_pct: u8,
    pub visibility_m: Option<u32>,
    pub coordinates: Coordinates,
    pub sunrise: i64,
    pub sunset: i64,
    pub observed_at: i64,
    pub timezone_offset_s: i32,
}
