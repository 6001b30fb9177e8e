//! Turns a [`WeatherView`] into display-ready text.
//!
//! Rendering is pure: the same view and clock time always produce the same
//! [`Screen`]. Applying the background directive is left to whoever hosts the
//! screen.

use chrono::{DateTime, FixedOffset, NaiveTime};
use std::fmt;

use crate::{
    i18n::{Label, Language, label, translate_description},
    model::WeatherSnapshot,
    view::{Phase, WeatherView},
};

/// Submit button state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub text: String,
    pub disabled: bool,
}

/// One labelled value in the details grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub label: &'static str,
    pub value: String,
    pub detail: Option<String>,
}

/// Result panel shown after a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub header: String,
    pub description: String,
    pub temperature: String,
    pub feels_like: String,
    pub tiles: Vec<Tile>,
    pub coordinates: String,
    pub updated: String,
}

impl Panel {
    pub fn tile(&self, key: Label, language: Language) -> Option<&Tile> {
        let wanted = label(key, language);
        self.tiles.iter().find(|t| t.label == wanted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub title: &'static str,
    pub placeholder: &'static str,
    pub city: String,
    pub submit: SubmitControl,
    pub error: Option<String>,
    pub panel: Option<Panel>,
    /// Image the host should paint behind the screen.
    pub background: Option<String>,
}

pub fn render(view: &WeatherView, now: NaiveTime) -> Screen {
    let lang = view.language();

    let submit = if view.is_busy() {
        SubmitControl { text: "...".to_string(), disabled: true }
    } else {
        SubmitControl { text: label(Label::Search, lang).to_string(), disabled: false }
    };

    let error = match view.phase() {
        Phase::Failure => view.error_text(),
        _ => None,
    };

    let panel = match (view.phase(), view.snapshot()) {
        (Phase::Success, Some(snapshot)) => Some(render_panel(snapshot, lang, now)),
        _ => None,
    };

    Screen {
        title: label(Label::Title, lang),
        placeholder: label(Label::Placeholder, lang),
        city: view.city().to_string(),
        submit,
        error,
        panel,
        background: view.background().map(str::to_string),
    }
}

fn render_panel(s: &WeatherSnapshot, lang: Language, now: NaiveTime) -> Panel {
    let mut tiles = vec![
        Tile { label: label(Label::MaxTemp, lang), value: format_temp(s.temp_max_c), detail: None },
        Tile { label: label(Label::MinTemp, lang), value: format_temp(s.temp_min_c), detail: None },
        Tile {
            label: label(Label::Humidity, lang),
            value: format!("{}%", s.humidity_pct),
            detail: None,
        },
        Tile {
            label: label(Label::Pressure, lang),
            value: format!("{} hPa", s.pressure_hpa),
            detail: None,
        },
        Tile {
            label: label(Label::Wind, lang),
            value: format!("{} m/s", s.wind_speed_mps),
            detail: s.wind_deg.map(|deg| format!("{}: {deg}°", label(Label::Direction, lang))),
        },
        Tile {
            label: label(Label::Visibility, lang),
            value: format_visibility(s.visibility_m),
            detail: None,
        },
        Tile { label: label(Label::Clouds, lang), value: format!("{}%", s.cloud_pct), detail: None },
    ];

    for (key, epoch) in [(Label::Sunrise, s.sunrise), (Label::Sunset, s.sunset)] {
        if let Some(value) = format_local_clock(epoch, s.timezone_offset_s) {
            tiles.push(Tile { label: label(key, lang), value, detail: None });
        }
    }

    Panel {
        header: format!("{}, {}", s.location_name, s.country),
        description: capitalize_words(&translate_description(&s.description, lang)),
        temperature: format_temp(s.temperature_c),
        feels_like: format!("{}: {}", label(Label::FeelsLike, lang), format_temp(s.feels_like_c)),
        tiles,
        coordinates: format!(
            "{}: {:.2}°, {:.2}°",
            label(Label::Coordinates, lang),
            s.coordinates.lat,
            s.coordinates.lon
        ),
        updated: format!("{}: {}", label(Label::Updated, lang), format_clock(now, lang)),
    }
}

/// Nearest integer, halves rounded toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

pub fn format_temp(celsius: f64) -> String {
    format!("{}°C", round_half_up(celsius))
}

/// Kilometres with one decimal; absent or zero visibility is unknown.
pub fn format_visibility(meters: Option<u32>) -> String {
    match meters {
        Some(m) if m > 0 => format!("{:.1} km", f64::from(m) / 1000.0),
        _ => "N/A".to_string(),
    }
}

/// Wall-clock time with seconds in the language's locale style.
pub fn format_clock(time: NaiveTime, language: Language) -> String {
    match language {
        Language::Pt => time.format("%H:%M:%S").to_string(),
        Language::En => time.format("%-I:%M:%S %p").to_string(),
    }
}

/// 24-hour `HH:MM` of an epoch timestamp at the place's own UTC offset.
///
/// Independent of the UI language, so switching language leaves it unchanged.
pub fn format_local_clock(epoch: i64, offset_s: i32) -> Option<String> {
    if epoch == 0 {
        return None;
    }
    let offset = FixedOffset::east_opt(offset_s)?;
    let local = DateTime::from_timestamp(epoch, 0)?.with_timezone(&offset);

    Some(local.format("%H:%M").to_string())
}

fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if self.submit.disabled {
            writeln!(f, "[{}]", self.submit.text)?;
        }
        if let Some(error) = &self.error {
            writeln!(f, "! {error}")?;
        }
        if let Some(panel) = &self.panel {
            writeln!(f)?;
            write!(f, "{panel}")?;
        }
        if let Some(url) = &self.background {
            writeln!(f)?;
            writeln!(f, "Background: {url}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f, "{}", self.temperature)?;
        writeln!(f, "{}", self.feels_like)?;
        writeln!(f)?;
        for tile in &self.tiles {
            write!(f, "  {:<18}{}", tile.label, tile.value)?;
            if let Some(detail) = &tile.detail {
                write!(f, "  ({detail})")?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        writeln!(f, "{}    {}", self.coordinates, self.updated)
    }
}
