//! Static bilingual lookup tables for UI labels and weather descriptions.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "pt" | "pt-br" => Ok(Language::Pt),
            "en" | "en-us" => Ok(Language::En),
            _ => Err(anyhow::anyhow!(
                "Unknown language '{value}'. Supported languages: pt, en."
            )),
        }
    }
}

/// Keys of the UI label table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Title,
    Placeholder,
    Search,
    EnterCity,
    MaxTemp,
    MinTemp,
    Humidity,
    Pressure,
    Wind,
    Visibility,
    Clouds,
    Sunrise,
    Sunset,
    FeelsLike,
    Coordinates,
    Updated,
    Direction,
}

impl Label {
    /// `(pt, en)` pair for this key.
    const fn pair(self) -> (&'static str, &'static str) {
        match self {
            Label::Title => ("Céu Agora", "Sky Now"),
            Label::Placeholder => ("Buscar por uma cidade...", "Search for a city..."),
            Label::Search => ("Buscar", "Search"),
            Label::EnterCity => ("Por favor, digite uma cidade", "Please enter a city"),
            Label::MaxTemp => ("Máxima", "Max"),
            Label::MinTemp => ("Mínima", "Min"),
            Label::Humidity => ("Umidade", "Humidity"),
            Label::Pressure => ("Pressão", "Pressure"),
            Label::Wind => ("Vento", "Wind"),
            Label::Visibility => ("Visibilidade", "Visibility"),
            Label::Clouds => ("Nuvens", "Clouds"),
            Label::Sunrise => ("Nascer do Sol", "Sunrise"),
            Label::Sunset => ("Pôr do Sol", "Sunset"),
            Label::FeelsLike => ("Sensação térmica", "Feels like"),
            Label::Coordinates => ("Coordenadas", "Coordinates"),
            Label::Updated => ("Atualizado", "Updated"),
            Label::Direction => ("Direção", "Direction"),
        }
    }
}

/// Localized text for a UI label.
pub fn label(key: Label, language: Language) -> &'static str {
    let (pt, en) = key.pair();
    match language {
        Language::Pt => pt,
        Language::En => en,
    }
}

/// Provider description phrases (lowercase) and their Portuguese wording.
const DESCRIPTIONS_PT: &[(&str, &str)] = &[
    ("clear sky", "céu limpo"),
    ("few clouds", "poucas nuvens"),
    ("scattered clouds", "nuvens dispersas"),
    ("broken clouds", "nuvens quebradas"),
    ("overcast clouds", "nublado"),
    ("shower rain", "chuva rápida"),
    ("rain", "chuva"),
    ("light rain", "chuva leve"),
    ("moderate rain", "chuva moderada"),
    ("heavy intensity rain", "chuva forte"),
    ("thunderstorm", "tempestade"),
    ("snow", "neve"),
    ("mist", "névoa"),
    ("smoke", "fumaça"),
    ("haze", "neblina"),
    ("dust", "poeira"),
    ("fog", "nevoeiro"),
    ("sand", "areia"),
    ("ash", "cinzas"),
    ("squall", "rajada"),
    ("tornado", "tornado"),
];

/// Translate a provider description into the active language.
///
/// Lookup is case-insensitive and only happens for Portuguese. Phrases not in
/// the table are returned as given.
pub fn translate_description(description: &str, language: Language) -> String {
    if language == Language::En {
        return description.to_string();
    }

    let needle = description.to_lowercase();
    DESCRIPTIONS_PT
        .iter()
        .find(|(en, _)| *en == needle)
        .map(|(_, pt)| (*pt).to_string())
        .unwrap_or_else(|| description.to_string())
}
