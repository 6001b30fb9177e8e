//! Interaction state for the weather screen.
//!
//! The view is a plain state machine: `submit`/`locate` move it to
//! [`Phase::Loading`] and hand out a [`FetchTicket`]; `resolve` feeds the
//! provider result back. Tickets carry a generation number and only the most
//! recent one is honoured, so an older response arriving late is dropped.

use crate::{
    error::WeatherError,
    i18n::{self, Label, Language},
    model::{Coordinates, LocationQuery, WeatherSnapshot},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Failure,
}

/// Inline error shown under the search line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// Re-localized on every render.
    Localized(Label),
    /// Shown as-is (provider or configuration message).
    Message(String),
}

impl ViewError {
    pub fn text(&self, language: Language) -> String {
        match self {
            ViewError::Localized(key) => i18n::label(*key, language).to_string(),
            ViewError::Message(msg) => msg.clone(),
        }
    }
}

/// Permission to run one weather request.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: LocationQuery,
}

/// Background lookup to fire after a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundRequest {
    pub generation: u64,
    pub query: String,
}

#[derive(Debug, Clone, Default)]
pub struct WeatherView {
    city: String,
    language: Language,
    phase: Phase,
    snapshot: Option<WeatherSnapshot>,
    error: Option<ViewError>,
    background: Option<String>,
    generation: u64,
    weather_configured: bool,
}

impl WeatherView {
    pub fn new(language: Language, weather_configured: bool) -> Self {
        Self { language, weather_configured, ..Self::default() }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch the UI language. Never triggers a fetch.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }

    pub fn error_text(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.text(self.language))
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Submit the current city text.
    ///
    /// Returns `None` when no request should be made; the view is then in
    /// [`Phase::Failure`] with the reason.
    pub fn submit(&mut self) -> Option<FetchTicket> {
        let city = self.city.trim();
        if city.is_empty() {
            self.fail(ViewError::Localized(Label::EnterCity));
            return None;
        }
        let query = LocationQuery::City(city.to_string());
        self.begin(query)
    }

    /// Start a lookup for a position obtained from the locator.
    pub fn locate(&mut self, coords: Coordinates) -> Option<FetchTicket> {
        self.begin(LocationQuery::Coords(coords))
    }

    fn begin(&mut self, query: LocationQuery) -> Option<FetchTicket> {
        if !self.weather_configured {
            self.fail(ViewError::Message(WeatherError::MissingCredential.to_string()));
            return None;
        }

        self.generation += 1;
        self.phase = Phase::Loading;
        self.error = None;
        self.snapshot = None;

        Some(FetchTicket { generation: self.generation, query })
    }

    fn fail(&mut self, error: ViewError) {
        self.phase = Phase::Failure;
        self.error = Some(error);
        self.snapshot = None;
    }

    /// Apply the outcome of a weather request.
    ///
    /// On success returns the background lookup to fire for the confirmed
    /// city name. Results for anything but the latest ticket are ignored.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        result: Result<WeatherSnapshot, WeatherError>,
    ) -> Option<BackgroundRequest> {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding stale weather response"
            );
            return None;
        }

        match result {
            Ok(snapshot) => {
                self.city = snapshot.location_name.clone();
                let request = BackgroundRequest {
                    generation: ticket.generation,
                    query: snapshot.location_name.clone(),
                };
                self.snapshot = Some(snapshot);
                self.error = None;
                self.phase = Phase::Success;
                Some(request)
            }
            Err(err) => {
                self.fail(ViewError::Message(err.to_string()));
                None
            }
        }
    }

    /// Record a background photo for the given generation.
    pub fn apply_background(&mut self, generation: u64, url: String) {
        if generation != self.generation {
            tracing::debug!(stale = generation, current = self.generation, "discarding stale background");
            return;
        }
        self.background = Some(url);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn snapshot(name: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: name.to_string(),
            country: "BR".into(),
            description: "Clear Sky".into(),
            condition: "Clear".into(),
            icon: "01d".into(),
            temperature_c: 21.6,
            feels_like_c: 21.2,
            temp_min_c: 19.4,
            temp_max_c: 23.5,
            pressure_hpa: 1017,
            humidity_pct: 60,
            wind_speed_mps: 3.6,
            wind_deg: Some(140.0),
            wind_gust_mps: None,
            cloud_pct: 20,
            visibility_m: Some(10000),
            coordinates: Coordinates { lat: -23.5505, lon: -46.6333 },
            sunrise: 1_699_949_000,
            sunset: 1_699_996_000,
            observed_at: 1_700_000_000,
            timezone_offset_s: -10800,
        }
    }

    #[test]
    fn empty_city_fails_without_ticket() {
        let mut view = WeatherView::new(Language::Pt, true);
        view.set_city("   ");

        assert!(view.submit().is_none());
        assert_eq!(view.phase(), Phase::Failure);
        assert_eq!(view.error_text().as_deref(), Some("Por favor, digite uma cidade"));
        assert!(view.snapshot().is_none());
    }

    #[test]
    fn empty_city_message_relocalizes() {
        let mut view = WeatherView::new(Language::Pt, true);
        view.submit();
        view.set_language(Language::En);

        assert_eq!(view.error_text().as_deref(), Some("Please enter a city"));
    }

    #[test]
    fn missing_credential_fails_without_ticket() {
        let mut view = WeatherView::new(Language::En, false);
        view.set_city("Lisbon");

        assert!(view.submit().is_none());
        assert_eq!(view.phase(), Phase::Failure);
        assert_eq!(view.error_text().as_deref(), Some("Weather API key is not configured."));
    }

    #[test]
    fn submit_enters_loading_and_clears_previous_result() {
        let mut view = WeatherView::new(Language::Pt, true);
        view.set_city("sao paulo");
        let first = view.submit().expect("ticket");
        view.resolve(&first, Ok(snapshot("São Paulo")));
        assert!(view.snapshot().is_some());

        view.set_city("Lisbon");
        let ticket = view.submit().expect("ticket");

        assert_eq!(view.phase(), Phase::Loading);
        assert!(view.is_busy());
        assert!(view.snapshot().is_none());
        assert!(view.error().is_none());
        assert_eq!(ticket.query, LocationQuery::City("Lisbon".into()));
    }

    #[test]
    fn success_overwrites_city_and_requests_background() {
        let mut view = WeatherView::new(Language::Pt, true);
        view.set_city("sao paulo");
        let ticket = view.submit().expect("ticket");

        let bg = view.resolve(&ticket, Ok(snapshot("São Paulo"))).expect("background request");

        assert_eq!(view.phase(), Phase::Success);
        assert_eq!(view.city(), "São Paulo");
        assert_eq!(bg.query, "São Paulo");
        assert_eq!(bg.generation, ticket.generation);
    }

    #[test]
    fn failure_records_provider_message() {
        let mut view = WeatherView::new(Language::Pt, true);
        view.set_city("atlantis");
        let ticket = view.submit().expect("ticket");

        let bg = view.resolve(&ticket, Err(WeatherError::Provider("city not found".into())));

        assert!(bg.is_none());
        assert_eq!(view.phase(), Phase::Failure);
        assert_eq!(view.error_text().as_deref(), Some("city not found"));
        assert!(view.snapshot().is_none());
        assert_eq!(view.city(), "atlantis");
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut view = WeatherView::new(Language::Pt, true);
        view.set_city("Paris");
        let older = view.submit().expect("ticket");
        view.set_city("Rome");
        let newer = view.submit().expect("ticket");

        view.resolve(&newer, Ok(snapshot("Rome")));
        assert!(view.resolve(&older, Ok(snapshot("Paris"))).is_none());

        assert_eq!(view.city(), "Rome");
        assert_eq!(view.snapshot().map(|s| s.location_name.as_str()), Some("Rome"));
    }

    #[test]
    fn stale_background_is_discarded() {
        let mut view = WeatherView::new(Language::Pt, true);
        view.set_city("Paris");
        let older = view.submit().expect("ticket");
        view.apply_background(older.generation, "https://img/paris.jpg".into());
        assert_eq!(view.background(), Some("https://img/paris.jpg"));

        view.set_city("Rome");
        let newer = view.submit().expect("ticket");
        view.apply_background(older.generation, "https://img/paris-2.jpg".into());
        assert_eq!(view.background(), Some("https://img/paris.jpg"));

        view.apply_background(newer.generation, "https://img/rome.jpg".into());
        assert_eq!(view.background(), Some("https://img/rome.jpg"));
    }

    #[test]
    fn language_toggle_keeps_snapshot() {
        let mut view = WeatherView::new(Language::Pt, true);
        view.set_city("sao paulo");
        let ticket = view.submit().expect("ticket");
        view.resolve(&ticket, Ok(snapshot("São Paulo")));
        let before = view.snapshot().cloned();

        view.set_language(Language::En);

        assert_eq!(view.phase(), Phase::Success);
        assert_eq!(view.snapshot().cloned(), before);
    }

    #[test]
    fn locate_builds_coordinate_query() {
        let mut view = WeatherView::new(Language::Pt, true);
        let here = Coordinates { lat: 1.0, lon: 2.0 };

        let ticket = view.locate(here).expect("ticket");

        assert_eq!(ticket.query, LocationQuery::Coords(here));
        assert_eq!(view.phase(), Phase::Loading);
    }
}
