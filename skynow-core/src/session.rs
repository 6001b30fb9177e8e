use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    config::Config,
    error::WeatherError,
    i18n::Language,
    location::Locator,
    provider::{ImageProvider, WeatherProvider, image_provider_from_config, weather_provider_from_config},
    view::{BackgroundRequest, FetchTicket, WeatherView},
};

#[derive(Debug)]
struct BackgroundUpdate {
    generation: u64,
    url: String,
}

/// Drives a [`WeatherView`] against the weather and image providers.
///
/// Weather requests are awaited in place. Background lookups run as detached
/// tasks and report back through a channel; call [`Session::drain_backgrounds`]
/// before rendering to pick them up.
pub struct Session {
    view: WeatherView,
    weather: Option<Arc<dyn WeatherProvider>>,
    images: Option<Arc<dyn ImageProvider>>,
    updates_tx: mpsc::UnboundedSender<BackgroundUpdate>,
    updates_rx: mpsc::UnboundedReceiver<BackgroundUpdate>,
    pending: Vec<JoinHandle<()>>,
}

impl Session {
    pub fn new(
        language: Language,
        weather: Option<Arc<dyn WeatherProvider>>,
        images: Option<Arc<dyn ImageProvider>>,
    ) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            view: WeatherView::new(language, weather.is_some()),
            weather,
            images,
            updates_tx,
            updates_rx,
            pending: Vec::new(),
        }
    }

    /// Build providers from config; missing credentials leave that provider unset.
    pub fn from_config(config: &Config, language: Language) -> Self {
        let weather = weather_provider_from_config(config).ok();
        let images = image_provider_from_config(config).ok();
        Self::new(language, weather, images)
    }

    pub fn view(&self) -> &WeatherView {
        &self.view
    }

    pub fn set_language(&mut self, language: Language) {
        self.view.set_language(language);
    }

    /// Startup lookup by the user's position. A refused or failed locate is
    /// logged and leaves the view idle.
    pub async fn mount(&mut self, locator: &dyn Locator) {
        match locator.locate().await {
            Ok(coords) => {
                if let Some(ticket) = self.view.locate(coords) {
                    self.fetch(ticket).await;
                }
            }
            Err(err) => tracing::info!(%err, "no location at startup; waiting for a search"),
        }
    }

    /// Type `city` into the search line and submit it.
    pub async fn search(&mut self, city: &str) {
        if let Some(ticket) = self.submit(city) {
            self.fetch(ticket).await;
        }
    }

    /// Submit `city` without running the request yet.
    ///
    /// Backgrounds that arrived for the previous lookup are applied first;
    /// once the generation moves on they would be dropped as stale.
    pub fn submit(&mut self, city: &str) -> Option<FetchTicket> {
        self.drain_backgrounds();
        self.view.set_city(city);
        self.view.submit()
    }

    /// Run the weather request for `ticket` and apply its outcome.
    pub async fn fetch(&mut self, ticket: FetchTicket) {
        let result = match &self.weather {
            Some(provider) => provider.current(&ticket.query).await,
            None => Err(WeatherError::MissingCredential),
        };

        if let Err(err) = &result {
            tracing::debug!(query = %ticket.query, error = ?err, "weather lookup failed");
        }

        if let Some(request) = self.view.resolve(&ticket, result) {
            self.spawn_background(request);
        }
    }

    fn spawn_background(&mut self, request: BackgroundRequest) {
        let Some(images) = self.images.clone() else {
            tracing::error!("Unsplash API key is not configured.");
            return;
        };

        let tx = self.updates_tx.clone();
        let handle = tokio::spawn(async move {
            match images.random_photo(&request.query).await {
                Ok(url) => {
                    let _ = tx.send(BackgroundUpdate { generation: request.generation, url });
                }
                Err(err) => {
                    tracing::warn!(query = %request.query, "background image lookup failed: {err:#}")
                }
            }
        });

        self.pending.retain(|h| !h.is_finished());
        self.pending.push(handle);
    }

    /// Apply background photos that have arrived. Returns whether any did.
    pub fn drain_backgrounds(&mut self) -> bool {
        let mut applied = false;
        while let Ok(update) = self.updates_rx.try_recv() {
            self.view.apply_background(update.generation, update.url);
            applied = true;
        }
        applied
    }

    /// Wait for in-flight background lookups, then apply them.
    pub async fn settle(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for handle in pending {
            if let Err(err) = handle.await {
                tracing::warn!(%err, "background image task did not complete");
            }
        }
        self.drain_backgrounds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        LocationQuery, WeatherSnapshot,
        i18n::Label,
        location::FixedLocator,
        model::Coordinates,
        view::{Phase, ViewError, tests::snapshot},
    };
    use async_trait::async_trait;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug, Default)]
    struct FakeWeather {
        calls: AtomicUsize,
        queries: Mutex<Vec<LocationQuery>>,
        reject_with: Option<String>,
    }

    #[async_trait]
    impl WeatherProvider for FakeWeather {
        async fn current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().expect("lock").push(query.clone());
            match &self.reject_with {
                Some(msg) => Err(WeatherError::Provider(msg.clone())),
                None => Ok(snapshot("São Paulo")),
            }
        }
    }

    #[derive(Debug)]
    struct FakeImages(Option<&'static str>);

    #[async_trait]
    impl ImageProvider for FakeImages {
        async fn random_photo(&self, _query: &str) -> anyhow::Result<String> {
            self.0.map(str::to_string).ok_or_else(|| anyhow::anyhow!("rate limited"))
        }
    }

    fn session_with(
        weather: Arc<FakeWeather>,
        images: Option<&'static str>,
    ) -> Session {
        Session::new(
            Language::Pt,
            Some(weather),
            Some(Arc::new(FakeImages(images))),
        )
    }

    #[tokio::test]
    async fn empty_search_never_calls_provider() {
        let weather = Arc::new(FakeWeather::default());
        let mut session = session_with(weather.clone(), None);

        session.search("").await;

        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.view().phase(), Phase::Failure);
        assert_eq!(session.view().error(), Some(&ViewError::Localized(Label::EnterCity)));
    }

    #[tokio::test]
    async fn successful_search_applies_background() {
        let weather = Arc::new(FakeWeather::default());
        let mut session = session_with(weather.clone(), Some("https://img/sp.jpg"));

        session.search("sao paulo").await;
        assert_eq!(session.view().phase(), Phase::Success);
        assert_eq!(session.view().city(), "São Paulo");

        session.settle().await;
        assert_eq!(session.view().background(), Some("https://img/sp.jpg"));
        assert_eq!(weather.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn background_failure_is_silent() {
        let weather = Arc::new(FakeWeather::default());
        let mut session = session_with(weather, None);

        session.search("sao paulo").await;
        session.settle().await;

        assert_eq!(session.view().phase(), Phase::Success);
        assert!(session.view().error().is_none());
        assert!(session.view().background().is_none());
    }

    #[tokio::test]
    async fn missing_image_provider_is_silent() {
        let weather = Arc::new(FakeWeather::default());
        let mut session = Session::new(Language::En, Some(weather), None);

        session.search("sao paulo").await;
        session.settle().await;

        assert_eq!(session.view().phase(), Phase::Success);
        assert!(session.view().background().is_none());
    }

    #[tokio::test]
    async fn background_arriving_between_searches_is_kept() {
        let weather = Arc::new(FakeWeather::default());
        let mut session = session_with(weather, Some("https://img/sp.jpg"));

        session.search("sao paulo").await;
        // The photo lands while the user is typing the next city.
        for handle in std::mem::take(&mut session.pending) {
            handle.await.expect("background task");
        }
        assert!(session.view().background().is_none());

        let ticket = session.submit("Lisbon").expect("ticket");

        assert_eq!(session.view().background(), Some("https://img/sp.jpg"));
        session.fetch(ticket).await;
        assert_eq!(session.view().background(), Some("https://img/sp.jpg"));
    }

    #[tokio::test]
    async fn provider_rejection_shows_message() {
        let weather = Arc::new(FakeWeather {
            reject_with: Some("city not found".into()),
            ..FakeWeather::default()
        });
        let mut session = session_with(weather, Some("https://img/x.jpg"));

        session.search("atlantis").await;
        session.settle().await;

        assert_eq!(session.view().phase(), Phase::Failure);
        assert_eq!(session.view().error_text().as_deref(), Some("city not found"));
        assert!(session.view().background().is_none());
    }

    #[tokio::test]
    async fn denied_location_leaves_view_idle() {
        let weather = Arc::new(FakeWeather::default());
        let mut session = session_with(weather.clone(), None);

        session.mount(&FixedLocator(None)).await;

        assert_eq!(session.view().phase(), Phase::Idle);
        assert!(session.view().error().is_none());
        assert!(session.view().snapshot().is_none());
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn granted_location_fetches_by_coordinates() {
        let weather = Arc::new(FakeWeather::default());
        let mut session = session_with(weather.clone(), None);
        let here = Coordinates { lat: -23.55, lon: -46.63 };

        session.mount(&FixedLocator(Some(here))).await;

        assert_eq!(session.view().phase(), Phase::Success);
        assert_eq!(session.view().city(), "São Paulo");
        let queries = weather.queries.lock().expect("lock");
        assert_eq!(queries.as_slice(), &[LocationQuery::Coords(here)]);
    }

    #[tokio::test]
    async fn language_toggle_does_not_refetch() {
        let weather = Arc::new(FakeWeather::default());
        let mut session = session_with(weather.clone(), None);

        session.search("sao paulo").await;
        session.set_language(Language::En);
        session.set_language(Language::Pt);

        assert_eq!(weather.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.view().phase(), Phase::Success);
    }

    #[tokio::test]
    async fn unconfigured_weather_fails_without_request() {
        let mut session = Session::new(Language::En, None, None);

        session.search("Lisbon").await;

        assert_eq!(session.view().phase(), Phase::Failure);
        assert_eq!(
            session.view().error_text().as_deref(),
            Some("Weather API key is not configured.")
        );
    }
}
