use thiserror::Error;

/// Failure of a weather lookup. The `Display` text is what the user sees.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weather API key is not configured.")]
    MissingCredential,

    /// Non-success response; carries the provider's own message verbatim.
    #[error("{0}")]
    Provider(String),

    /// No usable response: network failure or a body that could not be decoded.
    #[error("An error occurred while fetching the weather data.")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl WeatherError {
    pub(crate) fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        WeatherError::Transport(Box::new(err))
    }
}

/// Failure to obtain the user's position.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
}
