use async_trait::async_trait;

use crate::{error::LocationError, model::Coordinates};

/// One-shot source of the user's current position.
#[async_trait]
pub trait Locator: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// Locator backed by a known position; `None` behaves like a refused permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocator(pub Option<Coordinates>);

#[async_trait]
impl Locator for FixedLocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        self.0.ok_or(LocationError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_locator_is_denied() {
        let err = FixedLocator(None).locate().await.unwrap_err();
        assert!(matches!(err, LocationError::PermissionDenied));
    }

    #[tokio::test]
    async fn fixed_locator_reports_position() {
        let here = Coordinates { lat: 38.72, lon: -9.14 };
        assert_eq!(FixedLocator(Some(here)).locate().await.unwrap(), here);
    }
}
