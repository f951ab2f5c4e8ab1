use crate::gemini::model::Location;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum GeolocationError {
    #[error("location access denied")]
    Denied,
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// One-shot device position lookup.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> Result<Location, GeolocationError>;
}

/// A position known up front, e.g. from configuration.
pub struct FixedLocation(pub Option<Location>);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Location, GeolocationError> {
        self.0
            .ok_or_else(|| GeolocationError::Unavailable("no position configured".to_string()))
    }
}

/// Failures just mean there is no location.
pub async fn locate(provider: &dyn LocationProvider) -> Option<Location> {
    match provider.current_location().await {
        Ok(location) => {
            debug!("Located at {}, {}", location.lat, location.lng);
            Some(location)
        }
        Err(e) => {
            warn!("Continuing without location: {}", e);
            None
        }
    }
}
