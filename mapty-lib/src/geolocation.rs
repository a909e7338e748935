// mapty-lib/src/geolocation.rs
use thiserror::Error;
use tracing::debug;

use crate::map::Coords;

/// Environment variable holding a `"lat,lng"` position override.
pub const POSITION_ENV_VAR: &str = "MAPTY_POSITION";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("Could not get your position!")]
    Unavailable,
    #[error("Could not get your position! Permission denied.")]
    Denied,
    #[error("Could not get your position! Invalid position: {0}")]
    Invalid(String),
}

/// One-shot source of the user's current position.
pub trait Geolocator {
    /// # Errors
    /// Fails when no position can be produced.
    fn current_position(&self) -> Result<Coords, GeolocationError>;
}

/// Reports a position fixed by configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredGeolocator {
    position: Option<Coords>,
    denied: bool,
}

impl ConfiguredGeolocator {
    #[must_use]
    pub const fn new(position: Option<Coords>) -> Self {
        Self {
            position,
            denied: false,
        }
    }

    /// A geolocator that always refuses permission.
    #[must_use]
    pub const fn denied() -> Self {
        Self {
            position: None,
            denied: true,
        }
    }

    /// Prefers `MAPTY_POSITION` over the configured home location.
    ///
    /// # Errors
    /// Returns `Invalid` when the environment variable is set but unusable.
    pub fn from_env_or(home: Option<Coords>) -> Result<Self, GeolocationError> {
        match std::env::var(POSITION_ENV_VAR) {
            Ok(raw) => {
                let coords = parse_position(&raw)?;
                debug!(%coords, "Using position from {}", POSITION_ENV_VAR);
                Ok(Self::new(Some(coords)))
            }
            Err(_) => Ok(Self::new(home)),
        }
    }
}

impl Geolocator for ConfiguredGeolocator {
    fn current_position(&self) -> Result<Coords, GeolocationError> {
        if self.denied {
            return Err(GeolocationError::Denied);
        }
        let coords = self.position.ok_or(GeolocationError::Unavailable)?;
        if coords.is_valid() {
            Ok(coords)
        } else {
            Err(GeolocationError::Invalid(coords.to_string()))
        }
    }
}

/// Parses `"lat,lng"` into coordinates.
///
/// # Errors
/// Returns `Invalid` for malformed or out-of-range input.
pub fn parse_position(raw: &str) -> Result<Coords, GeolocationError> {
    let invalid = || GeolocationError::Invalid(raw.to_string());
    let (lat, lng) = raw.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
    let coords = Coords::new(lat, lng);
    if coords.is_valid() {
        Ok(coords)
    } else {
        Err(invalid())
    }
}
