//! Core of the Mapty workout log: the workout model, its persistent store,
//! the map adapter, the entry form and the controller that ties them together.
//!
//! Frontends supply the outside world through three traits: [`MapBackend`]
//! draws the map, [`KeyValueStorage`] persists strings and [`Notifier`] shows
//! alerts. Geolocation comes from a [`Geolocator`].

// --- Declare modules ---
pub mod app;
mod config;
pub mod form;
pub mod geolocation;
pub mod map;
pub mod notify;
pub mod sidebar;
pub mod storage;
pub mod store;
pub mod workout;

// --- Expose public types ---
pub use app::{App, AppEvent};
pub use config::{
    parse_color,
    Config,
    Error as ConfigError,
    HomeLocation,
    StandardColor,
    Theme,
};
pub use form::{FormField, FormInput, FormState, WorkoutForm};
pub use geolocation::{ConfiguredGeolocator, GeolocationError, Geolocator};
pub use map::{Coords, HeadlessMap, MapAdapter, MapBackend, Marker, TileLayer, Viewport};
pub use notify::{AlertQueue, Notifier};
pub use sidebar::{Detail, WorkoutRow};
pub use storage::{
    get_storage_path as get_storage_path_util, KeyValueStorage, MemoryStorage, SqliteStorage,
    StorageError,
};
pub use store::{WorkoutStore, STORAGE_KEY};
pub use workout::{Activity, KindInput, Metric, ValidationError, Workout, WorkoutKind};

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Everything a frontend needs at startup: configuration, storage and the
/// geolocation source.
pub struct Environment {
    pub config: Config,
    pub config_path: PathBuf,
    pub storage: SqliteStorage,
    pub geolocator: ConfiguredGeolocator,
}

impl Environment {
    /// Loads config, opens the storage database and sets up geolocation.
    ///
    /// # Errors
    /// Returns `anyhow::Error` if config/storage path determination, loading,
    /// or initialization fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let storage_path =
            storage::get_storage_path().context("Failed to determine storage path")?;
        let storage = SqliteStorage::open(&storage_path)
            .with_context(|| format!("Failed to open storage at {storage_path:?}"))?;

        // A bad MAPTY_POSITION is reported later as a failed position lookup.
        let geolocator = ConfiguredGeolocator::from_env_or(config.home_coords())
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring position override");
                ConfiguredGeolocator::new(None)
            });

        Ok(Self {
            config,
            config_path,
            storage,
            geolocator,
        })
    }
}
