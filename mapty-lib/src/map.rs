// mapty-lib/src/map.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::geolocation::{GeolocationError, Geolocator};

pub const DEFAULT_ZOOM_LEVEL: u8 = 13;
pub const MAX_ZOOM_LEVEL: u8 = 18;
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
pub const DEFAULT_TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const CURRENT_LOCATION_LABEL: &str = "Current Location";

/// Latitude/longitude pair, stored as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both values are finite and inside the usual WGS84 ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupOptions {
    pub max_width: u16,
    pub min_width: u16,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub class_name: String,
}

impl PopupOptions {
    #[must_use]
    pub fn with_class(class_name: &str) -> Self {
        Self {
            max_width: 250,
            min_width: 100,
            auto_close: false,
            close_on_click: false,
            class_name: class_name.to_string(),
        }
    }
}

/// A map marker with its bound popup, opened on placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub coords: Coords,
    pub label: String,
    pub popup: PopupOptions,
}

/// The rendering library behind the adapter.
pub trait MapBackend {
    fn set_view(&mut self, center: Coords, zoom: u8, animate: bool);
    fn add_tile_layer(&mut self, layer: &TileLayer);
    fn add_marker(&mut self, marker: Marker);
}

/// Visible window of the map measured in terminal cells.
///
/// Longitude span is `360 / 2^zoom` degrees and latitude span is half that,
/// both clamped to the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Coords,
    pub zoom: u8,
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    #[must_use]
    pub const fn new(center: Coords, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            width: 0,
            height: 0,
        }
    }

    #[must_use]
    pub fn lng_span(&self) -> f64 {
        (360.0 / 2f64.powi(i32::from(self.zoom))).min(360.0)
    }

    #[must_use]
    pub fn lat_span(&self) -> f64 {
        (self.lng_span() / 2.0).min(180.0)
    }

    /// `[min, max]` longitude bounds.
    #[must_use]
    pub fn x_bounds(&self) -> [f64; 2] {
        let half = self.lng_span() / 2.0;
        [self.center.lng - half, self.center.lng + half]
    }

    /// `[min, max]` latitude bounds.
    #[must_use]
    pub fn y_bounds(&self) -> [f64; 2] {
        let half = self.lat_span() / 2.0;
        [self.center.lat - half, self.center.lat + half]
    }

    /// Coordinates under a cell, relative to the top-left of the map area.
    #[must_use]
    pub fn coords_at(&self, column: u16, row: u16) -> Option<Coords> {
        if column >= self.width || row >= self.height {
            return None;
        }
        let [x_min, x_max] = self.x_bounds();
        let [y_min, y_max] = self.y_bounds();
        // Sample the middle of the cell; rows grow downwards, latitude upwards.
        let fx = (f64::from(column) + 0.5) / f64::from(self.width);
        let fy = (f64::from(row) + 0.5) / f64::from(self.height);
        let lng = x_min + fx * (x_max - x_min);
        let lat = y_max - fy * (y_max - y_min);
        Some(Coords::new(lat.clamp(-90.0, 90.0), wrap_lng(lng)))
    }

    /// Longitude shifted by whole turns into `[x_min, x_min + 360)`, the frame
    /// the window is drawn in. Only differs from `lng` when the view straddles
    /// the antimeridian.
    #[must_use]
    pub fn frame_lng(&self, lng: f64) -> f64 {
        let [x_min, _] = self.x_bounds();
        x_min + (lng - x_min).rem_euclid(360.0)
    }

    #[must_use]
    pub fn contains(&self, coords: Coords) -> bool {
        let [x_min, x_max] = self.x_bounds();
        let [y_min, y_max] = self.y_bounds();
        (x_min..=x_max).contains(&self.frame_lng(coords.lng))
            && (y_min..=y_max).contains(&coords.lat)
    }

    pub fn zoom_in(&mut self) {
        self.zoom = self.zoom.saturating_add(1).min(MAX_ZOOM_LEVEL);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1);
    }

    /// Moves the centre by a fraction of the visible span.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let lat = self.center.lat + dy * self.lat_span();
        let lng = self.center.lng + dx * self.lng_span();
        self.center = Coords::new(lat.clamp(-90.0, 90.0), wrap_lng(lng));
    }
}

fn wrap_lng(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// The app's handle on a ready map.
pub struct MapAdapter<B: MapBackend> {
    backend: B,
}

impl<B: MapBackend> MapAdapter<B> {
    /// Locates the user, centres the map there and sets up the tile layer and
    /// the "Current Location" marker.
    ///
    /// # Errors
    /// Propagates the geolocation failure; nothing is drawn in that case.
    pub fn initialize(
        mut backend: B,
        geolocator: &dyn Geolocator,
        zoom_level: u8,
        tiles: &TileLayer,
    ) -> Result<Self, GeolocationError> {
        let position = geolocator.current_position()?;
        info!(%position, zoom_level, "Map ready");

        backend.set_view(position, zoom_level, false);
        backend.add_tile_layer(tiles);
        backend.add_marker(Marker {
            coords: position,
            label: CURRENT_LOCATION_LABEL.to_string(),
            popup: PopupOptions::with_class("running-popup"),
        });

        Ok(Self { backend })
    }

    /// Adds a new marker with an open popup; repeated calls add duplicates.
    pub fn place_marker(&mut self, coords: Coords, popup_label: &str, style_class: &str) {
        debug!(%coords, popup_label, style_class, "Placing marker");
        self.backend.add_marker(Marker {
            coords,
            label: popup_label.to_string(),
            popup: PopupOptions::with_class(style_class),
        });
    }

    pub fn pan_to(&mut self, coords: Coords, zoom_level: u8) {
        self.backend.set_view(coords, zoom_level, true);
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

/// In-memory backend that keeps the map state without drawing anything.
#[derive(Debug, Clone, Default)]
pub struct HeadlessMap {
    pub view: Option<(Coords, u8)>,
    pub tile_layer: Option<TileLayer>,
    pub markers: Vec<Marker>,
    pub animated_moves: usize,
}

impl MapBackend for HeadlessMap {
    fn set_view(&mut self, center: Coords, zoom: u8, animate: bool) {
        self.view = Some((center, zoom));
        if animate {
            self.animated_moves += 1;
        }
    }

    fn add_tile_layer(&mut self, layer: &TileLayer) {
        self.tile_layer = Some(layer.clone());
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::ConfiguredGeolocator;

    #[test]
    fn coords_serialize_as_pair() {
        let json = serde_json::to_string(&Coords::new(51.5, -0.1)).unwrap();
        assert_eq!(json, "[51.5,-0.1]");
        let back: Coords = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Coords::new(51.5, -0.1));
    }

    #[test]
    fn initialize_sets_view_tiles_and_home_marker() {
        let geo = ConfiguredGeolocator::new(Some(Coords::new(48.85, 2.35)));
        let map = MapAdapter::initialize(HeadlessMap::default(), &geo, 13, &TileLayer::default())
            .unwrap();
        let backend = map.backend();
        assert_eq!(backend.view, Some((Coords::new(48.85, 2.35), 13)));
        assert_eq!(backend.tile_layer, Some(TileLayer::default()));
        assert_eq!(backend.markers.len(), 1);
        assert_eq!(backend.markers[0].label, CURRENT_LOCATION_LABEL);
        assert_eq!(backend.animated_moves, 0);
    }

    #[test]
    fn initialize_fails_without_position() {
        let geo = ConfiguredGeolocator::new(None);
        let result =
            MapAdapter::initialize(HeadlessMap::default(), &geo, 13, &TileLayer::default());
        assert!(matches!(result, Err(GeolocationError::Unavailable)));
    }

    #[test]
    fn place_marker_never_deduplicates() {
        let geo = ConfiguredGeolocator::new(Some(Coords::new(0.0, 0.0)));
        let mut map =
            MapAdapter::initialize(HeadlessMap::default(), &geo, 13, &TileLayer::default())
                .unwrap();
        let spot = Coords::new(1.0, 1.0);
        map.place_marker(spot, "a", "cycling-popup");
        map.place_marker(spot, "a", "cycling-popup");
        assert_eq!(map.backend().markers.len(), 3);
        assert_eq!(map.backend().markers[2].popup.class_name, "cycling-popup");
        assert!(!map.backend().markers[2].popup.auto_close);
    }

    #[test]
    fn viewport_maps_cells_to_coordinates() {
        let mut vp = Viewport::new(Coords::new(0.0, 0.0), 0);
        vp.width = 4;
        vp.height = 2;
        // Zoom 0 shows 360 x 180 degrees.
        let top_left = vp.coords_at(0, 0).unwrap();
        assert_eq!(top_left, Coords::new(45.0, -135.0));
        let bottom_right = vp.coords_at(3, 1).unwrap();
        assert_eq!(bottom_right, Coords::new(-45.0, 135.0));
        assert!(vp.coords_at(4, 0).is_none());
    }

    #[test]
    fn viewport_zoom_is_bounded() {
        let mut vp = Viewport::new(Coords::new(0.0, 0.0), MAX_ZOOM_LEVEL);
        vp.zoom_in();
        assert_eq!(vp.zoom, MAX_ZOOM_LEVEL);
        vp.zoom = 0;
        vp.zoom_out();
        assert_eq!(vp.zoom, 0);
    }

    #[test]
    fn panning_wraps_longitude() {
        let mut vp = Viewport::new(Coords::new(0.0, 170.0), 2);
        vp.pan_by(0.5, 0.0);
        assert!((vp.center.lng - (-145.0)).abs() < 1e-9);
    }

    #[test]
    fn clicks_across_the_antimeridian_stay_in_view() {
        let mut vp = Viewport::new(Coords::new(0.0, 179.9), 10);
        vp.width = 80;
        vp.height = 40;
        let [x_min, x_max] = vp.x_bounds();
        assert!(x_max > 180.0);

        let east = vp.coords_at(79, 20).unwrap();
        assert!(east.lng < -179.0);
        assert!(vp.contains(east));
        let drawn = vp.frame_lng(east.lng);
        assert!(drawn > 180.0 && drawn <= x_max);

        let west = vp.coords_at(0, 20).unwrap();
        assert!(vp.contains(west));
        assert!((vp.frame_lng(west.lng) - west.lng).abs() < 1e-9);
        assert!(vp.frame_lng(west.lng) >= x_min);

        assert!(!vp.contains(Coords::new(0.0, 0.0)));
    }
}
