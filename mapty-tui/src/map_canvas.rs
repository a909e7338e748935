// mapty-tui/src/map_canvas.rs
use mapty_lib::{Coords, MapBackend, Marker, TileLayer, Viewport};

/// Map backend drawn with ratatui's canvas. The viewport size is filled in
/// by the renderer on every frame.
#[derive(Debug, Clone)]
pub struct CanvasMap {
    pub viewport: Viewport,
    pub tiles: Option<TileLayer>,
    pub markers: Vec<Marker>,
}

impl CanvasMap {
    pub fn new() -> Self {
        Self {
            viewport: Viewport::new(Coords::new(0.0, 0.0), 0),
            tiles: None,
            markers: Vec::new(),
        }
    }

    /// Markers inside the visible window.
    pub fn visible_markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers
            .iter()
            .filter(|m| self.viewport.contains(m.coords))
    }
}

impl Default for CanvasMap {
    fn default() -> Self {
        Self::new()
    }
}

impl MapBackend for CanvasMap {
    fn set_view(&mut self, center: Coords, zoom: u8, animate: bool) {
        tracing::debug!(%center, zoom, animate, "Moving map view");
        self.viewport.center = center;
        self.viewport.zoom = zoom;
    }

    fn add_tile_layer(&mut self, layer: &TileLayer) {
        self.tiles = Some(layer.clone());
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapty_lib::map::PopupOptions;
    use mapty_lib::{ConfiguredGeolocator, MapAdapter};

    #[test]
    fn initialize_centres_viewport_on_position() {
        let home = Coords::new(48.85, 2.35);
        let adapter = MapAdapter::initialize(
            CanvasMap::new(),
            &ConfiguredGeolocator::new(Some(home)),
            13,
            &TileLayer::default(),
        )
        .unwrap();
        let map = adapter.backend();
        assert_eq!(map.viewport.center, home);
        assert_eq!(map.viewport.zoom, 13);
        assert_eq!(map.markers.len(), 1);
        assert!(map.tiles.is_some());
    }

    #[test]
    fn only_markers_in_view_are_visible() {
        let mut map = CanvasMap::new();
        map.set_view(Coords::new(10.0, 10.0), 10, false);
        map.add_marker(Marker {
            coords: Coords::new(10.0, 10.0),
            label: "here".into(),
            popup: PopupOptions::with_class("running-popup"),
        });
        map.add_marker(Marker {
            coords: Coords::new(-40.0, 120.0),
            label: "far away".into(),
            popup: PopupOptions::with_class("running-popup"),
        });
        let labels: Vec<_> = map.visible_markers().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["here"]);
    }

    #[test]
    fn marker_placed_past_the_antimeridian_is_visible() {
        let mut map = CanvasMap::new();
        map.set_view(Coords::new(0.0, 179.9), 10, false);
        map.viewport.width = 80;
        map.viewport.height = 40;
        let clicked = map.viewport.coords_at(79, 20).unwrap();
        map.add_marker(Marker {
            coords: clicked,
            label: "over the line".into(),
            popup: PopupOptions::with_class("cycling-popup"),
        });
        let labels: Vec<_> = map.visible_markers().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["over the line"]);
    }
}
