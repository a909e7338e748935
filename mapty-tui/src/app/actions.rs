// mapty-tui/src/app/actions.rs
use mapty_lib::{AppEvent, Coords};
use tracing::info;

use super::state::{ActiveModal, App};

/// Share of the visible span moved by one pan step.
const PAN_STEP: f64 = 0.25;

impl App {
    pub(super) fn click_map(&mut self, coords: Coords) {
        self.controller.handle_event(AppEvent::MapClicked(coords));
    }

    pub(super) fn submit_form(&mut self) {
        if self.controller.submit_form().is_some() {
            // Newest workouts are listed first
            self.sidebar_state.select(Some(0));
        }
    }

    pub(super) fn select_highlighted(&mut self) {
        let Some(index) = self.sidebar_state.selected() else {
            return;
        };
        if let Some(row) = self.rows().into_iter().nth(index) {
            self.controller.handle_event(AppEvent::SidebarClicked(row.id));
        }
    }

    pub(super) fn select_row(&mut self, index: usize) {
        if index < self.controller.workouts().len() {
            self.sidebar_state.select(Some(index));
            self.select_highlighted();
        }
    }

    pub(super) fn sidebar_next(&mut self) {
        let count = self.controller.workouts().len();
        if count == 0 {
            return;
        }
        let i = self.sidebar_state.selected().map_or(0, |i| (i + 1) % count);
        self.sidebar_state.select(Some(i));
    }

    pub(super) fn sidebar_previous(&mut self) {
        let count = self.controller.workouts().len();
        if count == 0 {
            return;
        }
        let i = self
            .sidebar_state
            .selected()
            .map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
        self.sidebar_state.select(Some(i));
    }

    pub(super) fn pan(&mut self, dx: f64, dy: f64) {
        if let Some(map) = self.map_mut() {
            map.viewport.pan_by(dx * PAN_STEP, dy * PAN_STEP);
        }
    }

    pub(super) fn zoom(&mut self, zoom_in: bool) {
        if let Some(map) = self.map_mut() {
            if zoom_in {
                map.viewport.zoom_in();
            } else {
                map.viewport.zoom_out();
            }
        }
    }

    /// Retries locating the user when the map failed to load.
    pub(super) fn reload_map(&mut self) {
        if self.map().is_some() {
            return;
        }
        if self.load_map() {
            info!("Map loaded on retry");
        }
    }

    pub(super) fn confirm_reset(&mut self) {
        self.active_modal = ActiveModal::None;
        self.controller.handle_event(AppEvent::Reset);
        self.sidebar_state.select(None);
        // Start over from a blank map
        self.load_map();
    }
}
