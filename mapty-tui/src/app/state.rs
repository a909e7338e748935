// mapty-tui/src/app/state.rs
use mapty_lib::{
    AlertQueue, ConfiguredGeolocator, Environment, SqliteStorage, TileLayer, WorkoutRow,
};
use ratatui::{layout::Rect, style::Color, widgets::ListState};
use std::time::{Duration, Instant};

use crate::map_canvas::CanvasMap;

pub type Controller = mapty_lib::App<SqliteStorage, CanvasMap, AlertQueue>;

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActiveModal {
    None,
    Help,
    Alert(String),
    ConfirmReset,
}

// Holds the application state
pub struct App {
    pub controller: Controller,
    pub geolocator: ConfiguredGeolocator,
    pub tiles: TileLayer,
    pub accent: Color,
    pub should_quit: bool,
    pub active_modal: ActiveModal,
    pub last_error: Option<String>,
    pub sidebar_state: ListState,

    // Screen areas from the last frame, used to place mouse clicks
    pub map_area: Rect,
    pub sidebar_list_area: Rect,

    error_clear_time: Option<Instant>,
}

impl App {
    pub fn new(env: Environment, accent: Color) -> Self {
        let controller = Controller::new(env.storage, AlertQueue::new(), env.config.zoom_level);
        let mut app = Self {
            controller,
            geolocator: env.geolocator,
            tiles: env.config.tiles,
            accent,
            should_quit: false,
            active_modal: ActiveModal::None,
            last_error: None,
            sidebar_state: ListState::default(),
            map_area: Rect::default(),
            sidebar_list_area: Rect::default(),
            error_clear_time: None,
        };
        if !app.controller.workouts().is_empty() {
            app.sidebar_state.select(Some(0));
        }
        app
    }

    /// Loads the map around the current position.
    pub fn load_map(&mut self) -> bool {
        self.controller
            .load_map(CanvasMap::new(), &self.geolocator, &self.tiles)
    }

    pub fn map(&self) -> Option<&CanvasMap> {
        self.controller.map().map(|m| m.backend())
    }

    pub fn map_mut(&mut self) -> Option<&mut CanvasMap> {
        self.controller.map_mut().map(|m| m.backend_mut())
    }

    pub fn rows(&self) -> Vec<WorkoutRow> {
        self.controller.rows()
    }

    pub fn set_error(&mut self, msg: String) {
        self.last_error = Some(msg);
        self.error_clear_time = Some(Instant::now() + ERROR_DISPLAY_TIME);
    }

    /// Per-frame housekeeping: expires the status error and brings up the
    /// next pending alert.
    pub fn tick(&mut self) {
        if let Some(clear_time) = self.error_clear_time {
            if Instant::now() >= clear_time {
                self.last_error = None;
                self.error_clear_time = None;
            }
        }

        if self.active_modal == ActiveModal::None {
            if let Some(message) = self.controller.notifier_mut().pop() {
                self.active_modal = ActiveModal::Alert(message);
            }
        }

        let count = self.controller.workouts().len();
        match self.sidebar_state.selected() {
            _ if count == 0 => self.sidebar_state.select(None),
            Some(i) if i >= count => self.sidebar_state.select(Some(count - 1)),
            None => self.sidebar_state.select(Some(0)),
            Some(_) => {}
        }
    }
}
