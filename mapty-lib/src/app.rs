// mapty-lib/src/app.rs
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info, warn};

use crate::form::{FormInput, WorkoutForm};
use crate::geolocation::Geolocator;
use crate::map::{Coords, MapAdapter, MapBackend, TileLayer};
use crate::notify::Notifier;
use crate::sidebar::WorkoutRow;
use crate::storage::KeyValueStorage;
use crate::store::WorkoutStore;
use crate::workout::{ValidationError, Workout};

/// User actions the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    MapClicked(Coords),
    ToggleType,
    Submit,
    Cancel,
    SidebarClicked(String),
    Reset,
}

/// Owns the workouts, the map and the form, and ties user actions to them.
pub struct App<S: KeyValueStorage, B: MapBackend, N: Notifier> {
    store: WorkoutStore<S>,
    map: Option<MapAdapter<B>>,
    form: WorkoutForm,
    notifier: N,
    zoom_level: u8,
}

impl<S: KeyValueStorage, B: MapBackend, N: Notifier> App<S, B, N> {
    /// Creates the controller and restores saved workouts. The map comes later
    /// through [`App::load_map`].
    pub fn new(storage: S, notifier: N, zoom_level: u8) -> Self {
        let mut store = WorkoutStore::new(storage);
        store.restore();
        info!(workouts = store.len(), "Application started");
        Self {
            store,
            map: None,
            form: WorkoutForm::default(),
            notifier,
            zoom_level,
        }
    }

    /// Locates the user and brings up the map, then draws a marker for every
    /// known workout. On failure the user is alerted and the app keeps running
    /// without a map.
    pub fn load_map(&mut self, backend: B, geolocator: &dyn Geolocator, tiles: &TileLayer) -> bool {
        match MapAdapter::initialize(backend, geolocator, self.zoom_level, tiles) {
            Ok(mut map) => {
                for workout in self.store.all() {
                    map.place_marker(workout.coords(), &workout.popup_label(), workout.popup_class());
                }
                self.map = Some(map);
                true
            }
            Err(e) => {
                warn!(error = %e, "Map unavailable");
                self.notifier.alert(&e.to_string());
                false
            }
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::MapClicked(coords) => self.show_form(coords),
            AppEvent::ToggleType => self.form.toggle_fieldset(),
            AppEvent::Submit => {
                self.submit_form();
            }
            AppEvent::Cancel => self.cancel_form(),
            AppEvent::SidebarClicked(id) => {
                self.select_workout(&id);
            }
            AppEvent::Reset => self.reset(),
        }
    }

    pub fn show_form(&mut self, coords: Coords) {
        debug!(%coords, "Map clicked");
        self.form.show(coords);
    }

    pub fn cancel_form(&mut self) {
        self.form.hide();
    }

    /// Turns the visible form into a workout.
    ///
    /// Returns the new workout's id, or `None` when the form is hidden or the
    /// input was rejected (the user has been alerted and the form stays open).
    pub fn submit_form(&mut self) -> Option<String> {
        let coords = self.form.pending_coords()?;
        let input = self.form.read();
        match self.add_workout(coords, input) {
            Ok(id) => {
                self.form.hide();
                Some(id)
            }
            Err(e) => {
                debug!(error = %e, field = e.field(), "Rejected workout input");
                self.notifier.alert(&e.to_string());
                None
            }
        }
    }

    /// Validates and records a workout: stores it, draws its marker and saves
    /// the list.
    ///
    /// # Errors
    /// Returns the validation failure; nothing is recorded in that case.
    pub fn add_workout(&mut self, coords: Coords, input: FormInput) -> Result<String, ValidationError> {
        let workout = Workout::create_at(
            self.next_timestamp(),
            coords,
            input.distance,
            input.duration,
            input.kind_input(),
        )?;
        let id = workout.id().to_string();
        info!(id = %id, kind = %workout.kind(), "Workout added");

        if let Some(map) = self.map.as_mut() {
            map.place_marker(workout.coords(), &workout.popup_label(), workout.popup_class());
        }
        self.store.append(workout);
        self.save();
        Ok(id)
    }

    /// Sidebar selection: pans to the workout and counts the click.
    /// Unknown ids are ignored.
    pub fn select_workout(&mut self, id: &str) -> bool {
        let Some(workout) = self.store.find_by_id_mut(id) else {
            debug!(id, "No workout with this id");
            return false;
        };
        workout.click();
        let coords = workout.coords();
        if let Some(map) = self.map.as_mut() {
            map.pan_to(coords, self.zoom_level);
        }
        self.save();
        true
    }

    /// Forgets every workout, saved or not, and returns to a blank state
    /// without a map; call [`App::load_map`] again to reload it.
    pub fn reset(&mut self) {
        if let Err(e) = self.store.clear() {
            error!(error = %e, "Could not clear saved workouts");
            self.notifier
                .alert(&format!("Could not clear saved workouts: {e}"));
        }
        self.form = WorkoutForm::default();
        self.map = None;
        info!("Application reset");
    }

    /// Sidebar entries, newest first.
    #[must_use]
    pub fn rows(&self) -> Vec<WorkoutRow> {
        self.store.all().iter().rev().map(WorkoutRow::from).collect()
    }

    #[must_use]
    pub fn workouts(&self) -> &[Workout] {
        self.store.all()
    }

    #[must_use]
    pub const fn store(&self) -> &WorkoutStore<S> {
        &self.store
    }

    #[must_use]
    pub const fn form(&self) -> &WorkoutForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut WorkoutForm {
        &mut self.form
    }

    #[must_use]
    pub const fn map(&self) -> Option<&MapAdapter<B>> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut MapAdapter<B>> {
        self.map.as_mut()
    }

    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    fn save(&mut self) {
        if let Err(e) = self.store.persist() {
            error!(error = %e, "Could not save workouts");
            self.notifier.alert(&format!("Could not save workouts: {e}"));
        }
    }

    /// Current time, bumped past the newest workout so ids never repeat.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.store.all().last() {
            Some(last) if last.date().timestamp_millis() >= now.timestamp_millis() => {
                last.date() + Duration::milliseconds(1)
            }
            _ => now,
        }
    }
}
