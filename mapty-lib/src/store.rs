// mapty-lib/src/store.rs
use tracing::{debug, warn};

use crate::storage::{KeyValueStorage, StorageError};
use crate::workout::{Workout, WorkoutRecord};

/// Key under which the workout list is persisted.
pub const STORAGE_KEY: &str = "workouts";

/// Workouts in creation order, backed by key/value storage.
pub struct WorkoutStore<S: KeyValueStorage> {
    storage: S,
    workouts: Vec<Workout>,
}

impl<S: KeyValueStorage> WorkoutStore<S> {
    /// An empty store; call [`WorkoutStore::restore`] to load saved workouts.
    pub const fn new(storage: S) -> Self {
        Self {
            storage,
            workouts: Vec::new(),
        }
    }

    pub fn append(&mut self, workout: Workout) {
        self.workouts.push(workout);
    }

    #[must_use]
    pub fn all(&self) -> &[Workout] {
        &self.workouts
    }

    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Workout> {
        self.workouts.iter_mut().find(|w| w.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    /// Writes every workout as one JSON array under [`STORAGE_KEY`].
    ///
    /// # Errors
    /// Fails if serialization or the storage write fails.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        let records: Vec<WorkoutRecord> = self.workouts.iter().map(Workout::to_record).collect();
        let json = serde_json::to_string(&records)?;
        self.storage.set_item(STORAGE_KEY, &json)?;
        debug!(count = records.len(), "Persisted workouts");
        Ok(())
    }

    /// Replaces the in-memory list with what storage holds.
    ///
    /// Missing, unreadable or malformed data leaves the store empty. Records
    /// that cannot be rebuilt are skipped.
    pub fn restore(&mut self) {
        self.workouts.clear();

        let raw = match self.storage.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "Could not read saved workouts");
                return;
            }
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                warn!(error = %e, "Saved workouts are malformed, starting empty");
                return;
            }
        };

        for value in values {
            let restored = serde_json::from_value::<WorkoutRecord>(value)
                .map_err(|e| e.to_string())
                .and_then(|record| Workout::from_record(record).map_err(|e| e.to_string()));
            match restored {
                Ok(workout) => self.workouts.push(workout),
                Err(e) => warn!(error = %e, "Skipping saved workout"),
            }
        }
        debug!(count = self.workouts.len(), "Restored workouts");
    }

    /// Empties the store and removes the persisted key.
    ///
    /// # Errors
    /// Fails if the storage key cannot be removed; memory is cleared anyway.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.workouts.clear();
        self.storage.remove_item(STORAGE_KEY)
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
