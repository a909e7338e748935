// mapty-lib/src/workout.rs
use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::EnumIter;
use thiserror::Error;

use crate::map::Coords;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Number of trailing timestamp digits kept for the display id.
const ID_DIGITS: usize = 10;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{value} must be a positive number")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{value} is not a finite number")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{value} is not a whole number")]
    NotWholeNumber { field: &'static str, value: f64 },
}

impl ValidationError {
    /// Name of the form field that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NotPositive { field, .. }
            | Self::NotFinite { field, .. }
            | Self::NotWholeNumber { field, .. } => *field,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    /// Capitalized name used in descriptions ("Running", "Cycling").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Running => "🏃",
            Self::Cycling => "🚴",
        }
    }

    /// Style class of the marker popup.
    #[must_use]
    pub const fn popup_class(self) -> &'static str {
        match self {
            Self::Running => "running-popup",
            Self::Cycling => "cycling-popup",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Running => Self::Cycling,
            Self::Cycling => Self::Running,
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant payload of a workout together with its derived metric.
#[derive(Debug, Clone, PartialEq)]
pub enum Activity {
    Running { cadence: u32, pace: f64 },
    Cycling { elevation: f64, speed: f64 },
}

impl Activity {
    #[must_use]
    pub const fn kind(&self) -> WorkoutKind {
        match self {
            Self::Running { .. } => WorkoutKind::Running,
            Self::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// Derived performance metric with its display unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    /// min/km
    Pace(f64),
    /// km/h
    Speed(f64),
}

impl Metric {
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Pace(v) | Self::Speed(v) => v,
        }
    }

    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Pace(_) => "min/km",
            Self::Speed(_) => "km/h",
        }
    }
}

/// The variant-specific number entered with a workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KindInput {
    /// Steps per minute.
    Cadence(f64),
    /// Elevation gain in meters.
    Elevation(f64),
}

/// A single logged exercise session.
///
/// Everything except the click counter is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: String,
    date: DateTime<Utc>,
    coords: Coords,
    distance: f64,
    duration: f64,
    description: String,
    clicks: u32,
    activity: Activity,
}

fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field, value });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(value)
}

fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite { field, value })
    }
}

fn whole(field: &'static str, value: f64) -> Result<u32, ValidationError> {
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(ValidationError::NotWholeNumber { field, value });
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = value as u32;
    Ok(whole)
}

/// Builds the display id from the trailing digits of the millisecond timestamp.
#[must_use]
pub fn id_from_date(date: DateTime<Utc>) -> String {
    let millis = date.timestamp_millis().to_string();
    let start = millis.len().saturating_sub(ID_DIGITS);
    millis[start..].to_string()
}

/// "Running on May 1" style label, rendered in local time.
#[must_use]
pub fn describe(kind: WorkoutKind, date: DateTime<Utc>) -> String {
    let local = date.with_timezone(&Local);
    let month = MONTHS[local.month0() as usize];
    format!("{} on {} {}", kind.label(), month, local.day())
}

impl Workout {
    /// Validates the inputs and builds a workout stamped with the current time.
    ///
    /// # Errors
    /// Returns the first failing field in form order: distance, duration, then
    /// cadence or elevation.
    pub fn create(
        coords: Coords,
        distance: f64,
        duration: f64,
        input: KindInput,
    ) -> Result<Self, ValidationError> {
        Self::create_at(Utc::now(), coords, distance, duration, input)
    }

    /// Same as [`Workout::create`] with an explicit creation time.
    ///
    /// # Errors
    /// See [`Workout::create`].
    pub fn create_at(
        date: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        input: KindInput,
    ) -> Result<Self, ValidationError> {
        let distance = positive("distance", distance)?;
        let duration = positive("duration", duration)?;

        let activity = match input {
            KindInput::Cadence(cadence) => {
                let cadence = whole("cadence", positive("cadence", cadence)?)?;
                Activity::Running {
                    cadence,
                    pace: duration / distance,
                }
            }
            KindInput::Elevation(elevation) => Activity::Cycling {
                elevation: finite("elevation", elevation)?,
                speed: distance / (duration / 60.0),
            },
        };

        Ok(Self {
            id: id_from_date(date),
            date,
            coords,
            distance,
            duration,
            description: describe(activity.kind(), date),
            clicks: 0,
            activity,
        })
    }

    /// Registers one selection of this workout.
    pub fn click(&mut self) {
        self.clicks += 1;
    }

    #[must_use]
    pub fn describe(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    #[must_use]
    pub const fn coords(&self) -> Coords {
        self.coords
    }

    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    #[must_use]
    pub const fn clicks(&self) -> u32 {
        self.clicks
    }

    #[must_use]
    pub const fn activity(&self) -> &Activity {
        &self.activity
    }

    #[must_use]
    pub const fn kind(&self) -> WorkoutKind {
        self.activity.kind()
    }

    #[must_use]
    pub const fn icon(&self) -> &'static str {
        self.kind().icon()
    }

    #[must_use]
    pub const fn popup_class(&self) -> &'static str {
        self.kind().popup_class()
    }

    /// Pace in min/km; `None` for cycling.
    #[must_use]
    pub const fn pace(&self) -> Option<f64> {
        match self.activity {
            Activity::Running { pace, .. } => Some(pace),
            Activity::Cycling { .. } => None,
        }
    }

    /// Speed in km/h; `None` for running.
    #[must_use]
    pub const fn speed(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling { speed, .. } => Some(speed),
            Activity::Running { .. } => None,
        }
    }

    #[must_use]
    pub const fn metric(&self) -> Metric {
        match self.activity {
            Activity::Running { pace, .. } => Metric::Pace(pace),
            Activity::Cycling { speed, .. } => Metric::Speed(speed),
        }
    }

    /// Label shown in the map popup.
    #[must_use]
    pub fn popup_label(&self) -> String {
        format!("{} {}", self.icon(), self.description)
    }
}

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("record {id:?} has neither cadence nor elevation")]
    MissingKind { id: String },
    #[error("record {id:?} is invalid: {source}")]
    Invalid {
        id: String,
        #[source]
        source: ValidationError,
    },
}

/// Plain data shape of a workout in persistent storage.
///
/// `type`, `pace`, `speed` and `description` are written for readers of the raw
/// JSON; restoring relies only on the measured fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub date: DateTime<Utc>,
    pub id: String,
    #[serde(default)]
    pub clicks: u32,
    pub coords: Coords,
    pub distance: f64,
    pub duration: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<WorkoutKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default)]
    pub description: String,
}

impl Workout {
    #[must_use]
    pub fn to_record(&self) -> WorkoutRecord {
        let (cadence, pace, elevation, speed) = match self.activity {
            Activity::Running { cadence, pace } => (Some(f64::from(cadence)), Some(pace), None, None),
            Activity::Cycling { elevation, speed } => (None, None, Some(elevation), Some(speed)),
        };
        WorkoutRecord {
            date: self.date,
            id: self.id.clone(),
            clicks: self.clicks,
            coords: self.coords,
            distance: self.distance,
            duration: self.duration,
            kind: Some(self.kind()),
            cadence,
            pace,
            elevation,
            speed,
            description: self.description.clone(),
        }
    }

    /// Rebuilds a workout from storage, recomputing the derived metric and
    /// description instead of trusting the stored ones.
    ///
    /// # Errors
    /// Fails when the variant cannot be determined or a number is out of range.
    pub fn from_record(record: WorkoutRecord) -> Result<Self, RecordError> {
        let input = match (record.cadence, record.elevation) {
            (Some(cadence), _) => KindInput::Cadence(cadence),
            (None, Some(elevation)) => KindInput::Elevation(elevation),
            (None, None) => return Err(RecordError::MissingKind { id: record.id }),
        };
        let mut workout = Self::create_at(
            record.date,
            record.coords,
            record.distance,
            record.duration,
            input,
        )
        .map_err(|source| RecordError::Invalid {
            id: record.id.clone(),
            source,
        })?;
        workout.id = record.id;
        workout.clicks = record.clicks;
        Ok(workout)
    }
}
