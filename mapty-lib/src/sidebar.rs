// mapty-lib/src/sidebar.rs
use crate::workout::{Activity, Workout, WorkoutKind};

/// One icon/value/unit cell of a sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

impl Detail {
    fn new(icon: &'static str, value: String, unit: &'static str) -> Self {
        Self { icon, value, unit }
    }
}

/// Display model of a workout in the sidebar list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutRow {
    pub id: String,
    pub kind: WorkoutKind,
    pub title: String,
    pub details: Vec<Detail>,
    pub clicks: u32,
}

impl From<&Workout> for WorkoutRow {
    fn from(workout: &Workout) -> Self {
        let mut details = vec![
            Detail::new(workout.icon(), workout.distance().to_string(), "km"),
            Detail::new("⏱", workout.duration().to_string(), "min"),
        ];
        let metric = workout.metric();
        details.push(Detail::new("⚡", format!("{:.1}", metric.value()), metric.unit()));
        details.push(match *workout.activity() {
            Activity::Running { cadence, .. } => Detail::new("🦶", cadence.to_string(), "spm"),
            Activity::Cycling { elevation, .. } => Detail::new("⛰", elevation.to_string(), "m"),
        });
        Self {
            id: workout.id().to_string(),
            kind: workout.kind(),
            title: workout.describe().to_string(),
            details,
            clicks: workout.clicks(),
        }
    }
}

impl WorkoutRow {
    /// Details joined on one line, e.g. `🏃 5 km  ⏱ 25 min  ⚡ 5.0 min/km  🦶 180 spm`.
    #[must_use]
    pub fn summary(&self) -> String {
        self.details
            .iter()
            .map(|d| format!("{} {} {}", d.icon, d.value, d.unit))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Coords;
    use crate::workout::KindInput;

    #[test]
    fn running_row_shows_pace_and_cadence() {
        let w = Workout::create(Coords::new(0.0, 0.0), 5.0, 27.0, KindInput::Cadence(180.0))
            .unwrap();
        let row = WorkoutRow::from(&w);
        let values: Vec<_> = row.details.iter().map(|d| (d.value.as_str(), d.unit)).collect();
        assert_eq!(
            values,
            vec![("5", "km"), ("27", "min"), ("5.4", "min/km"), ("180", "spm")]
        );
        assert_eq!(row.title, w.describe());
    }

    #[test]
    fn cycling_row_shows_speed_and_elevation() {
        let w = Workout::create(Coords::new(0.0, 0.0), 12.5, 45.0, KindInput::Elevation(-30.0))
            .unwrap();
        let row = WorkoutRow::from(&w);
        assert_eq!(
            row.summary(),
            "🚴 12.5 km  ⏱ 45 min  ⚡ 16.7 km/h  ⛰ -30 m"
        );
    }
}
