// mapty-lib/src/form.rs
use std::time::{Duration, Instant};

use crate::map::Coords;
use crate::workout::{KindInput, WorkoutKind};

/// How long the form stays undisplayed after hiding.
pub const HIDE_TRANSITION: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Type,
    Distance,
    Duration,
    Cadence,
    Elevation,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FormState {
    Hidden,
    /// Holds the map click the workout will be placed at.
    Visible { pending: Coords },
}

/// Parsed form values, before validation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormInput {
    pub kind: WorkoutKind,
    pub distance: f64,
    pub duration: f64,
    pub cadence: f64,
    pub elevation: f64,
}

impl FormInput {
    /// The variant field that matters for the selected type.
    #[must_use]
    pub const fn kind_input(&self) -> KindInput {
        match self.kind {
            WorkoutKind::Running => KindInput::Cadence(self.cadence),
            WorkoutKind::Cycling => KindInput::Elevation(self.elevation),
        }
    }
}

/// Lenient number parsing: blank is 0, junk is NaN.
#[must_use]
pub fn parse_number(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

/// The workout-entry form.
#[derive(Clone, Debug)]
pub struct WorkoutForm {
    state: FormState,
    kind: WorkoutKind,
    pub distance_input: String,
    pub duration_input: String,
    pub cadence_input: String,
    pub elevation_input: String,
    focused_field: FormField,
    transition_until: Option<Instant>,
}

impl Default for WorkoutForm {
    fn default() -> Self {
        Self {
            state: FormState::Hidden,
            kind: WorkoutKind::Running,
            distance_input: String::new(),
            duration_input: String::new(),
            cadence_input: String::new(),
            elevation_input: String::new(),
            focused_field: FormField::Distance,
            transition_until: None,
        }
    }
}

impl WorkoutForm {
    /// Opens the form for a map click and focuses the distance field.
    pub fn show(&mut self, pending: Coords) {
        self.state = FormState::Visible { pending };
        self.focused_field = FormField::Distance;
        self.transition_until = None;
    }

    /// Closes the form and clears the numbers; the selected type is kept.
    pub fn hide(&mut self) {
        self.distance_input.clear();
        self.duration_input.clear();
        self.cadence_input.clear();
        self.elevation_input.clear();
        self.state = FormState::Hidden;
        self.focused_field = FormField::Distance;
        self.transition_until = Some(Instant::now() + HIDE_TRANSITION);
    }

    /// Swaps which of cadence/elevation is shown by flipping the type.
    pub fn toggle_fieldset(&mut self) {
        self.kind = self.kind.toggled();
        if matches!(self.focused_field, FormField::Cadence | FormField::Elevation) {
            self.focused_field = self.metric_field();
        }
    }

    pub fn set_kind(&mut self, kind: WorkoutKind) {
        if self.kind != kind {
            self.toggle_fieldset();
        }
    }

    #[must_use]
    pub const fn state(&self) -> FormState {
        self.state
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        matches!(self.state, FormState::Visible { .. })
    }

    #[must_use]
    pub const fn pending_coords(&self) -> Option<Coords> {
        match self.state {
            FormState::Visible { pending } => Some(pending),
            FormState::Hidden => None,
        }
    }

    /// True while the post-hide transition is running.
    #[must_use]
    pub fn in_transition(&self, now: Instant) -> bool {
        self.transition_until.is_some_and(|until| now < until)
    }

    #[must_use]
    pub const fn kind(&self) -> WorkoutKind {
        self.kind
    }

    /// The type-specific field currently shown.
    #[must_use]
    pub const fn metric_field(&self) -> FormField {
        match self.kind {
            WorkoutKind::Running => FormField::Cadence,
            WorkoutKind::Cycling => FormField::Elevation,
        }
    }

    #[must_use]
    pub const fn focused_field(&self) -> FormField {
        self.focused_field
    }

    /// Fields in tab order, with only the visible type-specific one.
    #[must_use]
    pub const fn fields(&self) -> [FormField; 4] {
        [
            FormField::Type,
            FormField::Distance,
            FormField::Duration,
            self.metric_field(),
        ]
    }

    pub fn focus(&mut self, field: FormField) {
        if field == FormField::Cadence || field == FormField::Elevation {
            self.focused_field = self.metric_field();
        } else {
            self.focused_field = field;
        }
    }

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        let i = fields.iter().position(|f| *f == self.focused_field).unwrap_or(0);
        self.focused_field = fields[(i + 1) % fields.len()];
    }

    pub fn focus_previous(&mut self) {
        let fields = self.fields();
        let i = fields.iter().position(|f| *f == self.focused_field).unwrap_or(0);
        self.focused_field = fields[(i + fields.len() - 1) % fields.len()];
    }

    fn input_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Type => None,
            FormField::Distance => Some(&mut self.distance_input),
            FormField::Duration => Some(&mut self.duration_input),
            FormField::Cadence => Some(&mut self.cadence_input),
            FormField::Elevation => Some(&mut self.elevation_input),
        }
    }

    #[must_use]
    pub fn input(&self, field: FormField) -> &str {
        match field {
            FormField::Type => self.kind.as_str(),
            FormField::Distance => &self.distance_input,
            FormField::Duration => &self.duration_input,
            FormField::Cadence => &self.cadence_input,
            FormField::Elevation => &self.elevation_input,
        }
    }

    /// Types into the focused field. Only number-like characters are taken.
    pub fn input_char(&mut self, c: char) {
        if !(c.is_ascii_digit() || matches!(c, '.' | '-' | 'e' | 'E' | '+')) {
            return;
        }
        let field = self.focused_field;
        if let Some(input) = self.input_mut(field) {
            input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        let field = self.focused_field;
        if let Some(input) = self.input_mut(field) {
            input.pop();
        }
    }

    pub fn set_field(&mut self, field: FormField, value: &str) {
        if let Some(input) = self.input_mut(field) {
            *input = value.to_string();
        }
    }

    /// Reads every field as a number.
    #[must_use]
    pub fn read(&self) -> FormInput {
        FormInput {
            kind: self.kind,
            distance: parse_number(&self.distance_input),
            duration: parse_number(&self.duration_input),
            cadence: parse_number(&self.cadence_input),
            elevation: parse_number(&self.elevation_input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_then_hide_round_trip() {
        let mut form = WorkoutForm::default();
        assert!(!form.is_visible());
        form.show(Coords::new(1.0, 2.0));
        assert_eq!(form.pending_coords(), Some(Coords::new(1.0, 2.0)));
        assert_eq!(form.focused_field(), FormField::Distance);

        form.set_field(FormField::Distance, "5");
        form.set_kind(WorkoutKind::Cycling);
        form.hide();
        assert_eq!(form.state(), FormState::Hidden);
        assert!(form.distance_input.is_empty());
        assert_eq!(form.kind(), WorkoutKind::Cycling);
        assert!(form.in_transition(Instant::now()));
        assert!(!form.in_transition(Instant::now() + HIDE_TRANSITION));
    }

    #[test]
    fn toggle_swaps_metric_field_without_changing_visibility() {
        let mut form = WorkoutForm::default();
        assert_eq!(form.metric_field(), FormField::Cadence);
        form.toggle_fieldset();
        assert_eq!(form.metric_field(), FormField::Elevation);
        assert!(!form.is_visible());

        form.show(Coords::new(0.0, 0.0));
        form.focus(FormField::Cadence);
        assert_eq!(form.focused_field(), FormField::Elevation);
        form.toggle_fieldset();
        assert!(form.is_visible());
        assert_eq!(form.focused_field(), FormField::Cadence);
    }

    #[test]
    fn focus_cycles_over_visible_fields() {
        let mut form = WorkoutForm::default();
        form.show(Coords::new(0.0, 0.0));
        form.focus_next();
        assert_eq!(form.focused_field(), FormField::Duration);
        form.focus_next();
        assert_eq!(form.focused_field(), FormField::Cadence);
        form.focus_next();
        assert_eq!(form.focused_field(), FormField::Type);
        form.focus_previous();
        assert_eq!(form.focused_field(), FormField::Cadence);
    }

    #[test]
    fn typing_edits_focused_field_only() {
        let mut form = WorkoutForm::default();
        form.show(Coords::new(0.0, 0.0));
        for c in "12x.5".chars() {
            form.input_char(c);
        }
        assert_eq!(form.distance_input, "12.5");
        form.backspace();
        assert_eq!(form.distance_input, "12.");
        form.focus(FormField::Type);
        form.input_char('3');
        assert_eq!(form.input(FormField::Type), "running");
    }

    #[test]
    fn read_treats_blank_as_zero_and_junk_as_nan() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number(" 7.5 "), 7.5);
        assert!(parse_number("1.2.3").is_nan());

        let mut form = WorkoutForm::default();
        form.set_field(FormField::Distance, "5");
        form.set_field(FormField::Duration, "25");
        form.set_field(FormField::Cadence, "180");
        let input = form.read();
        assert_eq!(input.kind_input(), KindInput::Cadence(180.0));
        assert_eq!(input.elevation, 0.0);
    }
}
