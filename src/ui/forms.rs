use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::error::Result;
use crate::models::{Set, Workout, WorkoutDraft, WorkoutId};

/// Fields available within the workout form.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum WorkoutField {
    #[default]
    Exercise,
    Reps,
    Weight,
}

/// Input state for the add/edit workout dialog. Every "Add Set" moves the
/// typed set into `draft`; saving commits the whole draft at once.
#[derive(Default, Clone)]
pub(crate) struct WorkoutForm {
    pub(crate) exercise: String,
    pub(crate) reps: String,
    pub(crate) weight: String,
    pub(crate) active: WorkoutField,
    pub(crate) error: Option<String>,
    pub(crate) draft: WorkoutDraft,
}

impl WorkoutForm {
    /// Seed the form with an existing workout's exercises for editing.
    pub(crate) fn from_workout(workout: &Workout) -> Self {
        let exercise = workout
            .exercises()
            .last()
            .map(|exercise| exercise.name().to_string())
            .unwrap_or_default();
        Self {
            exercise,
            draft: WorkoutDraft::from_workout(workout),
            ..Self::default()
        }
    }

    pub(crate) fn editing(&self) -> Option<WorkoutId> {
        self.draft.editing()
    }

    /// Cycle focus forward across the three fields.
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            WorkoutField::Exercise => WorkoutField::Reps,
            WorkoutField::Reps => WorkoutField::Weight,
            WorkoutField::Weight => WorkoutField::Exercise,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            WorkoutField::Exercise => WorkoutField::Weight,
            WorkoutField::Reps => WorkoutField::Exercise,
            WorkoutField::Weight => WorkoutField::Reps,
        };
    }

    /// Append a character to the active field. Reps only take digits and
    /// weight takes digits plus a single decimal point.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            WorkoutField::Exercise => {
                if ch.is_control() {
                    return false;
                }
                self.exercise.push(ch);
            }
            WorkoutField::Reps => {
                if !ch.is_ascii_digit() {
                    return false;
                }
                self.reps.push(ch);
            }
            WorkoutField::Weight => {
                let accepted = ch.is_ascii_digit() || (ch == '.' && !self.weight.contains('.'));
                if !accepted {
                    return false;
                }
                self.weight.push(ch);
            }
        }
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            WorkoutField::Exercise => {
                self.exercise.pop();
            }
            WorkoutField::Reps => {
                self.reps.pop();
            }
            WorkoutField::Weight => {
                self.weight.pop();
            }
        }
    }

    /// Whether the reps or weight fields hold a set not yet added.
    pub(crate) fn has_pending_set(&self) -> bool {
        !self.reps.trim().is_empty() || !self.weight.trim().is_empty()
    }

    /// Parse the typed set and append it to the draft. On success the reps
    /// and weight fields are cleared; the exercise name stays so the next set
    /// of the same movement only needs numbers.
    pub(crate) fn add_set(&mut self) -> Result<Set> {
        let set = Set::parse(&self.reps, &self.weight)?;
        self.draft.add_set(&self.exercise, set)?;
        self.reps.clear();
        self.weight.clear();
        self.active = WorkoutField::Reps;
        self.error = None;
        Ok(set)
    }

    /// Take back the most recently added set.
    pub(crate) fn undo_set(&mut self) -> Option<Set> {
        self.draft.pop_set()
    }

    /// Produce the workout to commit, folding in a pending set first. The
    /// form is left untouched when anything fails.
    pub(crate) fn build_workout(&self) -> Result<Workout> {
        let mut staged = self.clone();
        if staged.has_pending_set() {
            staged.add_set()?;
        }
        staged.draft.finish()
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: WorkoutField) -> Line<'static> {
        let value = match field {
            WorkoutField::Exercise => &self.exercise,
            WorkoutField::Reps => &self.reps,
            WorkoutField::Weight => &self.weight,
        };
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Lines listing what has been added to the draft so far.
    pub(crate) fn draft_lines(&self) -> Vec<Line<'static>> {
        let muted = Style::default().fg(Color::Gray);
        if self.draft.is_empty() {
            return vec![Line::from(Span::styled("No sets added yet.", muted))];
        }
        self.draft
            .exercises()
            .iter()
            .map(|exercise| {
                let sets = exercise
                    .sets()
                    .iter()
                    .map(|set| format!("{}x{:.1}", set.reps(), set.weight()))
                    .collect::<Vec<_>>()
                    .join(", ");
                Line::from(vec![
                    Span::raw(format!("{}: ", exercise.name())),
                    Span::styled(sets, muted),
                ])
            })
            .collect()
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: WorkoutField) -> usize {
        match field {
            WorkoutField::Exercise => self.exercise.chars().count(),
            WorkoutField::Reps => self.reps.chars().count(),
            WorkoutField::Weight => self.weight.chars().count(),
        }
    }
}

/// State for confirming removal of a workout from the list.
#[derive(Clone)]
pub(crate) struct ConfirmWorkoutDelete {
    pub(crate) index: usize,
    pub(crate) id: WorkoutId,
    pub(crate) label: String,
}

impl ConfirmWorkoutDelete {
    pub(crate) fn new(index: usize, workout: &Workout) -> Self {
        Self {
            index,
            id: workout.id(),
            label: workout.date_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkoutError;

    fn type_str(form: &mut WorkoutForm, text: &str) {
        for ch in text.chars() {
            form.push_char(ch);
        }
    }

    #[test]
    fn numeric_fields_filter_input() {
        let mut form = WorkoutForm::default();
        form.active = WorkoutField::Reps;
        assert!(!form.push_char('a'));
        assert!(form.push_char('1'));
        form.active = WorkoutField::Weight;
        type_str(&mut form, "13.5.0");
        assert_eq!(form.reps, "1");
        assert_eq!(form.weight, "13.50");
    }

    #[test]
    fn add_set_keeps_name_and_clears_numbers() {
        let mut form = WorkoutForm::default();
        type_str(&mut form, "Bench Press");
        form.reps = "10".into();
        form.weight = "135".into();

        form.add_set().unwrap();
        assert_eq!(form.exercise, "Bench Press");
        assert!(form.reps.is_empty());
        assert!(form.weight.is_empty());
        assert_eq!(form.active, WorkoutField::Reps);
        assert_eq!(form.draft.set_count(), 1);
    }

    #[test]
    fn failed_add_set_leaves_draft_alone() {
        let mut form = WorkoutForm::default();
        form.reps = "10".into();
        form.weight = "135".into();

        let err = form.add_set().unwrap_err();
        assert!(matches!(
            err,
            WorkoutError::InvalidInput {
                field: "Exercise name",
                ..
            }
        ));
        assert!(form.draft.is_empty());
        assert_eq!(form.reps, "10");
    }

    #[test]
    fn build_workout_folds_in_pending_set() {
        let mut form = WorkoutForm::default();
        form.exercise = "Squat".into();
        form.reps = "5".into();
        form.weight = "225".into();
        form.add_set().unwrap();
        form.reps = "5".into();
        form.weight = "235".into();

        let workout = form.build_workout().unwrap();
        assert_eq!(workout.exercises().len(), 1);
        assert_eq!(workout.exercises()[0].sets().len(), 2);
        assert_eq!(form.draft.set_count(), 1);
    }

    #[test]
    fn build_workout_requires_a_set() {
        let form = WorkoutForm::default();
        assert!(form.build_workout().is_err());
    }

    #[test]
    fn undo_set_pops_latest() {
        let mut form = WorkoutForm::default();
        form.exercise = "Row".into();
        form.reps = "12".into();
        form.weight = "95".into();
        form.add_set().unwrap();
        let undone = form.undo_set().unwrap();
        assert_eq!(undone.reps(), 12);
        assert!(form.draft.is_empty());
    }
}
