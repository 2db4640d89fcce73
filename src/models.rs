//! Domain models for logged workouts. A `Workout` owns its exercises and every
//! `Exercise` owns its sets; nothing here is mutated after construction, so
//! an edit always produces a replacement `Workout` carrying the same id.

use std::fmt;

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::error::{Result, WorkoutError};

/// Stable identity for a workout, independent of its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkoutId(Uuid);

impl WorkoutId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        WorkoutId(Uuid::new_v4())
    }
}

impl Default for WorkoutId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// A single performance unit: how many repetitions at which weight (lbs).
pub struct Set {
    reps: u32,
    weight: f64,
}

impl Set {
    /// Build a set from already-typed values. Weights must be finite and not
    /// negative.
    pub fn new(reps: u32, weight: f64) -> Result<Self> {
        if !weight.is_finite() {
            return Err(WorkoutError::invalid("Weight", "must be a number."));
        }
        if weight < 0.0 {
            return Err(WorkoutError::invalid("Weight", "cannot be negative."));
        }
        // -0.0 passes the check above; store it as plain zero.
        let weight = weight + 0.0;
        Ok(Self { reps, weight })
    }

    /// Parse the raw text typed into the reps and weight fields.
    pub fn parse(reps: &str, weight: &str) -> Result<Self> {
        let reps_raw = reps.trim();
        if reps_raw.is_empty() {
            return Err(WorkoutError::invalid("Reps", "are required."));
        }
        let reps = reps_raw
            .parse::<u32>()
            .map_err(|_| WorkoutError::invalid("Reps", "must be a whole number."))?;

        let weight_raw = weight.trim();
        if weight_raw.is_empty() {
            return Err(WorkoutError::invalid("Weight", "is required."));
        }
        let weight = weight_raw
            .parse::<f64>()
            .map_err(|_| WorkoutError::invalid("Weight", "must be a number."))?;

        Self::new(reps, weight)
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Reps multiplied by weight.
    pub fn volume(&self) -> f64 {
        f64::from(self.reps) * self.weight
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} reps  {:.1} lbs", self.reps, self.weight)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A named movement and the sets performed for it, in order.
pub struct Exercise {
    name: String,
    sets: Vec<Set>,
}

impl Exercise {
    /// Names are trimmed and must not end up empty. An empty `sets` list is
    /// accepted: library callers may build an exercise before its first set,
    /// and the detail view shows such an exercise as having no sets.
    pub fn new<S: AsRef<str>>(name: S, sets: Vec<Set>) -> Result<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(WorkoutError::invalid("Exercise name", "is required."));
        }
        Ok(Self {
            name: name.to_string(),
            sets,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sets(&self) -> &[Set] {
        &self.sets
    }

    fn same_movement(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A dated workout session.
pub struct Workout {
    id: WorkoutId,
    date: DateTime<Local>,
    exercises: Vec<Exercise>,
}

impl Workout {
    /// Create a workout dated now with a fresh identifier. `exercises` may be
    /// empty; the store accepts such workouts and the detail view shows a
    /// placeholder for them. The add form only commits non-empty drafts.
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self::with_date(exercises, Local::now())
    }

    pub fn with_date(exercises: Vec<Exercise>, date: DateTime<Local>) -> Self {
        Self {
            id: WorkoutId::new(),
            date,
            exercises,
        }
    }

    pub fn id(&self) -> WorkoutId {
        self.id
    }

    pub fn date(&self) -> DateTime<Local> {
        self.date
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    /// Medium date style used for list rows and titles, e.g. `Sep 6, 2024`.
    pub fn date_label(&self) -> String {
        self.date.format("%b %-d, %Y").to_string()
    }

    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|exercise| exercise.sets.len()).sum()
    }

    pub fn total_volume(&self) -> f64 {
        self.exercises
            .iter()
            .flat_map(|exercise| exercise.sets.iter())
            .map(Set::volume)
            .sum()
    }

    /// One-line summary for the workouts list.
    pub fn summary(&self) -> String {
        let exercises = self.exercises.len();
        let sets = self.total_sets();
        format!(
            "{}  {} exercise{}, {} set{}",
            self.date_label(),
            exercises,
            if exercises == 1 { "" } else { "s" },
            sets,
            if sets == 1 { "" } else { "s" },
        )
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date_label())
    }
}

/// A workout being composed set by set before it is committed to the store.
///
/// Consecutive sets for the same exercise name are grouped under one
/// `Exercise`; switching names starts a new one. A draft seeded from an
/// existing workout keeps that workout's id and date so finishing it yields
/// a replacement rather than a new entry.
#[derive(Debug, Clone, Default)]
pub struct WorkoutDraft {
    origin: Option<(WorkoutId, DateTime<Local>)>,
    exercises: Vec<Exercise>,
}

impl WorkoutDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_workout(workout: &Workout) -> Self {
        Self {
            origin: Some((workout.id, workout.date)),
            exercises: workout.exercises.clone(),
        }
    }

    /// Id of the workout being edited, if any.
    pub fn editing(&self) -> Option<WorkoutId> {
        self.origin.map(|(id, _)| id)
    }

    /// Append `set` under `name`, grouping with the last exercise when the
    /// names match.
    pub fn add_set(&mut self, name: &str, set: Set) -> Result<()> {
        if let Some(last) = self.exercises.last_mut() {
            if last.same_movement(name) {
                last.sets.push(set);
                return Ok(());
            }
        }
        self.exercises.push(Exercise::new(name, vec![set])?);
        Ok(())
    }

    /// Drop the most recently added set, removing its exercise when it
    /// becomes empty.
    pub fn pop_set(&mut self) -> Option<Set> {
        let last = self.exercises.last_mut()?;
        let set = last.sets.pop();
        if last.sets.is_empty() {
            self.exercises.pop();
        }
        set
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn set_count(&self) -> usize {
        self.exercises.iter().map(|exercise| exercise.sets.len()).sum()
    }

    /// Turn the draft into a workout. New drafts are dated now.
    pub fn finish(self) -> Result<Workout> {
        if self.exercises.is_empty() {
            return Err(WorkoutError::invalid(
                "Workout",
                "needs at least one set before saving.",
            ));
        }
        Ok(match self.origin {
            Some((id, date)) => Workout {
                id,
                date,
                exercises: self.exercises,
            },
            None => Workout::new(self.exercises),
        })
    }
}
