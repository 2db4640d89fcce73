//! In-memory workout store. It is the single source of truth the terminal UI
//! renders from, and it pushes a `StoreEvent` to every subscriber after each
//! mutation or delete request so the UI can react without polling.

use std::fmt;

use tracing::debug;

use crate::error::{Result, WorkoutError};
use crate::models::{Workout, WorkoutId};

/// What changed in the store. `index` is the position the workout occupied
/// (for deletions) or now occupies (for additions and replacements).
/// `Unchanged` reports a delete request for an id the store does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Added { id: WorkoutId, index: usize },
    Replaced { id: WorkoutId, index: usize },
    Deleted { id: WorkoutId, index: usize },
    Unchanged { id: WorkoutId },
}

impl StoreEvent {
    pub fn id(&self) -> WorkoutId {
        match self {
            StoreEvent::Added { id, .. }
            | StoreEvent::Replaced { id, .. }
            | StoreEvent::Deleted { id, .. }
            | StoreEvent::Unchanged { id } => *id,
        }
    }
}

/// Handle returned by `subscribe`; hand it back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Observer = Box<dyn FnMut(&StoreEvent)>;

/// Ordered collection of workouts. Insertion order is display order and ids
/// are unique.
#[derive(Default)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
    observers: Vec<(Subscription, Observer)>,
    next_subscription: u64,
}

impl fmt::Debug for WorkoutStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkoutStore")
            .field("workouts", &self.workouts)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of every workout in display order.
    pub fn list_workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn get(&self, id: WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|workout| workout.id() == id)
    }

    pub fn position(&self, id: WorkoutId) -> Option<usize> {
        self.workouts.iter().position(|workout| workout.id() == id)
    }

    /// Append a workout. A workout whose id is already present replaces the
    /// stored copy in place instead, keeping ids unique.
    pub fn add_workout(&mut self, workout: Workout) {
        let id = workout.id();
        if let Some(index) = self.position(id) {
            self.workouts[index] = workout;
            debug!(%id, index, "workout re-added, replaced in place");
            self.notify(StoreEvent::Replaced { id, index });
            return;
        }

        self.workouts.push(workout);
        let index = self.workouts.len() - 1;
        debug!(%id, index, "workout added");
        self.notify(StoreEvent::Added { id, index });
    }

    /// Remove the first workout sharing `workout`'s id. A missing id leaves
    /// the store as is but still notifies observers with `Unchanged`.
    pub fn delete_workout(&mut self, workout: &Workout) -> Option<Workout> {
        self.delete_workout_by_id(workout.id())
    }

    pub fn delete_workout_by_id(&mut self, id: WorkoutId) -> Option<Workout> {
        let Some(index) = self.position(id) else {
            debug!(%id, "delete requested for unknown workout");
            self.notify(StoreEvent::Unchanged { id });
            return None;
        };
        let removed = self.workouts.remove(index);
        debug!(%id, index, "workout deleted");
        self.notify(StoreEvent::Deleted { id, index });
        Some(removed)
    }

    /// Remove the workout at `index`, shifting later entries down.
    pub fn delete_workout_at(&mut self, index: usize) -> Result<Workout> {
        let len = self.workouts.len();
        if index >= len {
            return Err(WorkoutError::IndexOutOfRange { index, len });
        }
        let removed = self.workouts.remove(index);
        let id = removed.id();
        debug!(%id, index, "workout deleted by position");
        self.notify(StoreEvent::Deleted { id, index });
        Ok(removed)
    }

    /// Swap in an edited copy of a stored workout, keeping its position.
    pub fn replace_workout(&mut self, workout: Workout) -> Result<()> {
        let id = workout.id();
        let index = self
            .position(id)
            .ok_or_else(|| WorkoutError::invalid("Workout", "no longer exists."))?;
        self.workouts[index] = workout;
        debug!(%id, index, "workout replaced");
        self.notify(StoreEvent::Replaced { id, index });
        Ok(())
    }

    /// Register a callback run after every mutation or delete request, in
    /// subscription order.
    pub fn subscribe<F>(&mut self, observer: F) -> Subscription
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        let subscription = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((subscription, Box::new(observer)));
        subscription
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(handle, _)| *handle != subscription);
        self.observers.len() != before
    }

    fn notify(&mut self, event: StoreEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }
}
