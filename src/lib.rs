//! Core library surface for the workout tracker.
//!
//! `models` and `store` hold the data model and the observable in-memory
//! store; `ui` is the terminal front-end that drives them. The binary only
//! wires these together, so tests and other front-ends can reuse the same
//! pieces.
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

pub use error::WorkoutError;

/// Domain types that every other layer manipulates.
pub use models::{Exercise, Set, Workout, WorkoutDraft, WorkoutId};

pub use store::{StoreEvent, Subscription, WorkoutStore};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
