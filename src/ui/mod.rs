//! Ratatui front-end: a workouts list, a per-workout detail page, and a modal
//! form that composes a workout set by set before saving it to the store.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
