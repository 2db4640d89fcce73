//! Binary entry point: set up file logging, start with an empty in-memory
//! store, and drive the Ratatui event loop until the user exits.
use tracing::info;
use workout_tracker::{logging, run_app, App, WorkoutStore};

fn main() -> anyhow::Result<()> {
    match logging::init() {
        Ok(path) => info!(path = %path.display(), "workout tracker starting"),
        Err(err) => eprintln!("logging disabled: {err:#}"),
    }

    let mut app = App::new(WorkoutStore::new());
    let result = run_app(&mut app);

    let store = app.into_store();
    info!(workouts = store.len(), "workout tracker exiting");
    result
}
