use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use tracing_subscriber::EnvFilter;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".workout-tracker";
/// Log file stored inside the application data directory.
const LOG_FILE_NAME: &str = "workout-tracker.log";
/// Filter applied when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Install a `tracing` subscriber that appends to the log file. The terminal
/// is owned by the alternate-screen UI, so nothing is written to stdout or
/// stderr.
pub fn init() -> Result<PathBuf> {
    let path = log_path()?;
    let file = open_log_file(&path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;

    Ok(path)
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Resolve the absolute path to the log file inside the user's home.
fn log_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(LOG_FILE_NAME))
}
