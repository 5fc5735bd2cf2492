use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;

use anyhow::Result;
use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;

pub fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chalk")
        .join("chalk.log")
}

/// The terminal belongs to the UI while the app runs, so records are piped
/// into the log file and never reach stdout or stderr.
fn builder(file: File, verbose: bool) -> Builder {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut builder = Builder::new();
    builder
        .target(Target::Pipe(Box::new(file)))
        .write_style(WriteStyle::Never)
        .format_timestamp_millis()
        .filter_level(level);
    builder
}

/// Install the file logger as the global `log` backend.
pub fn init(verbose: bool) -> Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    builder(file, verbose).try_init()?;
    Ok(path)
}
