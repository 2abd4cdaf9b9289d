// src/logging.rs

use color_eyre::eyre::Result;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing_error::ErrorLayer;
use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase();
    pub static ref DATA_ENV: String = format!("{}_DATA", PROJECT_NAME.as_str());
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.as_str());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "reconguard", env!("CARGO_PKG_NAME"))
}

/// Data directory for logs and exported reports. `RECONGUARD_DATA` wins over
/// the platform location.
pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_ENV.as_str()) {
        return PathBuf::from(dir);
    }
    match project_directory() {
        Some(proj_dirs) => proj_dirs.data_local_dir().to_path_buf(),
        None => PathBuf::from(".").join(".data"),
    }
}

/// Picks the filter directive: `RUST_LOG`, then `RECONGUARD_LOGLEVEL`, then
/// `info` for this crate only. Blank values count as unset.
fn filter_directive(lookup: impl Fn(&str) -> Option<String>) -> String {
    let set = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    set("RUST_LOG")
        .or_else(|| set(LOG_ENV.as_str()))
        .unwrap_or_else(|| format!("{}=info", env!("CARGO_CRATE_NAME")))
}

/// Installs the file subscriber and returns the log path.
///
/// The terminal belongs to the TUI, so nothing goes to stdout or stderr.
/// Engagements across runs accumulate in the same file.
pub fn initialize_logging() -> Result<PathBuf> {
    let directory = get_data_dir();
    std::fs::create_dir_all(&directory)?;
    let log_path = directory.join(LOG_FILE.as_str());
    let log_file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    let directive = filter_directive(|name| std::env::var(name).ok());

    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .init();

    Ok(log_path)
}
