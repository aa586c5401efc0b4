//! Where qdiag keeps its files: a `.qdiag` folder under the OS config dir.
//!
//! `QDIAG_CONFIG_HOME` replaces the OS config dir, which is handy for
//! portable installs and integration tests.

use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

pub const APP_DIR_NAME: &str = ".qdiag";
pub const CONFIG_HOME_ENV: &str = "QDIAG_CONFIG_HOME";
const LOGS_DIR_NAME: &str = "logs";

#[derive(Debug, Error)]
pub enum AppDirError {
    #[error("No config directory found; set QDIAG_CONFIG_HOME to choose one")]
    NoBaseDir,
    #[error("Failed to create application directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The `.qdiag` root, created on first use.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(base_dir()?.join(APP_DIR_NAME))
}

/// `logs/` inside the root, created on first use.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join(LOGS_DIR_NAME))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    match std::fs::create_dir_all(&path) {
        Ok(()) => Ok(path),
        Err(source) => Err(AppDirError::CreateDir { path, source }),
    }
}

fn base_dir() -> Result<PathBuf, AppDirError> {
    if let Some(path) = scoped_base() {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(CONFIG_HOME_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(AppDirError::NoBaseDir)
}

#[cfg(test)]
fn scoped_base() -> Option<PathBuf> {
    test_support::scoped_base()
}

#[cfg(not(test))]
fn scoped_base() -> Option<PathBuf> {
    None
}
