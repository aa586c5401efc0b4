//! Tracing setup for the desktop app and the CLI.
//!
//! Each launch logs to the console and to its own timestamped file under the
//! app root's `logs/` directory. Only the newest files are kept.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs::{self, AppDirError};

const MAX_LOG_FILES: usize = 10;
const LOG_FILE_PREFIX: &str = "qdiag_";
const LOG_FILE_EXT: &str = ".log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where console output goes, and how chatty it is by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleTarget {
    /// Desktop app; `info` and up.
    Stdout,
    /// CLI; stdout is reserved for JSON, so only `warn` and up by default.
    Stderr,
}

impl ConsoleTarget {
    fn default_filter(self) -> &'static str {
        match self {
            Self::Stdout => "info",
            Self::Stderr => "warn",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Log directory unavailable: {0}")]
    Dir(#[from] AppDirError),
    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },
    #[error("Failed to format log file name: {0}")]
    FormatTime(#[from] time::error::Format),
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the global subscriber. Later calls do nothing.
///
/// `RUST_LOG` overrides the default level for both sinks.
pub fn init(console: ConsoleTarget) -> Result<(), LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(());
    }

    let log_dir = app_dirs::logs_dir()?;
    let file_name = log_file_name(now_local_or_utc())?;
    let (file_writer, guard) = tracing_appender::non_blocking(rolling::never(&log_dir, &file_name));
    prune_old_logs(&log_dir, MAX_LOG_FILES)?;

    let timer = timer();
    let console_layer = match console {
        ConsoleTarget::Stdout => fmt::layer()
            .with_timer(timer.clone())
            .with_writer(io::stdout)
            .boxed(),
        ConsoleTarget::Stderr => fmt::layer()
            .with_timer(timer.clone())
            .with_writer(io::stderr)
            .boxed(),
    };
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_timer(timer)
        .with_writer(file_writer);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console.default_filter()));

    tracing::subscriber::set_global_default(
        Registry::default()
            .with(filter)
            .with(console_layer)
            .with(file_layer),
    )?;
    let _ = LOG_GUARD.set(guard);

    tracing::info!("Logging to {}", log_dir.join(&file_name).display());
    Ok(())
}

fn log_file_name(now: OffsetDateTime) -> Result<String, LoggingError> {
    const NAME_FORMAT: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    Ok(format!(
        "{LOG_FILE_PREFIX}{}{LOG_FILE_EXT}",
        now.format(NAME_FORMAT)?
    ))
}

/// Delete our oldest log files until at most `keep` remain.
///
/// File names embed a sortable timestamp, so name order is age order.
/// Files without our prefix are left alone.
fn prune_old_logs(dir: &Path, keep: usize) -> Result<(), LoggingError> {
    let entries = fs::read_dir(dir).map_err(|source| LoggingError::Io {
        action: "read",
        path: dir.to_path_buf(),
        source,
    })?;
    let mut logs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_own_log(path))
        .collect();
    logs.sort();
    let excess = logs.len().saturating_sub(keep);
    for path in logs.into_iter().take(excess) {
        fs::remove_file(&path).map_err(|source| LoggingError::Io {
            action: "remove",
            path,
            source,
        })?;
    }
    Ok(())
}

fn is_own_log(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX) && name.ends_with(LOG_FILE_EXT))
}

fn timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const DISPLAY_FORMAT: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
