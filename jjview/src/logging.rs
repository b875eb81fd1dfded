//! File logging.
//!
//! The terminal belongs to the TUI, so diagnostics go to
//! `$XDG_STATE_HOME/jjview/jjview.log`, truncated on every start. The level
//! comes from `JJVIEW_LOG` (an `EnvFilter` directive) and defaults to `info`.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::xdg_dir;

const LOG_FILE: &str = "jjview.log";
const FILTER_ENV: &str = "JJVIEW_LOG";

/// Directory the log file is written to.
pub fn log_dir() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state").join("jjview")
}

/// Installs the global subscriber. The returned guard flushes the writer
/// thread on drop and must live until the program exits.
///
/// Returns `None` if the log directory cannot be created or a subscriber is
/// already installed; jjview runs without logging in that case.
pub fn init() -> Option<WorkerGuard> {
    let dir = log_dir();
    if std::fs::create_dir_all(&dir).is_err() {
        return None;
    }
    let _ = std::fs::remove_file(dir.join(LOG_FILE));

    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|()| guard)
}
