//! JSON logging to per-run files.
//!
//! Every process gets a run id (UUID v7) and writes its events to
//! `<directory>/navstack-<run_id>.json`. v7 ids are time-ordered, so file
//! names sort oldest first, which is what retention relies on.
//!
//! Events carry their span context. Navigation commands run inside a
//! `dispatch` span with a `navigator` field, icon resolution inside an
//! `icon_resolution` span with a `task` field.
//!
//! The level comes from `RUST_LOG` when set, from [`LoggingSettings::level`]
//! otherwise:
//!
//! ```bash
//! RUST_LOG=navstack_core::view::chrome=debug,info
//! ```
//!
//! ```no_run
//! use navstack_core::logging::{init_logging, shutdown_logging};
//! use navstack_core::settings::LoggingSettings;
//!
//! if let Some(path) = init_logging(&LoggingSettings::default())? {
//!     eprintln!("logging to {}", path.display());
//! }
//! tracing::info!("started");
//! shutdown_logging();
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::settings::LoggingSettings;
use anyhow::{Context, Error};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const LOG_FILE_PREFIX: &str = "navstack-";
const LOG_FILE_EXTENSION: &str = "json";
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

lazy_static! {
    static ref RUN_ID: String = Uuid::now_v7().to_string();
    static ref LOG_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);
}

/// Process-wide run id, generated on first access.
///
/// ```
/// use navstack_core::logging::get_run_id;
///
/// assert_eq!(get_run_id(), get_run_id());
/// ```
pub fn get_run_id() -> &'static str {
    RUN_ID.as_str()
}

fn run_log_name(run_id: &str) -> String {
    format!("{}{}.{}", LOG_FILE_PREFIX, run_id, LOG_FILE_EXTENSION)
}

fn is_run_log(path: &Path) -> bool {
    let has_prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX));
    let has_extension = path
        .extension()
        .is_some_and(|ext| ext == LOG_FILE_EXTENSION);

    has_prefix && has_extension && path.is_file()
}

/// Run logs in `log_dir`, oldest first.
fn run_logs(log_dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = fs::read_dir(log_dir)
        .with_context(|| format!("can't read log directory {}", log_dir.display()))?;

    let mut logs = Vec::new();
    for entry in entries {
        let path = entry.context("can't read log directory entry")?.path();
        if is_run_log(&path) {
            logs.push(path);
        }
    }
    logs.sort();

    Ok(logs)
}

/// Deletes the oldest run logs until at most `keep` remain, returning how
/// many were removed.
fn prune_run_logs(log_dir: &Path, keep: usize) -> Result<usize, Error> {
    let logs = run_logs(log_dir)?;
    let excess = logs.len().saturating_sub(keep);

    for path in &logs[..excess] {
        fs::remove_file(path)
            .with_context(|| format!("can't remove old log file {}", path.display()))?;
    }

    Ok(excess)
}

fn env_filter(level: &str) -> Result<EnvFilter, Error> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = match level.trim() {
        "" => "info",
        level => level,
    };

    EnvFilter::builder()
        .parse(level)
        .with_context(|| format!("invalid logging level {:?}", level))
}

/// Installs the global JSON subscriber and returns the path of this run's log.
///
/// Returns `Ok(None)` when logging is disabled. Older run logs are pruned so
/// that, counting this run, at most `max_files` remain (`0` keeps all).
/// A process can only install one global subscriber, so a second call fails.
pub fn init_logging(settings: &LoggingSettings) -> Result<Option<PathBuf>, Error> {
    if !settings.enabled {
        return Ok(None);
    }

    let log_dir = settings.directory.as_path();
    fs::create_dir_all(log_dir)
        .with_context(|| format!("can't create log directory {}", log_dir.display()))?;

    if settings.max_files > 0 {
        let removed = prune_run_logs(log_dir, settings.max_files - 1)?;
        if removed > 0 {
            eprintln!("removed {} old run log(s) from {}", removed, log_dir.display());
        }
    }

    let file_name = run_log_name(get_run_id());
    let appender = Builder::new()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.as_str())
        .build(log_dir)
        .with_context(|| format!("can't open run log in {}", log_dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(writer)
        .with_thread_names(true)
        .with_current_span(true)
        .with_span_list(false);

    tracing_subscriber::registry()
        .with(env_filter(&settings.level)?)
        .with(layer)
        .try_init()
        .context("can't install tracing subscriber")?;

    if let Ok(mut slot) = LOG_GUARD.lock() {
        *slot = Some(guard);
    }

    tracing::info!(
        run_id = get_run_id(),
        version = env!("CARGO_PKG_VERSION"),
        "logging initialized"
    );

    Ok(Some(log_dir.join(file_name)))
}

/// Flushes buffered events to the run log.
///
/// The writer thread gets [`FLUSH_TIMEOUT`] to drain before this returns.
pub fn shutdown_logging() {
    let guard = match LOG_GUARD.lock() {
        Ok(mut slot) => slot.take(),
        Err(_) => None,
    };
    let Some(guard) = guard else {
        return;
    };

    let (done, flushed) = mpsc::channel();
    thread::spawn(move || {
        drop(guard);
        let _ = done.send(());
    });

    if flushed.recv_timeout(FLUSH_TIMEOUT).is_err() {
        eprintln!("run log flush timed out");
    }
}
