//! Tracing subscriber setup.
//!
//! The terminal sink owns stdout, so when it is in use logs go to a file
//! under `${IRCSPY_HOME}/logs`. Filtering follows `IRCSPY_LOG` (same syntax
//! as `RUST_LOG`), defaulting to `info`.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "IRCSPY_LOG";
pub const LOG_FILE: &str = "ircspy.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to `ircspy.log` in this directory.
    File(PathBuf),
}

/// Installs the global subscriber.
///
/// The returned guard flushes buffered file output on drop and must be kept
/// alive for the life of the process.
pub fn init(target: &LogTarget) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match target {
        LogTarget::Stderr => {
            builder
                .with_writer(io::stderr)
                .try_init()
                .map_err(|err| anyhow!("install log subscriber: {err}"))?;
            Ok(None)
        }
        LogTarget::File(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("create log dir {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder
                .with_ansi(false)
                .with_writer(writer)
                .try_init()
                .map_err(|err| anyhow!("install log subscriber: {err}"))?;
            Ok(Some(guard))
        }
    }
}
