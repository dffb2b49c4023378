//! Installs the process wide logger which writes plain text lines to the plugin's log file.
//! Lines are handed to a background worker, so logging never blocks a flight loop.
use std::{
    fs::File,
    io,
    path::Path,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};
use thiserror::Error;
use tracing_appender::non_blocking::NonBlocking;
pub use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{writer::OptionalWriter, MakeWriter},
    EnvFilter,
};

/// The environment variable from which the log filter is read, e.g. `PPL_LOG=debug`.
pub const LOG_FILTER_ENV: &str = "PPL_LOG";
const DEFAULT_LOG_FILTER: &str = "info";

static LOG_FILE: OnceLock<LogFile> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("another logger is already installed")]
    AlreadyInstalled,
}

/// Points the logger at the given file, which is truncated. The logger is installed on the
/// first call; later calls move it to the new file. Pending lines are written when the
/// returned guard is dropped.
pub fn init(path: &Path) -> Result<WorkerGuard, LoggingError> {
    let file = File::create(path).map_err(|source| LoggingError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let log_file = LOG_FILE.get_or_init(LogFile::install);
    if !log_file.installed {
        return Err(LoggingError::AlreadyInstalled);
    }

    let (writer, guard) = tracing_appender::non_blocking(file);
    log_file.writer.point_to(writer);

    Ok(guard)
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

struct LogFile {
    writer: LogFileWriter,
    installed: bool,
}
impl LogFile {
    fn install() -> Self {
        let writer = LogFileWriter::default();
        let installed = tracing_subscriber::fmt()
            .with_writer(writer.clone())
            .with_ansi(false)
            .with_target(false)
            .with_env_filter(filter())
            .try_init()
            .is_ok();

        Self { writer, installed }
    }
}

/// Hands lines to the worker of the current log file. Lines are dropped while there is none.
#[derive(Clone, Default)]
struct LogFileWriter {
    current: Arc<RwLock<Option<NonBlocking>>>,
}
impl LogFileWriter {
    fn point_to(&self, writer: NonBlocking) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(writer);
    }
}
impl<'a> MakeWriter<'a> for LogFileWriter {
    type Writer = OptionalWriter<NonBlocking>;

    fn make_writer(&'a self) -> Self::Writer {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        match &*current {
            Some(writer) => OptionalWriter::some(writer.clone()),
            None => OptionalWriter::none(),
        }
    }
}
