use log::error;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::ChronoLocal},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_FILE_PREFIX: &str = "polyglot.log";
const DEFAULT_LEVEL: &str = "info";
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 3600;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Logging setup: console and daily rolling file output.
///
/// `level` is the default filter directive. A `RUST_LOG` environment variable
/// takes precedence over it, e.g. `RUST_LOG=polyglot_core=debug`.
///
/// Deserializes from a config section such as
///
/// ```yaml
/// level: debug
/// console: true
/// file: true
/// log_dir: ./logs
/// max_files: 7
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Rolled files are named `<file_prefix>.<date>`.
    file_prefix: String,
    log_dir: PathBuf,
    /// chrono strftime format
    time_format: String,
    level: String,
    console: bool,
    file: bool,
    /// Rolled files kept when pruning. No pruning when unset.
    max_files: Option<usize>,
    cleanup_interval_secs: u64,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            level: DEFAULT_LEVEL.to_string(),
            console: true,
            file: false,
            max_files: None,
            cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL_SECS,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn enable_console(mut self, enable: bool) -> Self {
        self.console = enable;
        self
    }

    pub fn enable_file(mut self, enable: bool) -> Self {
        self.file = enable;
        self
    }

    pub fn max_files(mut self, count: usize) -> Self {
        self.max_files = Some(count);
        self
    }

    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval_secs = interval.as_secs().max(1);
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Install the global subscriber.
    ///
    /// Keep the returned guard alive for the lifetime of the program, buffered
    /// file output is flushed when it drops.
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LoggerError> {
        let console_layer = self.build_console_layer();
        let (file_layer, guard) = self.build_file_layer();

        Registry::default()
            .with(self.env_filter())
            .with(console_layer)
            .with(file_layer)
            .try_init()?;

        self.spawn_cleanup_task_if_needed();
        Ok(guard)
    }

    /// Like [`try_init`](Self::try_init), but an already installed subscriber
    /// is kept and reported instead of failing.
    pub fn init(self) -> Option<WorkerGuard> {
        match self.try_init() {
            Ok(guard) => guard,
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }

    fn build_console_layer<S>(&self) -> Option<impl Layer<S>>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        self.console.then(|| {
            fmt::layer()
                .with_timer(ChronoLocal::new(self.time_format.clone()))
                .with_writer(std::io::stdout)
        })
    }

    fn build_file_layer<S>(&self) -> (Option<impl Layer<S>>, Option<WorkerGuard>)
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        if !self.file {
            return (None, None);
        }

        let file_appender = tracing_appender::rolling::daily(&self.log_dir, &self.file_prefix);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = fmt::layer()
            .with_timer(ChronoLocal::new(self.time_format.clone()))
            .with_ansi(false)
            .with_writer(non_blocking);

        (Some(layer), Some(guard))
    }

    fn spawn_cleanup_task_if_needed(&self) {
        let Some(max_files) = self.max_files else {
            return;
        };
        if !self.file {
            return;
        }

        let log_dir = self.log_dir.clone();
        let file_prefix = self.file_prefix.clone();
        let interval = Duration::from_secs(self.cleanup_interval_secs.max(1));

        std::thread::spawn(move || {
            loop {
                prune_rotated_logs(&log_dir, &file_prefix, max_files);
                std::thread::sleep(interval);
            }
        });
    }
}

/// Keep the `max_files` newest files starting with `file_prefix`.
///
/// Relies on the rolling appender's ISO date suffix, so name order is age
/// order. Returns the number of removed files.
pub fn prune_rotated_logs(log_dir: &Path, file_prefix: &str, max_files: usize) -> usize {
    let read_dir = match std::fs::read_dir(log_dir) {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to read log directory {}: {}", log_dir.display(), e);
            return 0;
        }
    };

    let mut log_files: Vec<(PathBuf, String)> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let file_name = entry.file_name().into_string().ok()?;
            file_name
                .starts_with(file_prefix)
                .then(|| (entry.path(), file_name))
        })
        .collect();

    // newest first: app.log.2023-10-02, app.log.2023-10-01, ...
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    log_files
        .iter()
        .skip(max_files)
        .filter(|(path, _)| match std::fs::remove_file(path) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to remove old log file {}: {}", path.display(), e);
                false
            }
        })
        .count()
}
