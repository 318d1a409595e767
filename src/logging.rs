//! Logging setup for applications embedding the validator
//!
//! The validation engine emits `tracing` events: schema loads and rejected
//! payloads at DEBUG, individual constraint dispatch at TRACE. This module
//! installs a subscriber for them. Defaults to JSON output to STDOUT.
//!
//! # Examples
//!
//! ```no_run
//! use spectraget::logging::*;
//!
//! let _guard = LogConfig::new()
//!     .level(LogLevel::Debug)
//!     .format(LogFormat::Pretty)
//!     .init()
//!     .expect("logging already initialized");
//!
//! info!("Validator ready");
//! ```

use std::io;
use thiserror::Error;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

pub use tracing::{debug, error, info, trace, warn};

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to tracing Level
    pub fn to_tracing_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format (default) - structured, machine-readable
    Json,
    /// Plain text format
    Plain,
    /// Multi-line format for development
    Pretty,
    /// Minimal single-line output
    Compact,
}

/// Output destination for logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    /// Append to a single file
    File(String),
}

/// Errors raised while installing the subscriber
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("A global subscriber is already installed")]
    AlreadyInitialized,
}

/// Logging configuration
///
/// ```
/// use spectraget::logging::*;
///
/// let config = LogConfig::new()
///     .level(LogLevel::Debug)
///     .format(LogFormat::Compact)
///     .output(LogOutput::Stderr)
///     .with_env_filter("spectraget_validation=trace");
///
/// assert_eq!(config.level, LogLevel::Debug);
/// ```
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Include thread IDs
    pub thread_ids: bool,
    /// Include target (module path)
    pub targets: bool,
    /// Include file and line numbers
    pub file_line: bool,
    /// Enable ANSI colors (ignored for JSON)
    pub colors: bool,
    /// Custom filter directives, overriding `level` and `RUST_LOG`
    pub env_filter: Option<String>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_thread_ids(mut self, enable: bool) -> Self {
        self.thread_ids = enable;
        self
    }

    pub fn with_targets(mut self, enable: bool) -> Self {
        self.targets = enable;
        self
    }

    pub fn with_file_line(mut self, enable: bool) -> Self {
        self.file_line = enable;
        self
    }

    pub fn with_colors(mut self, enable: bool) -> Self {
        self.colors = enable;
        self
    }

    /// Set custom filter directives, e.g. `"spectraget_validation=debug"`
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn build_filter(&self) -> Result<EnvFilter, LoggingError> {
        match &self.env_filter {
            Some(directives) => EnvFilter::try_new(directives)
                .map_err(|e| LoggingError::InvalidFilter(e.to_string())),
            None => Ok(EnvFilter::builder()
                .with_default_directive(
                    LevelFilter::from_level(self.level.to_tracing_level()).into(),
                )
                .from_env_lossy()),
        }
    }

    /// Install the global subscriber.
    ///
    /// The returned guard flushes buffered logs when dropped; keep it alive
    /// for the lifetime of the program.
    pub fn init(self) -> Result<WorkerGuard, LoggingError> {
        let filter = self.build_filter()?;

        let (writer, guard) = match &self.output {
            LogOutput::Stdout => tracing_appender::non_blocking(io::stdout()),
            LogOutput::Stderr => tracing_appender::non_blocking(io::stderr()),
            LogOutput::File(path) => {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| LoggingError::OpenFile {
                        path: path.clone(),
                        source,
                    })?;
                tracing_appender::non_blocking(file)
            }
        };

        let registry = tracing_subscriber::registry().with(filter);
        let installed = match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_thread_ids(self.thread_ids)
                        .with_file(self.file_line)
                        .with_line_number(self.file_line),
                )
                .try_init(),
            LogFormat::Plain => registry
                .with(
                    fmt::layer()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_thread_ids(self.thread_ids)
                        .with_file(self.file_line)
                        .with_line_number(self.file_line)
                        .with_ansi(self.colors),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_thread_ids(self.thread_ids)
                        .with_file(self.file_line)
                        .with_line_number(self.file_line)
                        .with_ansi(self.colors),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_writer(writer)
                        .with_target(self.targets)
                        .with_thread_ids(self.thread_ids)
                        .with_ansi(self.colors),
                )
                .try_init(),
        };

        installed.map_err(|_| LoggingError::AlreadyInitialized)?;
        Ok(guard)
    }
}

impl Default for LogConfig {
    /// JSON to STDOUT at INFO level
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            output: LogOutput::Stdout,
            thread_ids: false,
            targets: true,
            file_line: false,
            colors: false,
            env_filter: None,
        }
    }
}
