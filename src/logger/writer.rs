//! Log writer module
//!
//! Thread-safe log writing to files or stdout/stderr, with a level filter.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Severity threshold, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// Parse a level name; unknown names fall back to `Info`
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "debug" | "trace" => Self::Debug,
            _ => Self::Info,
        }
    }
}

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

/// Thread-safe log writer
pub struct LogWriter {
    level: LogLevel,
    access: LogTarget,
    error: LogTarget,
}

impl LogWriter {
    fn new(
        level: LogLevel,
        access_log_file: Option<&str>,
        error_log_file: Option<&str>,
    ) -> io::Result<Self> {
        let access = match access_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stderr,
        };

        Ok(Self {
            level,
            access,
            error,
        })
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    /// Write to access log
    pub fn write_access(&self, message: &str) {
        write_to_target(&self.access, message);
    }

    /// Write to error log
    pub fn write_error(&self, level: LogLevel, message: &str) {
        if self.enabled(level) {
            write_to_target(&self.error, message);
        }
    }

    /// Write info message (to access log target)
    pub fn write_info(&self, message: &str) {
        if self.enabled(LogLevel::Info) {
            write_to_target(&self.access, message);
        }
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn write_to_target(target: &LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => println!("{message}"),
        LogTarget::Stderr => eprintln!("{message}"),
        LogTarget::File(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

/// Initialize the global log writer
///
/// Returns error if log files cannot be opened or the writer is already set.
pub fn init(
    level: LogLevel,
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
) -> io::Result<()> {
    let writer = LogWriter::new(level, access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if initialized
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}
