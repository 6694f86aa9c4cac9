// src/log.rs
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use crate::config::consts::{DEFAULT_DATA_DIR, ERROR_LOG_FILE, LOG_FILE, LOG_MAX_BYTES};
use crate::core::time;

static LOGGER: OnceLock<Logger> = OnceLock::new();
static LOG_LOCK: Mutex<()> = Mutex::new(());

/// Width the error-log prefix (`[time] file(line)`) is padded to.
const ERROR_PREFIX_WIDTH: usize = 90;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Debug,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Error => "ERROR",
        }
    }
}

/// Where and how much the logger writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub output_dir: PathBuf,
    pub log_path: PathBuf,
    pub error_log_path: PathBuf,
    /// Files at or above this size are left alone.
    pub max_bytes: u64,
    /// Echo debug messages to the console.
    pub debug: bool,
    /// Echo info/error messages to the console.
    pub console: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}

impl LogConfig {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            output_dir: dir.to_path_buf(),
            log_path: dir.join(LOG_FILE),
            error_log_path: dir.join(ERROR_LOG_FILE),
            max_bytes: LOG_MAX_BYTES,
            debug: true,
            console: true,
        }
    }
}

/// Call-site of an error entry.
#[derive(Clone, Copy, Debug)]
pub struct Site {
    pub file: &'static str,
    /// `module_path!()` of the caller.
    pub module: &'static str,
    pub line: u32,
}

impl Site {
    /// Module path without the crate name, dotted: `core.net`. Falls back to
    /// the file stem at a crate root.
    pub fn scope(&self) -> String {
        match self.module.split_once("::") {
            Some((_, rest)) => rest.replace("::", "."),
            None => Path::new(self.file)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(self.file)
                .to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Logger {
    config: LogConfig,
}

impl Logger {
    pub fn new(config: LogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Create the output directory if it is missing.
    pub fn make_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config.output_dir)
    }

    pub fn info(&self, msg: &str) -> bool {
        if self.config.console {
            println!("{msg}");
        }
        let line = format!("[{}] {}\n", time::timestamp(), msg.trim_end_matches('\n'));
        self.append(&self.config.log_path, &line)
    }

    pub fn error(&self, msg: &str, site: Site) -> bool {
        if self.config.console {
            eprintln!("{msg}");
        }
        let line = format_error_entry(&time::timestamp(), site, msg);
        self.append(&self.config.error_log_path, &line)
    }

    /// Debug output never touches a file. Returns whether debug output is on.
    pub fn debug(&self, msg: &str) -> bool {
        if self.config.debug {
            println!("{msg}");
        }
        self.config.debug
    }

    fn append(&self, path: &Path, text: &str) -> bool {
        let Ok(_guard) = LOG_LOCK.lock() else {
            return false;
        };

        let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        if size >= self.config.max_bytes {
            println!("Log file is full, skipped writing to {}", path.display());
            return false;
        }

        if self.make_dir().is_err() {
            return false;
        }
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(mut file) => file.write_all(text.as_bytes()).is_ok(),
            Err(_) => false,
        }
    }
}

/// `[time] scope(line)` padded to a fixed column, then the message.
/// Continuation lines get a padded `[time]` so the message column stays
/// aligned.
pub fn format_error_entry(stamp: &str, site: Site, msg: &str) -> String {
    let head = format!("[{stamp}] {}({})", site.scope(), site.line);
    let cont = format!("\n{:<w$}", format!("[{stamp}]"), w = ERROR_PREFIX_WIDTH);
    let body = msg.trim_end_matches('\n').replace('\n', &cont);
    format!("{head:<w$}{body}\n", w = ERROR_PREFIX_WIDTH)
}

/// Install the process-wide logger. Returns false if one is already installed.
pub fn init(config: LogConfig) -> bool {
    LOGGER.set(Logger::new(config)).is_ok()
}

pub fn logger() -> Option<&'static Logger> {
    LOGGER.get()
}

/// Internal logging function
pub fn write_log(level: Level, msg: &str, site: Site) -> bool {
    match (LOGGER.get(), level) {
        (Some(l), Level::Info) => l.info(msg),
        (Some(l), Level::Debug) => l.debug(msg),
        (Some(l), Level::Error) => l.error(msg, site),
        // Not installed yet: console only.
        (None, Level::Error) => {
            eprintln!("[{}] {msg}", level.as_str());
            false
        }
        (None, _) => {
            println!("[{}] {msg}", level.as_str());
            false
        }
    }
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        $crate::log::write_log(
            $crate::log::Level::Info,
            &format!($($arg)*),
            $crate::log::Site { file: file!(), module: module_path!(), line: line!() },
        )
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        $crate::log::write_log(
            $crate::log::Level::Debug,
            &format!($($arg)*),
            $crate::log::Site { file: file!(), module: module_path!(), line: line!() },
        )
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        $crate::log::write_log(
            $crate::log::Level::Error,
            &format!($($arg)*),
            $crate::log::Site { file: file!(), module: module_path!(), line: line!() },
        )
    };
}
