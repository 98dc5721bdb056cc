/*============================================================
  Synavera Project: WP-Install
  Module: wpinstall_core::logger
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Structured, append-only session logging for install runs.

  Security / Safety Notes:
    Log lines carry URLs, versions and local paths only.

  Dependencies:
    chrono for UTC timestamps, sha2 for the session digest.

  Operational Scope:
    Created by the binary entry point; borrowed by the
    installer for stage-by-stage progress records.

  Revision History:
    2026-10-19 COD  Adapted Synavera logger for WP-Install.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Append-only logging with UTC timestamps
    - Deterministic formatting for auditability
    - Graceful error propagation on I/O failures
============================================================*/

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::error::{InstallError, Result};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }

    fn always_shown(self) -> bool {
        matches!(self, LogLevel::Warn | LogLevel::Error)
    }
}

/// Session logger writing to stderr and, optionally, an append-only file.
pub struct Logger {
    sink: Option<Mutex<BufWriter<File>>>,
    path: Option<PathBuf>,
    verbose: bool,
}

impl Logger {
    /// Build a logger that writes to stderr and optionally to a file.
    pub fn new(path: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let sink = match &path {
            Some(file_path) => Some(Mutex::new(BufWriter::new(open_append(file_path)?))),
            None => None,
        };
        Ok(Self {
            sink,
            path,
            verbose,
        })
    }

    /// Emit `<ts> [LEVEL] [CODE] message`.
    pub fn log<S: AsRef<str>>(&self, level: LogLevel, code: &str, message: S) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let line = format!(
            "{timestamp} [{}] [{code}] {}",
            level.as_str(),
            message.as_ref()
        );

        if self.verbose || level.always_shown() {
            eprintln!("{line}");
        }
        self.append(&timestamp, &line);
    }

    fn append(&self, timestamp: &str, line: &str) {
        let Some(sink) = &self.sink else {
            return;
        };
        let Ok(mut writer) = sink.lock() else {
            return;
        };
        let written = writeln!(writer, "{line}").and_then(|_| writer.flush());
        if let Err(err) = written {
            eprintln!(
                "{timestamp} [{}] [LOGGER] Failed to write log file: {err}",
                LogLevel::Error.as_str()
            );
        }
    }

    /// Convenience wrapper for `INFO` level events.
    pub fn info<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Info, code, message);
    }

    /// Convenience wrapper for `WARN` level events.
    pub fn warn<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Warn, code, message);
    }

    /// Convenience wrapper for `ERROR` level events.
    pub fn error<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Error, code, message);
    }

    /// Convenience wrapper for `DEBUG` level events.
    pub fn debug<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Debug, code, message);
    }

    /// Return the path backing this logger, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write `<log>.hash` holding the SHA-256 of the session log.
    pub fn finalize(&self) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        if let Some(sink) = &self.sink {
            if let Ok(mut writer) = sink.lock() {
                writer.flush()?;
            }
        }

        let data = std::fs::read(path).map_err(|err| {
            InstallError::Filesystem(format!(
                "Failed to read log for hashing {}: {err}",
                path.display()
            ))
        })?;
        let digest = Sha256::digest(&data);

        let mut hash_name = path.as_os_str().to_os_string();
        hash_name.push(".hash");
        let hash_path = PathBuf::from(hash_name);
        let file_name = path.file_name().unwrap_or_default().to_string_lossy();
        std::fs::write(&hash_path, format!("{digest:x}  {file_name}\n")).map_err(|err| {
            InstallError::Filesystem(format!(
                "Failed to write hash file {}: {err}",
                hash_path.display()
            ))
        })
    }
}

fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            InstallError::Filesystem(format!(
                "Failed to create log directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| {
            InstallError::Filesystem(format!(
                "Failed to open log file {}: {err}",
                path.display()
            ))
        })
}
