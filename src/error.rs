/*============================================================
  Synavera Project: WP-Install
  Module: wpinstall_core::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Centralise WP-Install error types so every stage reports a
    single human-readable failure and a uniform exit status.

  Security / Safety Notes:
    Messages expose URLs and local paths only; no credentials
    are ever carried in error contexts.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Used across resolver, fetcher, extractor and installer to
    propagate fatal failures to the binary entry point.

  Revision History:
    2026-10-19 COD  Established installer error taxonomy.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - No silent failure paths
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

/// Result alias for WP-Install operations.
pub type Result<T> = std::result::Result<T, InstallError>;

/// Every failure an install run can end with.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Invalid version format `{spec}` (expected 1 to 3 dot-separated numbers)")]
    InvalidVersionFormat { spec: String },
    #[error("Invalid folder name `{name}` (allowed: letters, digits, `_` and `-`)")]
    InvalidFolderName { name: String },
    #[error("Version {version} not found at {url}")]
    VersionNotFound { version: String, url: String },
    #[error("Failed to fetch version metadata from {url}: {reason}")]
    MetadataFetchFailed { url: String, reason: String },
    #[error("Failed to parse version metadata: {0}")]
    MetadataParseFailed(String),
    #[error("Download failed: {url}: {reason}")]
    DownloadFailed { url: String, reason: String },
    #[error("Failed to save archive to temporary file: {0}")]
    TempWriteFailed(String),
    #[error("Failed to open ZIP archive {path}: {reason}")]
    ArchiveOpenFailed { path: PathBuf, reason: String },
    #[error("Archive entry `{entry}` escapes the destination directory")]
    UnsafeEntryPath { entry: String },
    #[error("Failed to create directory {path}: {reason}")]
    DirectoryCreateFailed { path: PathBuf, reason: String },
    #[error("Failed to write file {path}: {reason}")]
    FileWriteFailed { path: PathBuf, reason: String },
    #[error("Destination already exists: {}", path.display())]
    DestinationExists { path: PathBuf },
    #[error("Usage: {0}")]
    Usage(String),
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Coarse grouping used in log codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Network,
    Filesystem,
    Archive,
    Config,
}

impl ErrorCategory {
    pub fn code(self) -> &'static str {
        match self {
            ErrorCategory::Validation => "VALIDATE",
            ErrorCategory::Network => "NETWORK",
            ErrorCategory::Filesystem => "FS",
            ErrorCategory::Archive => "ARCHIVE",
            ErrorCategory::Config => "CONFIG",
        }
    }
}

impl InstallError {
    /// Classify the error into its reporting domain.
    pub fn category(&self) -> ErrorCategory {
        match self {
            InstallError::InvalidVersionFormat { .. }
            | InstallError::InvalidFolderName { .. }
            | InstallError::VersionNotFound { .. }
            | InstallError::Usage(_) => ErrorCategory::Validation,
            InstallError::MetadataFetchFailed { .. }
            | InstallError::MetadataParseFailed(_)
            | InstallError::DownloadFailed { .. } => ErrorCategory::Network,
            InstallError::TempWriteFailed(_)
            | InstallError::DirectoryCreateFailed { .. }
            | InstallError::FileWriteFailed { .. }
            | InstallError::DestinationExists { .. }
            | InstallError::Filesystem(_)
            | InstallError::Io(_) => ErrorCategory::Filesystem,
            InstallError::ArchiveOpenFailed { .. } | InstallError::UnsafeEntryPath { .. } => {
                ErrorCategory::Archive
            }
            InstallError::Config(_) => ErrorCategory::Config,
        }
    }

    /// All install failures are fatal to the run and share one exit status.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::FAILURE
    }
}
