/*============================================================
  Synavera Project: WP-Install
  Module: wpinstall_core::extractor
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Materialize a release archive under the destination while
    removing the archive's wrapper folder, so files land
    directly in the operator's chosen directory.

  Security / Safety Notes:
    Entry paths are checked lexically before any write; an
    entry that would escape the destination aborts extraction.

  Dependencies:
    zip for archive parsing.

  Operational Scope:
    Final stage of every install run.

  Revision History:
    2026-10-19 COD  Authored archive extractor.
  ------------------------------------------------------------
  SSE Principles Observed:
    - First failure aborts, nothing is silently skipped
    - Entries processed in archive order
    - No rollback: partial trees are left for inspection
============================================================*/

use std::fs::{self, File};
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use zip::ZipArchive;

use crate::error::{InstallError, Result};

/// One archive member, read on demand.
#[derive(Debug)]
pub struct ArchiveEntry {
    pub raw_path: String,
    pub is_directory: bool,
    pub payload: Option<Vec<u8>>,
}

/// Maps archive paths onto the destination tree.
#[derive(Debug, Clone)]
pub struct TargetLayout {
    pub root_strip_prefix: String,
    pub destination_dir: PathBuf,
}

impl TargetLayout {
    pub fn new(wrapper: &str, destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_strip_prefix: format!("{}/", wrapper.trim_end_matches('/')),
            destination_dir: destination_dir.into(),
        }
    }

    /// Strip the wrapper segment from a raw entry path.
    ///
    /// Only a single leading segment equal to the wrapper is removed; other
    /// top-level names pass through untouched.
    pub fn relative<'p>(&self, raw_path: &'p str) -> &'p str {
        let stripped = raw_path
            .strip_prefix(self.root_strip_prefix.as_str())
            .unwrap_or(raw_path);
        stripped.trim_end_matches('/')
    }

    /// Destination path for an entry, or `None` for the wrapper itself.
    pub fn map(&self, raw_path: &str) -> Result<Option<PathBuf>> {
        let relative = self.relative(raw_path);
        if relative.is_empty() {
            return Ok(None);
        }

        let relative = Path::new(relative);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(InstallError::UnsafeEntryPath {
                entry: raw_path.to_string(),
            });
        }
        Ok(Some(self.destination_dir.join(relative)))
    }
}

/// Extract `archive_path` into `destination_dir`, stripping `wrapper/`.
pub fn extract(archive_path: &Path, destination_dir: &Path, wrapper: &str) -> Result<()> {
    let file = File::open(archive_path).map_err(|err| open_failed(archive_path, err))?;
    let mut archive = ZipArchive::new(file).map_err(|err| open_failed(archive_path, err))?;

    create_destination(destination_dir)?;
    let layout = TargetLayout::new(wrapper, destination_dir);

    for index in 0..archive.len() {
        let entry = read_entry(&mut archive, index, archive_path)?;
        write_entry(&layout, entry)?;
    }

    Ok(())
}

fn open_failed(path: &Path, err: impl std::fmt::Display) -> InstallError {
    InstallError::ArchiveOpenFailed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

fn create_destination(destination_dir: &Path) -> Result<()> {
    let dir_failed = |path: &Path, err: std::io::Error| InstallError::DirectoryCreateFailed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    };

    if let Some(parent) = destination_dir.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| dir_failed(parent, err))?;
        }
    }
    // Non-recursive on purpose: a pre-existing destination is an error.
    fs::create_dir(destination_dir).map_err(|err| dir_failed(destination_dir, err))
}

fn read_entry(
    archive: &mut ZipArchive<File>,
    index: usize,
    archive_path: &Path,
) -> Result<ArchiveEntry> {
    let mut member = archive
        .by_index(index)
        .map_err(|err| open_failed(archive_path, err))?;
    let raw_path = member.name().to_string();
    let is_directory = raw_path.ends_with('/');

    let payload = if is_directory {
        None
    } else {
        // Header sizes are untrusted; let the buffer grow with the data.
        let mut buffer = Vec::new();
        member
            .read_to_end(&mut buffer)
            .map_err(|err| open_failed(archive_path, format!("{raw_path}: {err}")))?;
        Some(buffer)
    };

    Ok(ArchiveEntry {
        raw_path,
        is_directory,
        payload,
    })
}

fn write_entry(layout: &TargetLayout, entry: ArchiveEntry) -> Result<()> {
    let Some(target) = layout.map(&entry.raw_path)? else {
        return Ok(());
    };

    if entry.is_directory {
        return fs::create_dir_all(&target).map_err(|err| {
            InstallError::DirectoryCreateFailed {
                path: target.clone(),
                reason: err.to_string(),
            }
        });
    }

    let write_failed = |path: &Path, err: std::io::Error| InstallError::FileWriteFailed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    };
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|err| write_failed(parent, err))?;
    }
    fs::write(&target, entry.payload.unwrap_or_default()).map_err(|err| write_failed(&target, err))
}
