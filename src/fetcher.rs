/*============================================================
  Synavera Project: WP-Install
  Module: wpinstall_core::fetcher
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Download a release archive and park it in a scoped
    temporary file for the extractor.

  Security / Safety Notes:
    Temporary files are created with unpredictable names and
    removed when the handle is released or dropped.

  Dependencies:
    tempfile for scoped temporary files.

  Operational Scope:
    Second stage of every install run.

  Revision History:
    2026-10-19 COD  Implemented archive fetcher.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Scoped resources released on every exit path
    - Explicit failure classification
============================================================*/

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{InstallError, Result};
use crate::transport::Transport;

/// Downloaded archive held in a temporary file.
///
/// The backing file is deleted when the handle is released or dropped.
#[derive(Debug)]
pub struct TempArchive {
    file: NamedTempFile,
}

impl TempArchive {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the backing file, reporting failures instead of ignoring them.
    pub fn release(self) -> Result<()> {
        let path = self.file.path().to_path_buf();
        self.file.close().map_err(|err| {
            InstallError::Filesystem(format!(
                "Failed to remove temporary archive {}: {err}",
                path.display()
            ))
        })
    }
}

pub struct ArchiveFetcher<'a, T: Transport> {
    transport: &'a T,
    temp_dir: Option<PathBuf>,
}

impl<'a, T: Transport> ArchiveFetcher<'a, T> {
    pub fn new(transport: &'a T, temp_dir: Option<PathBuf>) -> Self {
        Self {
            transport,
            temp_dir,
        }
    }

    /// Download `url` into a fresh temporary archive.
    pub async fn fetch(&self, url: &str) -> Result<TempArchive> {
        let bytes = self
            .transport
            .get(url)
            .await
            .map_err(|err| InstallError::DownloadFailed {
                url: url.to_string(),
                reason: err.reason,
            })?;
        if bytes.is_empty() {
            return Err(InstallError::DownloadFailed {
                url: url.to_string(),
                reason: "empty response".into(),
            });
        }

        let mut file = self.create_temp()?;
        file.write_all(&bytes)
            .and_then(|_| file.flush())
            .map_err(|err| {
                InstallError::TempWriteFailed(format!("{}: {err}", file.path().display()))
            })?;

        Ok(TempArchive { file })
    }

    fn create_temp(&self) -> Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("wp_").suffix(".zip");
        let created = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        created.map_err(|err| {
            InstallError::TempWriteFailed(format!("cannot create temporary file: {err}"))
        })
    }
}
