/*============================================================
  Synavera Project: WP-Install
  Module: wpinstall_core::request
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Shared structures describing what the operator asked for
    and what an install run produced.

  Security / Safety Notes:
    Pure data container; no I/O performed in this module.

  Dependencies:
    None beyond std.

  Operational Scope:
    Built once from CLI tokens, read by the installer, and
    reported back by the binary entry point.

  Revision History:
    2026-10-19 COD  Introduced InstallRequest/InstallResult.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Clear data contracts between modules
    - Immutable after construction
============================================================*/

use std::path::PathBuf;

use crate::version::Version;

const VERSION_TOKEN_PREFIX: &str = "v=";

/// Operator request: which release, and into which folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallRequest {
    pub version_spec: Option<String>,
    pub folder_name: Option<String>,
}

impl InstallRequest {
    pub fn new(version_spec: Option<String>, folder_name: Option<String>) -> Self {
        Self {
            version_spec,
            folder_name,
        }
    }

    /// Build a request from order-independent tokens: `v=<spec>` selects the
    /// version, any other token names the folder. Repeats: last one wins.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut version_spec = None;
        let mut folder_name = None;
        for token in tokens {
            let token = token.as_ref();
            match token.strip_prefix(VERSION_TOKEN_PREFIX) {
                Some(spec) => version_spec = Some(spec.to_string()),
                None => folder_name = Some(token.to_string()),
            }
        }
        Self::new(version_spec, folder_name)
    }
}

/// Outcome of a successful install.
#[derive(Debug, Clone)]
pub struct InstallResult {
    pub version: Version,
    pub destination: PathBuf,
}
