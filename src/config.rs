/*============================================================
  Synavera Project: WP-Install
  Module: wpinstall_core::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Hold the endpoints, naming conventions and HTTP settings
    that the resolver, fetcher and extractor are built from.

  Security / Safety Notes:
    Configuration is read only from a path the operator names
    explicitly; nothing is written back to disk.

  Dependencies:
    serde + toml for configuration parsing.

  Operational Scope:
    Loaded once by the binary entry point and handed to each
    component at construction.

  Revision History:
    2026-10-19 COD  Authored installer configuration layer.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit defaults with operator overrides
    - Validation before use
============================================================*/

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{InstallError, Result};
use crate::version::Version;

pub const DEFAULT_API_URL: &str = "https://api.wordpress.org/core/version-check/1.7/";
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://wordpress.org";
pub const DEFAULT_PRODUCT: &str = "wordpress";

/// Top-level installer configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    pub source: SourceConfig,
    pub http: HttpConfig,
    pub install: InstallConfig,
}

/// Where releases are discovered and downloaded from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Version metadata endpoint returning an `offers` list.
    pub api_url: String,
    /// Base URL archives live under.
    pub download_base: String,
    /// Product slug used in archive names and default folder names.
    pub product: String,
    /// Top-level folder name wrapped around every archive.
    pub wrapper: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
            product: DEFAULT_PRODUCT.to_string(),
            wrapper: DEFAULT_PRODUCT.to_string(),
        }
    }
}

impl SourceConfig {
    /// Canonical archive URL: `<download_base>/<product>-<version>.zip`.
    pub fn download_url(&self, version: &Version) -> String {
        format!(
            "{}/{}-{}.zip",
            self.download_base.trim_end_matches('/'),
            self.product,
            version
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: 120,
            user_agent: concat!("WP-Install/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallConfig {
    /// Directory for the temporary archive; system default when unset.
    pub temp_dir: Option<PathBuf>,
    /// Directory for session logs; no log file when unset.
    pub log_dir: Option<PathBuf>,
}

impl InstallerConfig {
    /// Load configuration from `path`, or fall back to built-in defaults.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            InstallError::Config(format!(
                "Failed to read config file {}: {err}",
                path.display()
            ))
        })?;
        Self::parse(&raw).map_err(|err| match err {
            InstallError::Config(msg) => {
                InstallError::Config(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Parse configuration from TOML text.
    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw)
            .map_err(|err| InstallError::Config(format!("Invalid configuration: {err}")))
    }

    fn validate(&self) -> Result<()> {
        let source = &self.source;
        for (key, value) in [
            ("source.api_url", &source.api_url),
            ("source.download_base", &source.download_base),
            ("source.product", &source.product),
            ("source.wrapper", &source.wrapper),
        ] {
            if value.trim().is_empty() {
                return Err(InstallError::Config(format!("`{key}` must not be empty")));
            }
        }
        if source.wrapper.contains('/') {
            return Err(InstallError::Config(
                "`source.wrapper` must be a single path segment".into(),
            ));
        }
        if self.http.timeout == 0 {
            return Err(InstallError::Config(
                "`http.timeout` must be at least 1 second".into(),
            ));
        }
        Ok(())
    }
}
