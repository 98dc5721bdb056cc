/*============================================================
  Synavera Project: WP-Install
  Module: wpinstall_core::resolver
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Turn the operator's version request into a concrete,
    downloadable release: normalize explicit specs, confirm
    they exist upstream, or ask the version-check API for the
    latest offer.

  Security / Safety Notes:
    Performs read-only GET/HEAD requests against configured
    endpoints only.

  Dependencies:
    serde for response parsing.

  Operational Scope:
    First stage of every install run.

  Revision History:
    2026-10-19 COD  Implemented release version resolver.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Structured response parsing with explicit error paths
    - Non-existence treated as an outcome, not a fault
============================================================*/

use serde::Deserialize;

use crate::config::SourceConfig;
use crate::error::{InstallError, Result};
use crate::transport::Transport;
use crate::version::Version;

/// Resolves version specs against the configured release source.
pub struct VersionResolver<'a, T: Transport> {
    transport: &'a T,
    source: &'a SourceConfig,
}

#[derive(Debug, Deserialize)]
struct VersionCheckResponse {
    #[serde(default)]
    offers: Vec<Offer>,
}

#[derive(Debug, Deserialize)]
struct Offer {
    version: Option<String>,
}

impl<'a, T: Transport> VersionResolver<'a, T> {
    pub fn new(transport: &'a T, source: &'a SourceConfig) -> Self {
        Self { transport, source }
    }

    /// Resolve an optional spec: explicit specs must exist upstream,
    /// an absent spec means the latest offered release.
    pub async fn resolve(&self, spec: Option<&str>) -> Result<Version> {
        match spec {
            Some(spec) => {
                let version = Version::normalize(spec)?;
                if !self.exists(&version).await {
                    return Err(InstallError::VersionNotFound {
                        version: version.to_string(),
                        url: self.source.download_url(&version),
                    });
                }
                Ok(version)
            }
            None => self.resolve_latest().await,
        }
    }

    /// Query the version-check endpoint for the first offered release.
    pub async fn resolve_latest(&self) -> Result<Version> {
        let url = &self.source.api_url;
        let body = self.transport.get(url).await.map_err(|err| {
            InstallError::MetadataFetchFailed {
                url: url.clone(),
                reason: err.reason,
            }
        })?;
        if body.is_empty() {
            return Err(InstallError::MetadataFetchFailed {
                url: url.clone(),
                reason: "empty response".into(),
            });
        }

        let payload: VersionCheckResponse = serde_json::from_slice(&body)
            .map_err(|err| InstallError::MetadataParseFailed(err.to_string()))?;
        let latest = payload
            .offers
            .into_iter()
            .next()
            .ok_or_else(|| InstallError::MetadataParseFailed("no offers listed".into()))?
            .version
            .ok_or_else(|| {
                InstallError::MetadataParseFailed("first offer has no `version`".into())
            })?;

        Version::normalize(&latest)
    }

    /// Probe the canonical download URL; any failure reads as absent.
    pub async fn exists(&self, version: &Version) -> bool {
        self.transport
            .probe(&self.source.download_url(version))
            .await
    }
}
