/*============================================================
  Synavera Project: WP-Install
  Module: wpinstall_core::transport
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Provide the network capability used by the resolver and
    fetcher: full-body GET requests and header-only probes.

  Security / Safety Notes:
    Performs read-only HTTP(S) requests. No credentials are
    transmitted.

  Dependencies:
    reqwest for HTTP.

  Operational Scope:
    HttpTransport is the production implementation; tests
    substitute in-memory transports through the same trait.

  Revision History:
    2026-10-19 COD  Implemented reqwest-backed transport.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Single attempt per request, failures surfaced at once
    - Configurable timeouts and user agent
============================================================*/

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::HttpConfig;
use crate::error::{InstallError, Result};

/// Failure reported by a transport for a single request.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct TransportError {
    pub reason: String,
}

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Network capability consumed by the resolver and fetcher.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Retrieve the full body at `url`; non-success statuses are failures.
    async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, TransportError>;

    /// Header-only existence check; true only on `200 OK`.
    async fn probe(&self, url: &str) -> bool;
}

/// reqwest-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Construct a new transport from configuration.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|err| {
                InstallError::Config(format!("Failed to build HTTP client: {err}"))
            })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| TransportError::new(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(format!("server responded with {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError::new(format!("failed to read body: {err}")))?;
        Ok(body.to_vec())
    }

    async fn probe(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(_) => false,
        }
    }
}
