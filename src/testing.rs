/*============================================================
  Synavera Project: WP-Install
  Module: wpinstall_core::testing
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    In-memory transport and archive builders shared by unit
    tests across the resolver, fetcher, extractor and
    installer modules.

  Security / Safety Notes:
    Compiled for tests only; performs no network I/O.

  Dependencies:
    zip for building fixture archives.

  Operational Scope:
    Test harness support; never linked into release builds.

  Revision History:
    2026-10-19 COD  Added shared test fixtures.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic fixtures
    - Every request recorded for assertion
============================================================*/

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::transport::{Transport, TransportError};

/// Transport serving canned bodies and recording every request.
#[derive(Default)]
pub struct FakeTransport {
    bodies: HashMap<String, Vec<u8>>,
    present: HashSet<String>,
    requests: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub fn with_body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.to_string(), body.into());
        self
    }

    pub fn with_present(mut self, url: &str) -> Self {
        self.present.insert(url.to_string());
        self
    }

    /// Requests seen so far, as `GET <url>` / `HEAD <url>`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.requests.borrow_mut().push(format!("GET {url}"));
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::new("server responded with 404 Not Found"))
    }

    async fn probe(&self, url: &str) -> bool {
        self.requests.borrow_mut().push(format!("HEAD {url}"));
        self.present.contains(url)
    }
}

/// Build a ZIP archive in memory. Names ending in `/` become directory entries.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, payload) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(payload).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// The small release archive used across tests.
pub fn sample_release() -> Vec<u8> {
    zip_bytes(&[
        ("wordpress/", b""),
        ("wordpress/index.php", b"<?php // index"),
        ("wordpress/wp-admin/", b""),
        ("wordpress/wp-admin/admin.php", b"<?php // admin"),
        ("wordpress/wp-includes/version.php", b"<?php $wp_version = '6.2';"),
    ])
}
