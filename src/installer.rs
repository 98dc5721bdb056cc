/*============================================================
  Synavera Project: WP-Install
  Module: wpinstall_core::installer
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Sequence one install run: validate the folder, resolve the
    version, download the archive, extract it, and clean up
    the temporary archive on every path.

  Security / Safety Notes:
    Folder names are restricted to a single safe path segment;
    the installer never writes outside the base directory.

  Dependencies:
    chrono for default folder timestamps.

  Operational Scope:
    Called once per process by the binary entry point.

  Revision History:
    2026-10-19 COD  Authored install orchestrator.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling, first failure is final
    - Scoped temporary resources
    - Structured logging following Synavera cadence
============================================================*/

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::InstallerConfig;
use crate::error::{InstallError, Result};
use crate::extractor;
use crate::fetcher::ArchiveFetcher;
use crate::logger::Logger;
use crate::request::{InstallRequest, InstallResult};
use crate::resolver::VersionResolver;
use crate::transport::Transport;
use crate::version::Version;

const FOLDER_STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Operator-facing progress line for each install stage.
#[derive(Debug, Clone, Copy)]
pub enum Stage<'v> {
    Lookup,
    Download(&'v Version),
    Extract,
}

impl fmt::Display for Stage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lookup => write!(f, "🔍 Fetching latest WordPress version..."),
            Stage::Download(version) => write!(f, "⬇️  Downloading WordPress {version}..."),
            Stage::Extract => write!(f, "📦 Extracting files..."),
        }
    }
}

/// Drives resolver → fetcher → extractor for a single request.
pub struct Installer<'a, T: Transport> {
    transport: &'a T,
    config: &'a InstallerConfig,
    base_dir: PathBuf,
    logger: &'a Logger,
    clock: fn() -> DateTime<Local>,
}

impl<'a, T: Transport> Installer<'a, T> {
    /// `base_dir` is the directory install folders are created in.
    pub fn new(
        transport: &'a T,
        config: &'a InstallerConfig,
        base_dir: PathBuf,
        logger: &'a Logger,
    ) -> Self {
        Self {
            transport,
            config,
            base_dir,
            logger,
            clock: Local::now,
        }
    }

    /// Replace the clock used for synthesized folder names.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn install(&self, request: &InstallRequest) -> Result<InstallResult> {
        let source = &self.config.source;

        // An explicit folder is checked before any network traffic.
        let explicit_destination = match request.folder_name.as_deref() {
            Some(name) => {
                validate_folder_name(name)?;
                let destination = self.base_dir.join(name);
                ensure_vacant(&destination)?;
                Some(destination)
            }
            None => None,
        };

        let resolver = VersionResolver::new(self.transport, source);
        let spec = request.version_spec.as_deref();
        match spec {
            Some(spec) => self
                .logger
                .info("RESOLVE", format!("Checking requested version {spec}")),
            None => {
                println!("{}", Stage::Lookup);
                self.logger
                    .info("RESOLVE", format!("Querying {}", source.api_url));
            }
        }
        let version = resolver.resolve(spec).await?;
        self.logger
            .info("VERSION", format!("Resolved {} {version}", source.product));

        let destination = match explicit_destination {
            Some(destination) => destination,
            None => {
                let name = default_folder_name(&source.product, &version, (self.clock)());
                let destination = self.base_dir.join(name);
                ensure_vacant(&destination)?;
                destination
            }
        };

        let url = source.download_url(&version);
        println!("{}", Stage::Download(&version));
        self.logger.info("DOWNLOAD", format!("Fetching {url}"));
        let fetcher = ArchiveFetcher::new(self.transport, self.config.install.temp_dir.clone());
        let archive = fetcher.fetch(&url).await?;
        self.logger.debug(
            "DOWNLOAD",
            format!("Archive staged at {}", archive.path().display()),
        );

        println!("{}", Stage::Extract);
        self.logger.info(
            "EXTRACT",
            format!("Extracting into {}", destination.display()),
        );
        let extracted = extractor::extract(archive.path(), &destination, &source.wrapper);
        let released = archive.release();
        extracted?;
        released?;

        self.logger.info(
            "COMPLETE",
            format!("{} {version} installed at {}", source.product, destination.display()),
        );
        Ok(InstallResult {
            version,
            destination,
        })
    }
}

/// Folder names are a single segment of `[A-Za-z0-9_-]`.
pub fn validate_folder_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(InstallError::InvalidFolderName {
            name: name.to_string(),
        })
    }
}

/// `<product>_<version>_<YYYYMMDDHHMMSS>` in local time.
pub fn default_folder_name(product: &str, version: &Version, at: DateTime<Local>) -> String {
    format!("{product}_{version}_{}", at.format(FOLDER_STAMP_FORMAT))
}

fn ensure_vacant(destination: &Path) -> Result<()> {
    // symlink_metadata so a dangling link still counts as occupied.
    if destination.symlink_metadata().is_ok() {
        return Err(InstallError::DestinationExists {
            path: destination.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_release, FakeTransport};
    use chrono::TimeZone;
    use std::collections::BTreeSet;
    use std::fs;

    const API: &str = "https://api.wordpress.org/core/version-check/1.7/";
    const ARCHIVE_62: &str = "https://wordpress.org/wordpress-6.2.zip";

    struct Sandbox {
        _root: tempfile::TempDir,
        base: PathBuf,
        temp: PathBuf,
        config: InstallerConfig,
        logger: Logger,
    }

    fn sandbox() -> Sandbox {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().join("www");
        let temp = root.path().join("tmp");
        fs::create_dir(&base).unwrap();
        fs::create_dir(&temp).unwrap();
        let mut config = InstallerConfig::default();
        config.install.temp_dir = Some(temp.clone());
        Sandbox {
            _root: root,
            base,
            temp,
            config,
            logger: Logger::new(None, false).unwrap(),
        }
    }

    fn files(root: &Path) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            for item in fs::read_dir(&dir).unwrap() {
                let path = item.unwrap().path();
                if path.is_dir() {
                    pending.push(path);
                } else {
                    found.insert(path.strip_prefix(root).unwrap().to_string_lossy().into_owned());
                }
            }
        }
        found
    }

    #[test]
    fn folder_name_rules() {
        assert!(validate_folder_name("my-site_1").is_ok());
        for name in ["my site", "../evil", "", "a/b", "site.old", "ünï"] {
            assert!(
                matches!(
                    validate_folder_name(name),
                    Err(InstallError::InvalidFolderName { .. })
                ),
                "`{name}` should be rejected"
            );
        }
    }

    #[test]
    fn default_name_embeds_version_and_calendar_stamp() {
        let at = Local.with_ymd_and_hms(2024, 1, 31, 9, 5, 7).unwrap();
        let version = Version::normalize("6.4.2").unwrap();
        assert_eq!(
            default_folder_name("wordpress", &version, at),
            "wordpress_6.4.2_20240131090507"
        );
    }

    #[test]
    fn stage_lines_match_console_wording() {
        let version = Version::normalize("6.4.2").unwrap();
        assert_eq!(Stage::Lookup.to_string(), "🔍 Fetching latest WordPress version...");
        assert_eq!(
            Stage::Download(&version).to_string(),
            "⬇️  Downloading WordPress 6.4.2..."
        );
        assert_eq!(Stage::Extract.to_string(), "📦 Extracting files...");
    }

    fn fixed_clock() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 31, 9, 5, 7).unwrap()
    }

    #[tokio::test]
    async fn synthesized_folder_collision_stops_before_download() {
        let sb = sandbox();
        let archive = "https://wordpress.org/wordpress-6.4.2.zip";
        let transport = FakeTransport::default()
            .with_body(API, r#"{"offers":[{"version":"6.4.2"}]}"#)
            .with_body(archive, sample_release());
        let taken = sb.base.join("wordpress_6.4.2_20240131090507");
        fs::create_dir(&taken).unwrap();
        let installer = Installer::new(&transport, &sb.config, sb.base.clone(), &sb.logger)
            .with_clock(fixed_clock);

        match installer.install(&InstallRequest::default()).await {
            Err(InstallError::DestinationExists { path }) => assert_eq!(path, taken),
            other => panic!("expected DestinationExists, got {other:?}"),
        }
        assert_eq!(transport.requests(), vec![format!("GET {API}")]);
        assert_eq!(fs::read_dir(&sb.temp).unwrap().count(), 0);
        assert_eq!(fs::read_dir(&taken).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn installs_requested_version_into_named_folder() {
        let sb = sandbox();
        let transport = FakeTransport::default()
            .with_present(ARCHIVE_62)
            .with_body(ARCHIVE_62, sample_release());
        let installer = Installer::new(&transport, &sb.config, sb.base.clone(), &sb.logger);

        let request = InstallRequest::new(Some("6.2".into()), Some("site1".into()));
        let result = installer.install(&request).await.unwrap();

        assert_eq!(result.destination, sb.base.join("site1"));
        assert_eq!(result.version.to_string(), "6.2");
        let expected: BTreeSet<String> = [
            "index.php",
            "wp-admin/admin.php",
            "wp-includes/version.php",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(files(&result.destination), expected);
        assert_eq!(
            transport.requests(),
            vec![format!("HEAD {ARCHIVE_62}"), format!("GET {ARCHIVE_62}")]
        );
        assert_eq!(fs::read_dir(&sb.temp).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn latest_release_gets_synthesized_folder() {
        let sb = sandbox();
        let archive = "https://wordpress.org/wordpress-6.4.2.zip";
        let transport = FakeTransport::default()
            .with_body(API, r#"{"offers":[{"version":"6.4.2"}]}"#)
            .with_body(archive, sample_release());
        let installer = Installer::new(&transport, &sb.config, sb.base.clone(), &sb.logger);

        let result = installer.install(&InstallRequest::default()).await.unwrap();

        assert_eq!(result.version.to_string(), "6.4.2");
        let name = result
            .destination
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert!(name.starts_with("wordpress_6.4.2_"), "{name}");
        assert_eq!(name.len(), "wordpress_6.4.2_".len() + 14);
        assert!(result.destination.join("index.php").is_file());
    }

    #[tokio::test]
    async fn second_install_into_same_folder_is_refused_offline() {
        let sb = sandbox();
        let transport = FakeTransport::default()
            .with_present(ARCHIVE_62)
            .with_body(ARCHIVE_62, sample_release());
        let installer = Installer::new(&transport, &sb.config, sb.base.clone(), &sb.logger);
        let request = InstallRequest::new(Some("6.2".into()), Some("site1".into()));

        installer.install(&request).await.unwrap();
        let before = transport.requests().len();
        let files_before = files(&sb.base.join("site1"));

        match installer.install(&request).await {
            Err(InstallError::DestinationExists { path }) => {
                assert_eq!(path, sb.base.join("site1"))
            }
            other => panic!("expected DestinationExists, got {other:?}"),
        }
        assert_eq!(transport.requests().len(), before);
        assert_eq!(files(&sb.base.join("site1")), files_before);
    }

    #[tokio::test]
    async fn invalid_folder_name_fails_before_network() {
        let sb = sandbox();
        let transport = FakeTransport::default();
        let installer = Installer::new(&transport, &sb.config, sb.base.clone(), &sb.logger);

        let request = InstallRequest::new(Some("6.2".into()), Some("../evil".into()));
        assert!(matches!(
            installer.install(&request).await,
            Err(InstallError::InvalidFolderName { .. })
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn unknown_version_downloads_nothing() {
        let sb = sandbox();
        let transport = FakeTransport::default();
        let installer = Installer::new(&transport, &sb.config, sb.base.clone(), &sb.logger);

        let request = InstallRequest::new(Some("9.9".into()), Some("site1".into()));
        assert!(matches!(
            installer.install(&request).await,
            Err(InstallError::VersionNotFound { .. })
        ));
        assert_eq!(
            transport.requests(),
            vec!["HEAD https://wordpress.org/wordpress-9.9.zip".to_string()]
        );
        assert!(!sb.base.join("site1").exists());
    }

    #[tokio::test]
    async fn temp_archive_removed_when_extraction_fails() {
        let sb = sandbox();
        let transport = FakeTransport::default()
            .with_present(ARCHIVE_62)
            .with_body(ARCHIVE_62, b"not a zip archive".to_vec());
        let installer = Installer::new(&transport, &sb.config, sb.base.clone(), &sb.logger);

        let request = InstallRequest::new(Some("6.2".into()), Some("site1".into()));
        assert!(matches!(
            installer.install(&request).await,
            Err(InstallError::ArchiveOpenFailed { .. })
        ));
        assert_eq!(fs::read_dir(&sb.temp).unwrap().count(), 0);
        assert!(!sb.base.join("site1").exists());
    }

    mod http_backend {
        use super::*;
        use crate::transport::HttpTransport;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        #[tokio::test]
        async fn end_to_end_against_stub_server() {
            let server = MockServer::start().await;
            Mock::given(method("HEAD"))
                .and(path("/release/wordpress-6.2.zip"))
                .respond_with(ResponseTemplate::new(200))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/release/wordpress-6.2.zip"))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(sample_release()))
                .expect(1)
                .mount(&server)
                .await;

            let mut sb = sandbox();
            sb.config.source.download_base = format!("{}/release", server.uri());
            sb.config.source.api_url = format!("{}/core/version-check/1.7/", server.uri());
            let transport = HttpTransport::new(&sb.config.http).unwrap();
            let installer = Installer::new(&transport, &sb.config, sb.base.clone(), &sb.logger);

            let request = InstallRequest::from_tokens(["v=6.2", "site1"]);
            let result = installer.install(&request).await.unwrap();

            assert_eq!(
                fs::read_to_string(result.destination.join("wp-admin/admin.php")).unwrap(),
                "<?php // admin"
            );
            assert!(!result.destination.join("wordpress").exists());
            assert_eq!(fs::read_dir(&sb.temp).unwrap().count(), 0);
        }

        #[tokio::test]
        async fn latest_lookup_failure_is_reported() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/core/version-check/1.7/"))
                .respond_with(ResponseTemplate::new(503))
                .mount(&server)
                .await;

            let mut sb = sandbox();
            sb.config.source.api_url = format!("{}/core/version-check/1.7/", server.uri());
            let transport = HttpTransport::new(&sb.config.http).unwrap();
            let installer = Installer::new(&transport, &sb.config, sb.base.clone(), &sb.logger);

            let err = installer
                .install(&InstallRequest::default())
                .await
                .unwrap_err();
            assert!(matches!(err, InstallError::MetadataFetchFailed { .. }));
            assert_eq!(fs::read_dir(&sb.base).unwrap().count(), 0);
        }
    }
}
