/*============================================================
  Synavera Project: WP-Install
  Module: wpinstall_core::main
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for WP-Install. Resolves a named or latest
    WordPress release, downloads it, and extracts it into an
    operator-chosen or auto-named folder.

  Security / Safety Notes:
    Operates within user privileges. Performs HTTPS GET/HEAD
    requests and writes only below the base directory.

  Dependencies:
    clap for CLI parsing, tokio runtime.

  Operational Scope:
    Invoked directly by operators for one-shot local installs.

  Revision History:
    2026-10-19 COD  Authored WP-Install runtime.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

mod config;
mod error;
mod extractor;
mod fetcher;
mod installer;
mod logger;
mod request;
mod resolver;
#[cfg(test)]
mod testing;
mod transport;
mod version;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};

use config::InstallerConfig;
use error::{InstallError, Result};
use installer::Installer;
use logger::Logger;
use request::{InstallRequest, InstallResult};
use transport::HttpTransport;

/// Command-line arguments for WP-Install.
#[derive(Debug, Parser)]
#[command(
    name = "WP-Install",
    version,
    author = "Synavera Systems",
    about = "One-shot WordPress release installer"
)]
struct Cli {
    /// Folder name and/or `v=<version>` (e.g. `mysite v=6.2`), in any order.
    /// Flags go before these; a folder name may start with `-`.
    #[arg(value_name = "ARG", allow_hyphen_values = true)]
    tokens: Vec<String>,
    /// Override configuration file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory the install folder is created in (defaults to the current directory).
    #[arg(long, value_name = "PATH")]
    dir: Option<PathBuf>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
    /// Enable verbose logging to stderr.
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("\n[WP-Install] Error: {err}");
            err.exit_code()
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print()?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => return Err(InstallError::Usage(err.to_string().trim_end().to_string())),
    };
    let config = InstallerConfig::load_from_optional_path(cli.config.as_deref())?;

    let session_stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let log_path = cli.log.clone().or_else(|| {
        config
            .install
            .log_dir
            .as_ref()
            .map(|dir| dir.join(format!("install_{session_stamp}.log")))
    });
    let logger = Logger::new(log_path, cli.verbose)?;
    logger.info("INIT", "WP-Install starting.");

    let base_dir = resolve_base_dir(cli.dir.as_deref())?;
    let request = InstallRequest::from_tokens(&cli.tokens);
    print_header();

    let transport = HttpTransport::new(&config.http)?;
    let installer = Installer::new(&transport, &config, base_dir, &logger);
    let outcome = installer.install(&request).await;
    let result = conclude(outcome, &logger)?;

    print_success(&result, &config.source.product);
    Ok(ExitCode::SUCCESS)
}

/// Seal the session log. The install outcome always wins over a digest
/// failure: a failed install reports its own error, and a successful one
/// only warns.
fn conclude(outcome: Result<InstallResult>, logger: &Logger) -> Result<InstallResult> {
    if let Err(err) = &outcome {
        logger.error(err.category().code(), err.to_string());
    }
    let finalized = logger.finalize();
    let result = outcome?;
    if let Err(err) = finalized {
        logger.warn("LOGGER", format!("Session digest not written: {err}"));
    }
    Ok(result)
}

fn resolve_base_dir(dir: Option<&std::path::Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|err| {
        InstallError::Filesystem(format!("Cannot determine current directory: {err}"))
    })?;
    Ok(match dir {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}

fn print_header() {
    println!("================================");
    println!(" WordPress Installation Tool");
    println!("================================\n");
}

fn print_success(result: &InstallResult, product: &str) {
    println!(
        "\n✅ Success! {product} {} installed at:\n{}",
        result.version,
        result.destination.display()
    );
}
