/*============================================================
  Synavera Project: WP-Install
  Module: wpinstall_core::version
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Parse and normalize operator-supplied release versions
    into the canonical form used in download URLs and folder
    names.

  Security / Safety Notes:
    Pure data handling; accepts digits and dots only, so a
    version can never inject path or URL syntax.

  Dependencies:
    None beyond std.

  Operational Scope:
    Consumed by the resolver for both explicit version specs
    and the upstream "latest" offer.

  Revision History:
    2026-10-19 COD  Introduced Version normalization.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Clear data contracts between modules
    - Deterministic rendering for reproducible URLs
============================================================*/

use std::fmt;
use std::str::FromStr;

use crate::error::{InstallError, Result};

/// A normalized release version.
///
/// A bare major always maps to its `.0` minor release; the patch component
/// is only rendered when the operator (or upstream) supplied one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    explicit_patch: bool,
}

impl Version {
    /// Normalize a version spec of one to three dot-separated integers.
    pub fn normalize(spec: &str) -> Result<Self> {
        let invalid = || InstallError::InvalidVersionFormat {
            spec: spec.to_string(),
        };

        let parts: Vec<&str> = spec.split('.').collect();
        if parts.len() > 3 {
            return Err(invalid());
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = part.parse::<u64>().map_err(|_| invalid())?;
        }

        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            explicit_patch: parts.len() == 3,
        })
    }
}

impl FromStr for Version {
    type Err = InstallError;

    fn from_str(s: &str) -> Result<Self> {
        Self::normalize(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.explicit_patch {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        } else {
            write!(f, "{}.{}", self.major, self.minor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_major_resolves_to_dot_zero() {
        let version = Version::normalize("6").unwrap();
        assert_eq!((version.major, version.minor, version.patch), (6, 0, 0));
        assert_eq!(version.to_string(), "6.0");
    }

    #[test]
    fn two_and_three_part_specs_render_as_given() {
        assert_eq!(Version::normalize("6.2").unwrap().to_string(), "6.2");
        assert_eq!(Version::normalize("6.2.1").unwrap().to_string(), "6.2.1");
        let full = Version::normalize("6.2.1").unwrap();
        assert_eq!((full.major, full.minor, full.patch), (6, 2, 1));
    }

    #[test]
    fn rejects_malformed_specs() {
        for spec in ["6.2.1.0", "abc", "", "6.", ".6", "6..1", "-1", "6.2a", " 6.2", "+6"] {
            match Version::normalize(spec) {
                Err(InstallError::InvalidVersionFormat { spec: reported }) => {
                    assert_eq!(reported, spec)
                }
                other => panic!("expected InvalidVersionFormat for `{spec}`, got {other:?}"),
            }
        }
    }

    #[test]
    fn parses_via_from_str() {
        let version: Version = "5.9".parse().unwrap();
        assert_eq!(version.to_string(), "5.9");
        assert_eq!(version.patch, 0);
    }
}
