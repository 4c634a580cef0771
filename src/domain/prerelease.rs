//! Pre-release tracks and ordinals
//!
//! A pre-release suffix is modelled as a track identifier (alpha, beta, rc, or
//! custom) plus a numeric ordinal, e.g. `beta.2`.
//! According to semver.org: https://semver.org/#spec-item-9

use crate::error::{BumpError, Result};
use std::fmt;
use std::str::FromStr;

/// Identifier used when the operator does not pick a track.
pub const DEFAULT_IDENTIFIER: &str = "0";

/// Sentinel meaning "no explicit identifier".
pub const STANDARD: &str = "standard";

/// Pre-release identifier type (alpha, beta, rc, or custom)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreReleaseType {
    /// Alpha pre-release
    Alpha,
    /// Beta pre-release
    Beta,
    /// Release candidate
    ReleaseCandidate,
    /// Custom pre-release identifier
    Custom(String),
}

impl PreReleaseType {
    /// Parse a pre-release type from a string
    ///
    /// Accepts "alpha", "beta", "rc", or any dot-separated sequence of
    /// non-empty alphanumeric-hyphen components. Numeric components may not
    /// have leading zeros.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// Resolve an optional identifier argument.
    ///
    /// `None` and the `standard` sentinel both mean "use the default".
    pub fn from_argument(identifier: Option<&str>) -> Result<Option<Self>> {
        match identifier {
            None => Ok(None),
            Some(id) if id == STANDARD => Ok(None),
            Some(id) => Ok(Some(id.parse()?)),
        }
    }

    /// The engine default track
    pub fn default_track() -> Self {
        PreReleaseType::Custom(DEFAULT_IDENTIFIER.to_string())
    }
}

impl FromStr for PreReleaseType {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "alpha" => Ok(PreReleaseType::Alpha),
            "beta" => Ok(PreReleaseType::Beta),
            "rc" => Ok(PreReleaseType::ReleaseCandidate),
            other => {
                let valid = !other.is_empty()
                    && other.split('.').all(|part| {
                        !part.is_empty()
                            && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                            && !is_leading_zero_number(part)
                    });
                if valid {
                    Ok(PreReleaseType::Custom(other.to_string()))
                } else {
                    Err(BumpError::version(format!(
                        "Invalid pre-release identifier: '{}'",
                        s
                    )))
                }
            }
        }
    }
}

/// Numeric components must not have leading zeros
fn is_leading_zero_number(part: &str) -> bool {
    part.len() > 1 && part.starts_with('0') && part.chars().all(|c| c.is_ascii_digit())
}

impl fmt::Display for PreReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreReleaseType::Alpha => write!(f, "alpha"),
            PreReleaseType::Beta => write!(f, "beta"),
            PreReleaseType::ReleaseCandidate => write!(f, "rc"),
            PreReleaseType::Custom(s) => write!(f, "{}", s),
        }
    }
}

/// Pre-release suffix: a track plus its ordinal
///
/// Versions produced by verbump always carry both parts. A manifest may
/// hold other shapes, which are kept as written so the version prints back
/// unchanged.
///
/// # Examples
/// - "beta.1" -> identifier: Some(Beta), ordinal: Some(1)
/// - "rc.3" -> identifier: Some(ReleaseCandidate), ordinal: Some(3)
/// - "alpha" -> identifier: Some(Alpha), ordinal: None
/// - "3" -> identifier: None, ordinal: Some(3)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreRelease {
    pub identifier: Option<PreReleaseType>,
    pub ordinal: Option<u64>,
}

impl PreRelease {
    pub fn new(identifier: PreReleaseType, ordinal: u64) -> Self {
        PreRelease {
            identifier: Some(identifier),
            ordinal: Some(ordinal),
        }
    }

    /// First pre-release of a track
    pub fn start(identifier: PreReleaseType) -> Self {
        PreRelease::new(identifier, 1)
    }

    /// Parse the text after the `-` of a version.
    ///
    /// A bare number is an ordinal on its own. Otherwise the last component
    /// is the ordinal when it is numeric and something precedes it, and the
    /// whole text is the identifier when it is not.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(BumpError::version("Empty pre-release identifier"));
        }

        if let Ok(ordinal) = s.parse::<u64>() {
            return Ok(PreRelease {
                identifier: None,
                ordinal: Some(ordinal),
            });
        }

        if let Some((identifier, tail)) = s.rsplit_once('.') {
            if let Ok(ordinal) = tail.parse::<u64>() {
                return Ok(PreRelease::new(identifier.parse()?, ordinal));
            }
        }

        Ok(PreRelease {
            identifier: Some(s.parse()?),
            ordinal: None,
        })
    }

    /// Whether this suffix is on the given track
    pub fn is_track(&self, track: &PreReleaseType) -> bool {
        self.identifier.as_ref() == Some(track)
    }

    /// Same track, next ordinal. A suffix without an ordinal counts as 0.
    pub fn next(&self) -> Result<Self> {
        let ordinal = self
            .ordinal
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| BumpError::version(format!("Pre-release ordinal of '{}' overflows", self)))?;

        Ok(PreRelease {
            identifier: self.identifier.clone(),
            ordinal: Some(ordinal),
        })
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.identifier, self.ordinal) {
            (Some(identifier), Some(ordinal)) => write!(f, "{}.{}", identifier, ordinal),
            (Some(identifier), None) => write!(f, "{}", identifier),
            (None, Some(ordinal)) => write!(f, "{}", ordinal),
            (None, None) => Ok(()),
        }
    }
}
