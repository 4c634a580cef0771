use crate::domain::prerelease::{PreRelease, PreReleaseType};
use crate::error::{BumpError, Result};
use std::fmt;

/// Semantic version representation
///
/// Build metadata is accepted by [`Version::parse`] but never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<PreRelease>,
}

impl Version {
    /// Create a new release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: None,
        }
    }

    /// Same triple with the given pre-release suffix
    pub fn with_pre(&self, pre: PreRelease) -> Self {
        Version {
            pre: Some(pre),
            ..self.release()
        }
    }

    /// Same triple without any pre-release suffix
    pub fn release(&self) -> Self {
        Version::new(self.major, self.minor, self.patch)
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }

    /// Parse a manifest version field (e.g., "1.2.3-beta.1+build.5")
    pub fn parse(text: &str) -> Result<Self> {
        let parsed = semver::Version::parse(text)
            .map_err(|e| BumpError::version(format!("'{}' is not a semantic version: {}", text, e)))?;

        let pre = if parsed.pre.is_empty() {
            None
        } else {
            Some(PreRelease::parse(parsed.pre.as_str())?)
        };

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            pre,
        })
    }

    /// Compute the successor of this version for a bump kind.
    ///
    /// `identifier` selects the pre-release track for the pre* kinds; `None`
    /// or `Some("standard")` keeps the current track (prerelease) or falls
    /// back to the default one.
    pub fn increment(&self, kind: &BumpKind, identifier: Option<&str>) -> Result<Self> {
        let explicit = PreReleaseType::from_argument(identifier)?;
        let track = || {
            explicit
                .clone()
                .unwrap_or_else(PreReleaseType::default_track)
        };

        let next = match kind {
            BumpKind::Patch => {
                if self.is_prerelease() {
                    self.release()
                } else {
                    self.next_patch()?
                }
            }
            BumpKind::Minor => {
                if self.is_prerelease() && self.patch == 0 {
                    self.release()
                } else {
                    self.next_minor()?
                }
            }
            BumpKind::Major => {
                if self.is_prerelease() && self.minor == 0 && self.patch == 0 {
                    self.release()
                } else {
                    self.next_major()?
                }
            }
            BumpKind::Prepatch => self.next_patch()?.with_pre(PreRelease::start(track())),
            BumpKind::Preminor => self.next_minor()?.with_pre(PreRelease::start(track())),
            BumpKind::Premajor => self.next_major()?.with_pre(PreRelease::start(track())),
            BumpKind::Prerelease => match (&self.pre, explicit.as_ref()) {
                (Some(pre), Some(id)) if !pre.is_track(id) => {
                    self.with_pre(PreRelease::start(id.clone()))
                }
                (Some(pre), _) => self.with_pre(pre.next()?),
                (None, _) => self.next_patch()?.with_pre(PreRelease::start(track())),
            },
            BumpKind::PrereleaseSame => self.with_pre(self.current_pre(kind)?.next()?),
            BumpKind::Finalize => {
                self.current_pre(kind)?;
                self.release()
            }
            BumpKind::SwitchTo(id) => {
                self.current_pre(kind)?;
                self.with_pre(PreRelease::start(id.clone()))
            }
        };

        Ok(next)
    }

    fn next_patch(&self) -> Result<Self> {
        Ok(Version::new(self.major, self.minor, self.component_plus_one(self.patch, "patch")?))
    }

    fn next_minor(&self) -> Result<Self> {
        Ok(Version::new(self.major, self.component_plus_one(self.minor, "minor")?, 0))
    }

    fn next_major(&self) -> Result<Self> {
        Ok(Version::new(self.component_plus_one(self.major, "major")?, 0, 0))
    }

    fn component_plus_one(&self, value: u64, name: &str) -> Result<u64> {
        value.checked_add(1).ok_or_else(|| {
            BumpError::version(format!("The {} component of {} cannot be incremented", name, self))
        })
    }

    fn current_pre(&self, kind: &BumpKind) -> Result<&PreRelease> {
        self.pre.as_ref().ok_or_else(|| {
            BumpError::version(format!(
                "'{}' needs a pre-release version, got {}",
                kind, self
            ))
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// Transition selector for [`Version::increment`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BumpKind {
    Patch,
    Minor,
    Major,
    Prepatch,
    Preminor,
    Premajor,
    Prerelease,
    /// Next ordinal on the current pre-release track
    PrereleaseSame,
    /// Drop the pre-release suffix without bumping the triple
    Finalize,
    /// Restart the current triple on another track at ordinal 1
    SwitchTo(PreReleaseType),
}

impl BumpKind {
    /// Kinds offered for every version, in menu order
    pub const RELEASE: [BumpKind; 3] = [BumpKind::Patch, BumpKind::Minor, BumpKind::Major];
    pub const PRE: [BumpKind; 4] = [
        BumpKind::Prepatch,
        BumpKind::Preminor,
        BumpKind::Premajor,
        BumpKind::Prerelease,
    ];

    /// True for the pre* kinds that take an identifier follow-up
    pub fn is_vanilla_prerelease(&self) -> bool {
        matches!(
            self,
            BumpKind::Prepatch | BumpKind::Preminor | BumpKind::Premajor | BumpKind::Prerelease
        )
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpKind::Patch => write!(f, "patch"),
            BumpKind::Minor => write!(f, "minor"),
            BumpKind::Major => write!(f, "major"),
            BumpKind::Prepatch => write!(f, "prepatch"),
            BumpKind::Preminor => write!(f, "preminor"),
            BumpKind::Premajor => write!(f, "premajor"),
            BumpKind::Prerelease => write!(f, "prerelease"),
            BumpKind::PrereleaseSame => write!(f, "prerelease-same"),
            BumpKind::Finalize => write!(f, "finalize"),
            BumpKind::SwitchTo(id) => write!(f, "switch to {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Version {
        Version::parse(text).unwrap()
    }

    fn bump(text: &str, kind: BumpKind) -> String {
        v(text).increment(&kind, None).unwrap().to_string()
    }

    #[test]
    fn test_version_parse() {
        let parsed = v("1.2.3");
        assert_eq!(parsed, Version::new(1, 2, 3));
        assert!(!parsed.is_prerelease());
    }

    #[test]
    fn test_version_parse_prerelease() {
        let parsed = v("1.2.3-beta.4");
        assert_eq!(
            parsed.pre,
            Some(PreRelease::new(PreReleaseType::Beta, 4))
        );
    }

    #[test]
    fn test_version_parse_ignores_build_metadata() {
        assert_eq!(v("1.2.3+sha.abc"), Version::new(1, 2, 3));
        assert_eq!(v("1.2.3-rc.1+20240101").to_string(), "1.2.3-rc.1");
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse("1.2").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
        assert!(Version::parse("v1.2.3").is_err());
        assert!(Version::parse("01.2.3").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn test_version_display_round_trip() {
        for text in ["1.0.0-alpha", "1.0.0-0", "1.0.0-3", "1.2.3-beta.4", "1.2.4-0.1", "2.0.0"] {
            assert_eq!(v(text).to_string(), text);
        }
    }

    #[test]
    fn test_bare_numeric_prerelease_increments_in_place() {
        assert_eq!(bump("1.0.0-0", BumpKind::Prerelease), "1.0.0-1");
        assert_eq!(bump("1.0.0-3", BumpKind::PrereleaseSame), "1.0.0-4");
        assert_eq!(
            bump("1.0.0-3", BumpKind::SwitchTo(PreReleaseType::Beta)),
            "1.0.0-beta.1"
        );
    }

    #[test]
    fn test_increment_overflow_is_an_error() {
        let max = u64::MAX;
        let huge = v(&format!("{}.{}.{}", max, max, max));
        for kind in BumpKind::RELEASE.iter().chain(BumpKind::PRE.iter()) {
            assert!(
                matches!(huge.increment(kind, None), Err(BumpError::InvalidVersion(_))),
                "{} should fail on {}",
                kind,
                huge
            );
        }

        let ordinal = v(&format!("1.0.0-beta.{}", max));
        assert!(ordinal.increment(&BumpKind::PrereleaseSame, None).is_err());
        assert!(ordinal.increment(&BumpKind::Prerelease, None).is_err());
        assert_eq!(
            ordinal.increment(&BumpKind::Finalize, None).unwrap().to_string(),
            "1.0.0"
        );
    }

    #[test]
    fn test_release_bumps_on_plain_version() {
        assert_eq!(bump("1.2.3", BumpKind::Patch), "1.2.4");
        assert_eq!(bump("1.2.3", BumpKind::Minor), "1.3.0");
        assert_eq!(bump("1.2.3", BumpKind::Major), "2.0.0");
        assert_eq!(bump("0.0.0", BumpKind::Patch), "0.0.1");
    }

    #[test]
    fn test_release_bumps_on_prerelease() {
        assert_eq!(bump("1.2.3-beta.1", BumpKind::Patch), "1.2.3");
        assert_eq!(bump("1.2.0-beta.1", BumpKind::Minor), "1.2.0");
        assert_eq!(bump("1.2.3-beta.1", BumpKind::Minor), "1.3.0");
        assert_eq!(bump("2.0.0-rc.2", BumpKind::Major), "2.0.0");
        assert_eq!(bump("2.1.0-rc.2", BumpKind::Major), "3.0.0");
    }

    #[test]
    fn test_pre_bumps_use_default_track() {
        assert_eq!(bump("1.2.3", BumpKind::Prepatch), "1.2.4-0.1");
        assert_eq!(bump("1.2.3", BumpKind::Preminor), "1.3.0-0.1");
        assert_eq!(bump("1.2.3", BumpKind::Premajor), "2.0.0-0.1");
        assert_eq!(bump("1.2.3", BumpKind::Prerelease), "1.2.4-0.1");
    }

    #[test]
    fn test_pre_bumps_with_identifier() {
        let base = v("1.2.3");
        let next = base.increment(&BumpKind::Preminor, Some("alpha")).unwrap();
        assert_eq!(next.to_string(), "1.3.0-alpha.1");

        let standard = base.increment(&BumpKind::Preminor, Some("standard")).unwrap();
        assert_eq!(standard, base.increment(&BumpKind::Preminor, None).unwrap());
    }

    #[test]
    fn test_prepatch_on_prerelease_bumps_triple() {
        assert_eq!(bump("1.2.3-beta.1", BumpKind::Prepatch), "1.2.4-0.1");
    }

    #[test]
    fn test_prerelease_continues_track() {
        assert_eq!(bump("1.2.3-beta.1", BumpKind::Prerelease), "1.2.3-beta.2");
        assert_eq!(bump("1.0.0-alpha", BumpKind::Prerelease), "1.0.0-alpha.1");
    }

    #[test]
    fn test_prerelease_with_other_identifier_resets_ordinal() {
        let next = v("1.2.3-beta.5")
            .increment(&BumpKind::Prerelease, Some("rc"))
            .unwrap();
        assert_eq!(next.to_string(), "1.2.3-rc.1");

        let same = v("1.2.3-beta.5")
            .increment(&BumpKind::Prerelease, Some("beta"))
            .unwrap();
        assert_eq!(same.to_string(), "1.2.3-beta.6");
    }

    #[test]
    fn test_prerelease_same_finalize_and_switch() {
        assert_eq!(bump("1.0.0-alpha.3", BumpKind::PrereleaseSame), "1.0.0-alpha.4");
        assert_eq!(bump("1.0.0-rc.1", BumpKind::Finalize), "1.0.0");
        assert_eq!(
            bump("1.2.3-alpha.7", BumpKind::SwitchTo(PreReleaseType::Beta)),
            "1.2.3-beta.1"
        );
    }

    #[test]
    fn test_prerelease_only_kinds_reject_plain_version() {
        let plain = v("1.2.3");
        assert!(plain.increment(&BumpKind::PrereleaseSame, None).is_err());
        assert!(plain.increment(&BumpKind::Finalize, None).is_err());
        assert!(plain
            .increment(&BumpKind::SwitchTo(PreReleaseType::Alpha), None)
            .is_err());
    }

    #[test]
    fn test_invalid_identifier_argument() {
        assert!(v("1.2.3")
            .increment(&BumpKind::Prepatch, Some("bad id"))
            .is_err());
    }

    #[test]
    fn test_increment_does_not_mutate() {
        let base = v("1.2.3-beta.1");
        let _ = base.increment(&BumpKind::Major, None).unwrap();
        assert_eq!(base.to_string(), "1.2.3-beta.1");
    }

    #[test]
    fn test_bump_kind_display() {
        assert_eq!(BumpKind::PrereleaseSame.to_string(), "prerelease-same");
        assert_eq!(
            BumpKind::SwitchTo(PreReleaseType::ReleaseCandidate).to_string(),
            "switch to rc"
        );
        assert!(BumpKind::Prerelease.is_vanilla_prerelease());
        assert!(!BumpKind::Finalize.is_vanilla_prerelease());
    }
}
