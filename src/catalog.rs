//! Transition catalog
//!
//! Enumerates every legal next version for the current manifest version as
//! an ordered menu. Construction is pure so the menu can be checked without
//! any prompt.

use crate::domain::prerelease::STANDARD;
use crate::domain::{BumpKind, PreReleaseType, Version};
use crate::error::Result;

pub const PRERELEASE_SEPARATOR: &str = "--- Pre-release ---";
pub const CURRENT_TRACK_SEPARATOR: &str = "--- Current pre-release ---";

/// One selectable transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub label: String,
    pub kind: BumpKind,
    pub version: Version,
}

impl Candidate {
    fn new(current: &Version, kind: BumpKind, version: Version) -> Self {
        let label = transition_label(&kind.to_string(), current, &version);
        Candidate {
            label,
            kind,
            version,
        }
    }
}

/// A menu row: either a candidate or a non-selectable heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    Candidate(Candidate),
    Separator(String),
}

impl CatalogEntry {
    pub fn label(&self) -> &str {
        match self {
            CatalogEntry::Candidate(c) => &c.label,
            CatalogEntry::Separator(s) => s,
        }
    }
}

/// Ordered set of next-version choices for one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    current: Version,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build the catalog with the standard alpha/beta/rc tracks
    pub fn build(current: &Version) -> Result<Self> {
        Self::build_with_tracks(current, &default_tracks())
    }

    /// Build the catalog, offering `tracks` as switch targets
    pub fn build_with_tracks(current: &Version, tracks: &[PreReleaseType]) -> Result<Self> {
        let mut entries = Vec::new();

        for kind in BumpKind::RELEASE {
            entries.push(candidate(current, kind)?);
        }

        entries.push(CatalogEntry::Separator(PRERELEASE_SEPARATOR.to_string()));
        for kind in BumpKind::PRE {
            entries.push(candidate(current, kind)?);
        }

        if let Some(pre) = &current.pre {
            entries.push(CatalogEntry::Separator(CURRENT_TRACK_SEPARATOR.to_string()));
            entries.push(candidate(current, BumpKind::PrereleaseSame)?);
            entries.push(candidate(current, BumpKind::Finalize)?);

            for track in tracks.iter().filter(|t| !pre.is_track(t)) {
                entries.push(candidate(current, BumpKind::SwitchTo(track.clone()))?);
            }
        }

        Ok(Catalog {
            current: current.clone(),
            entries,
        })
    }

    pub fn current(&self) -> &Version {
        &self.current
    }

    /// All rows, separators included, in display order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Selectable rows only
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter().filter_map(|entry| match entry {
            CatalogEntry::Candidate(c) => Some(c),
            CatalogEntry::Separator(_) => None,
        })
    }

    /// Candidate for a kind, if offered
    pub fn find(&self, kind: &BumpKind) -> Option<&Candidate> {
        self.candidates().find(|c| c.kind == *kind)
    }
}

fn candidate(current: &Version, kind: BumpKind) -> Result<CatalogEntry> {
    let next = current.increment(&kind, None)?;
    Ok(CatalogEntry::Candidate(Candidate::new(current, kind, next)))
}

fn transition_label(name: &str, from: &Version, to: &Version) -> String {
    format!("{} ({} → {})", name, from, to)
}

/// The alpha/beta/rc tracks
pub fn default_tracks() -> Vec<PreReleaseType> {
    vec![
        PreReleaseType::Alpha,
        PreReleaseType::Beta,
        PreReleaseType::ReleaseCandidate,
    ]
}

/// Follow-up choice for the identifier of a pre* bump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierChoice {
    pub label: String,
    /// `None` for "standard"
    pub identifier: Option<PreReleaseType>,
    pub version: Version,
}

/// Identifier menu for a vanilla pre-release kind: "standard" first, then
/// one row per track.
pub fn identifier_choices(
    current: &Version,
    kind: &BumpKind,
    tracks: &[PreReleaseType],
) -> Result<Vec<IdentifierChoice>> {
    let standard = current.increment(kind, None)?;
    let mut choices = vec![IdentifierChoice {
        label: transition_label(STANDARD, current, &standard),
        identifier: None,
        version: standard,
    }];

    for track in tracks {
        let name = track.to_string();
        let version = current.increment(kind, Some(&name))?;
        choices.push(IdentifierChoice {
            label: transition_label(&name, current, &version),
            identifier: Some(track.clone()),
            version,
        });
    }

    Ok(choices)
}
