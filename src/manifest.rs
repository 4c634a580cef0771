//! Reading the version field of a `package.json` manifest

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::Version;
use crate::error::{BumpError, Result};

/// The only part of the manifest verbump looks at
#[derive(Debug, Deserialize)]
struct PackageManifest {
    version: Option<serde_json::Value>,
}

/// Location of the project manifest, passed explicitly rather than read
/// from the process working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ManifestSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the package manager must run in
    pub fn project_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    /// Read the raw `version` string
    ///
    /// # Returns
    /// * `Ok(String)` - The version text exactly as written
    /// * `Err(BumpError::ManifestUnreadable)` - If the file is missing, is not
    ///   JSON, or has no string `version` field
    pub fn read_version(&self) -> Result<String> {
        let shown = self.path.display().to_string();
        let text = fs::read_to_string(&self.path)
            .map_err(|e| BumpError::manifest(&shown, e.to_string()))?;
        let manifest: PackageManifest = serde_json::from_str(&text)
            .map_err(|e| BumpError::manifest(&shown, format!("invalid JSON: {}", e)))?;

        match manifest.version {
            Some(serde_json::Value::String(version)) => Ok(version),
            Some(other) => Err(BumpError::manifest(
                &shown,
                format!("\"version\" must be a string, found {}", other),
            )),
            None => Err(BumpError::manifest(&shown, "no \"version\" field")),
        }
    }

    /// Read the version text and parse it
    ///
    /// # Returns
    /// * `Ok((raw, version))` - The text as written and its parsed form
    /// * `Err` - `ManifestUnreadable` or `InvalidVersion`, both fatal
    pub fn read_current(&self) -> Result<(String, Version)> {
        let raw = self.read_version()?;
        let version = Version::parse(&raw)?;
        Ok((raw, version))
    }
}
