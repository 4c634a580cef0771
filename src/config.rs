use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{PreReleaseType, TagPattern};
use crate::error::{BumpError, Result};

/// Name of the project-level configuration file
pub const CONFIG_FILE: &str = "verbump.toml";

/// Represents the complete configuration for verbump.
///
/// Every section is optional; a missing file means all defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub package_manager: PackageManagerConfig,

    #[serde(default)]
    pub prerelease: PrereleaseConfig,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("package.json")
}

/// Where the project manifest lives.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            manifest: default_manifest(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_tag_message() -> String {
    "Release version {version}".to_string()
}

/// Tag naming and the remote tags are pushed to.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    /// `{version}` is replaced with the tagged version
    #[serde(default = "default_tag_message")]
    pub tag_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            tag_prefix: default_tag_prefix(),
            tag_message: default_tag_message(),
        }
    }
}

impl GitConfig {
    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.tag_prefix.clone())
    }

    pub fn message_for(&self, version: &str) -> String {
        self.tag_message.replace("{version}", version)
    }
}

fn default_program() -> String {
    "npm".to_string()
}

/// The package manager that owns the manifest write.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PackageManagerConfig {
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for PackageManagerConfig {
    fn default() -> Self {
        PackageManagerConfig {
            program: default_program(),
        }
    }
}

fn default_tracks() -> Vec<String> {
    vec!["alpha".to_string(), "beta".to_string(), "rc".to_string()]
}

/// Pre-release tracks offered in the menus.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PrereleaseConfig {
    #[serde(default = "default_tracks")]
    pub tracks: Vec<String>,
}

impl Default for PrereleaseConfig {
    fn default() -> Self {
        PrereleaseConfig {
            tracks: default_tracks(),
        }
    }
}

impl PrereleaseConfig {
    /// Parsed track identifiers
    pub fn parsed_tracks(&self) -> Result<Vec<PreReleaseType>> {
        self.tracks
            .iter()
            .map(|track| {
                track
                    .parse::<PreReleaseType>()
                    .map_err(|_| BumpError::config(format!("Invalid pre-release track '{}'", track)))
            })
            .collect()
    }
}

impl Config {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.git.remote.trim().is_empty() {
            return Err(BumpError::config("git.remote must not be empty"));
        }
        if self.package_manager.program.trim().is_empty() {
            return Err(BumpError::config("package_manager.program must not be empty"));
        }
        if self.prerelease.tracks.iter().any(|t| t == crate::domain::prerelease::STANDARD) {
            return Err(BumpError::config("'standard' is reserved and cannot be a track"));
        }
        let tracks = self.prerelease.parsed_tracks()?;
        for (i, track) in tracks.iter().enumerate() {
            if tracks[..i].contains(track) {
                return Err(BumpError::config(format!(
                    "Pre-release track '{}' is listed twice",
                    track
                )));
            }
        }
        self.git.tag_pattern()?;
        Ok(())
    }

    /// Manifest path resolved against a base directory
    pub fn manifest_path(&self, base: &Path) -> PathBuf {
        base.join(&self.project.manifest)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `verbump.toml` in `base_dir`
/// 3. `.verbump.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `base_dir` - Project directory searched for `verbump.toml`
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>, base_dir: &Path) -> Result<Config> {
    let project_file = base_dir.join(CONFIG_FILE);
    let user_file = dirs::config_dir().map(|dir| dir.join(format!(".{}", CONFIG_FILE)));

    let source = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if project_file.exists() {
        Some(project_file)
    } else {
        user_file.filter(|path| path.exists())
    };

    let config = match source {
        Some(path) => {
            let text = fs::read_to_string(&path).map_err(|e| {
                BumpError::config(format!("Cannot read {}: {}", path.display(), e))
            })?;
            toml::from_str::<Config>(&text)
                .map_err(|e| BumpError::config(format!("Cannot parse {}: {}", path.display(), e)))?
        }
        None => Config::default(),
    };

    config.validate()?;
    Ok(config)
}
