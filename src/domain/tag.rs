use crate::error::{BumpError, Result};
use regex::Regex;

const VERSION_PATTERN: &str = r"\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?";

/// Represents a git release tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }

    /// Fully-qualified reference, as listed by a remote
    pub fn reference(&self) -> String {
        format!("refs/tags/{}", self.name)
    }
}

/// Release tag naming: a fixed prefix followed by the version text
/// (e.g., "v" + "1.2.3" -> "v1.2.3").
#[derive(Debug, Clone)]
pub struct TagPattern {
    pub prefix: String,
    regex: Regex,
}

impl TagPattern {
    /// Create a new tag pattern, compiling its matcher once
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        let pattern = format!("^{}{}$", regex::escape(&prefix), VERSION_PATTERN);
        let regex = Regex::new(&pattern)
            .map_err(|e| BumpError::config(format!("Invalid tag prefix '{}': {}", prefix, e)))?;
        Ok(TagPattern { prefix, regex })
    }

    /// Build and validate the tag for a version string
    pub fn tag_for(&self, version: &str) -> Result<Tag> {
        let name = format!("{}{}", self.prefix, version);
        if self.matches(&name) {
            Ok(Tag::new(name))
        } else {
            Err(BumpError::version(format!(
                "'{}' is not a valid release tag for prefix '{}'",
                name, self.prefix
            )))
        }
    }

    /// Check whether a tag name is a release tag under this prefix
    pub fn matches(&self, tag: &str) -> bool {
        self.regex.is_match(tag)
    }
}
