//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the handful of git
//! operations verbump needs: reading and writing release tags, and pushing
//! them to a remote.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! Code that drives tagging should depend on the [Repository] trait so the
//! decision logic can be exercised without a network.
//!
//! ```rust
//! # use verbump::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> verbump::Result<()> {
//! if !repo.list_tags()?.iter().any(|t| t == "v1.0.0") {
//!     repo.create_annotated_tag("v1.0.0", "Release version 1.0.0")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Common git operation trait for abstraction
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying failures to [crate::error::BumpError::Git],
/// [crate::error::BumpError::ExternalCommand] or, for remote listing,
/// [crate::error::BumpError::RemoteQuery].
pub trait Repository {
    /// Get all local tag names
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Tag names without the `refs/tags/` prefix
    /// * `Err` - If the tag list cannot be read
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Get the tag references advertised by a remote
    ///
    /// Returns fully-qualified names (e.g., "refs/tags/v1.2.3"). Peeled
    /// entries (`^{}`) are folded into their tag.
    ///
    /// # Arguments
    /// * `remote` - Name of the remote (e.g., "origin")
    fn list_remote_tags(&self, remote: &str) -> Result<Vec<String>>;

    /// Create an annotated tag on the current HEAD commit
    ///
    /// # Arguments
    /// * `name` - Name for the new tag
    /// * `message` - Tag message
    ///
    /// # Returns
    /// * `Ok(())` - Success
    /// * `Err` - If the tag already exists or HEAD cannot be resolved
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Delete a local tag
    fn delete_tag(&self, name: &str) -> Result<()>;

    /// Push a single tag to a remote
    ///
    /// # Arguments
    /// * `remote` - Name of the remote
    /// * `name` - Tag to push
    /// * `force` - Overwrite the remote tag if it exists
    fn push_tag(&self, remote: &str, name: &str, force: bool) -> Result<()>;

    /// Push the current branch together with every annotated tag reachable
    /// from it that the remote does not have yet, in one call
    /// (`git push --follow-tags`).
    ///
    /// # Arguments
    /// * `remote` - Name of the remote
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Names of the tags that were sent
    fn push_follow_tags(&self, remote: &str) -> Result<Vec<String>>;
}

/// Fold a remote reference listing into plain tag references
pub(crate) fn tag_refs<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut refs: Vec<String> = names
        .filter(|name| name.starts_with("refs/tags/"))
        .map(|name| name.trim_end_matches("^{}").to_string())
        .collect();
    refs.sort();
    refs.dedup();
    refs
}
