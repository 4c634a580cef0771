//! Domain logic - pure version and tag rules independent of git operations

pub mod prerelease;
pub mod tag;
pub mod version;

pub use prerelease::{PreRelease, PreReleaseType};
pub use tag::{Tag, TagPattern};
pub use version::{BumpKind, Version};
