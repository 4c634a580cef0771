use std::fmt;

/// Non-fatal conditions met while reconciling a release tag with the
/// local and remote tag sets. These are reported to the operator, who then
/// decides how to continue.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The tag is already present in the local repository
    TagExistsLocally { tag: String },
    /// The tag is already present on the remote
    TagExistsRemotely { tag: String, remote: String },
    /// The remote tag list could not be fetched
    RemoteQueryFailed { remote: String, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::TagExistsLocally { tag } => {
                write!(f, "Tag '{}' already exists locally", tag)
            }
            BoundaryWarning::TagExistsRemotely { tag, remote } => {
                write!(f, "Tag '{}' already exists on remote '{}'", tag, remote)
            }
            BoundaryWarning::RemoteQueryFailed { remote, reason } => {
                write!(
                    f,
                    "Failed to check tags on remote '{}' ({}), pushing anyway",
                    remote, reason
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_query_failed_mentions_fallback() {
        let warning = BoundaryWarning::RemoteQueryFailed {
            remote: "origin".to_string(),
            reason: "timed out".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("origin"));
        assert!(msg.contains("timed out"));
        assert!(msg.contains("pushing anyway"));
    }

    #[test]
    fn test_tag_exists_remotely_display() {
        let warning = BoundaryWarning::TagExistsRemotely {
            tag: "v1.2.3".to_string(),
            remote: "origin".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "Tag 'v1.2.3' already exists on remote 'origin'"
        );
    }
}
