use crate::error::{BumpError, Result};
use crate::git::Repository;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

/// A push the mock received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRecord {
    pub remote: String,
    pub refspecs: Vec<String>,
}

/// Mock repository for testing without actual git operations
///
/// Local tags map to their messages; the remote is a set of tag names.
#[derive(Default)]
pub struct MockRepository {
    local_tags: RefCell<BTreeMap<String, String>>,
    remote_tags: RefCell<BTreeSet<String>>,
    remote_unreachable: bool,
    failing: BTreeSet<&'static str>,
    pushes: RefCell<Vec<PushRecord>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a local tag
    pub fn with_local_tag(self, name: impl Into<String>) -> Self {
        self.local_tags
            .borrow_mut()
            .insert(name.into(), "existing tag".to_string());
        self
    }

    /// Add a tag on the remote
    pub fn with_remote_tag(self, name: impl Into<String>) -> Self {
        self.remote_tags.borrow_mut().insert(name.into());
        self
    }

    /// Make remote listing fail
    pub fn with_unreachable_remote(mut self) -> Self {
        self.remote_unreachable = true;
        self
    }

    /// Make an operation fail: "create", "delete", "push", "push_branch"
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    pub fn local_tags(&self) -> Vec<String> {
        self.local_tags.borrow().keys().cloned().collect()
    }

    pub fn local_tag_message(&self, name: &str) -> Option<String> {
        self.local_tags.borrow().get(name).cloned()
    }

    pub fn remote_tags(&self) -> Vec<String> {
        self.remote_tags.borrow().iter().cloned().collect()
    }

    pub fn pushes(&self) -> Vec<PushRecord> {
        self.pushes.borrow().clone()
    }

    fn check(&self, operation: &str) -> Result<()> {
        if self.failing.contains(operation) {
            Err(BumpError::command(format!("mock {} failure", operation)))
        } else {
            Ok(())
        }
    }

    fn record_push(&self, remote: &str, refspecs: Vec<String>) {
        self.pushes.borrow_mut().push(PushRecord {
            remote: remote.to_string(),
            refspecs,
        });
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.local_tags())
    }

    fn list_remote_tags(&self, remote: &str) -> Result<Vec<String>> {
        if self.remote_unreachable {
            return Err(BumpError::remote(format!("cannot reach '{}'", remote)));
        }
        Ok(self
            .remote_tags
            .borrow()
            .iter()
            .map(|name| format!("refs/tags/{}", name))
            .collect())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        self.check("create")?;
        let mut tags = self.local_tags.borrow_mut();
        if tags.contains_key(name) {
            return Err(BumpError::command(format!("tag '{}' already exists", name)));
        }
        tags.insert(name.to_string(), message.to_string());
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.check("delete")?;
        match self.local_tags.borrow_mut().remove(name) {
            Some(_) => Ok(()),
            None => Err(BumpError::command(format!("tag '{}' not found", name))),
        }
    }

    fn push_tag(&self, remote: &str, name: &str, force: bool) -> Result<()> {
        self.check("push")?;
        if !self.local_tags.borrow().contains_key(name) {
            return Err(BumpError::command(format!("src refspec {} does not match any", name)));
        }
        if !force && self.remote_tags.borrow().contains(name) {
            return Err(BumpError::command(format!("remote rejected refs/tags/{}: already exists", name)));
        }

        let prefix = if force { "+" } else { "" };
        self.record_push(remote, vec![format!("{}refs/tags/{1}:refs/tags/{1}", prefix, name)]);
        self.remote_tags.borrow_mut().insert(name.to_string());
        Ok(())
    }

    fn push_follow_tags(&self, remote: &str) -> Result<Vec<String>> {
        self.check("push_branch")?;
        if self.remote_unreachable {
            return Err(BumpError::command(format!("cannot reach '{}'", remote)));
        }

        // Every local tag counts as annotated and reachable
        let tags: Vec<String> = {
            let on_remote = self.remote_tags.borrow();
            self.local_tags()
                .into_iter()
                .filter(|tag| !on_remote.contains(tag))
                .collect()
        };

        let mut refspecs = vec!["refs/heads/main:refs/heads/main".to_string()];
        refspecs.extend(tags.iter().map(|tag| format!("refs/tags/{0}:refs/tags/{0}", tag)));
        self.record_push(remote, refspecs);
        self.remote_tags.borrow_mut().extend(tags.iter().cloned());
        Ok(tags)
    }
}
