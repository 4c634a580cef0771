use crate::error::{BumpError, Result};
use git2::{Direction, Repository as Git2Repo};
use log::debug;
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn push_refspecs(&self, remote_name: &str, refspecs: &[String]) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| BumpError::command(format!("No remote named '{}' found", remote_name)))?;

        let mut callbacks = remote_callbacks();
        // Rejections are reported per reference rather than as a push error
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        debug!("pushing {:?} to {}", refspecs, remote_name);
        remote
            .push(refspecs, Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    BumpError::command(format!("Network error during push: {}", e))
                } else {
                    BumpError::command(format!("Push to '{}' failed: {}", remote_name, e))
                }
            })
    }

    /// Annotated tags pointing at HEAD or one of its ancestors
    fn reachable_annotated_tags(&self) -> Result<Vec<String>> {
        let head = self.repo.head()?.peel_to_commit()?.id();
        let mut reachable = Vec::new();

        for name in self.repo.tag_names(None)?.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            if reference.peel_to_tag().is_err() {
                continue;
            }
            let target = reference.peel_to_commit()?.id();
            if target == head || self.repo.graph_descendant_of(head, target)? {
                reachable.push(name.to_string());
            }
        }

        Ok(reachable)
    }
}

/// Credential lookup for remote operations: SSH keys in ~/.ssh, then the
/// SSH agent, then git's default credential helpers.
fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        git2::Cred::default()
    });
    callbacks
}

impl super::Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn list_remote_tags(&self, remote_name: &str) -> Result<Vec<String>> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|e| BumpError::remote(format!("Cannot find remote '{}': {}", remote_name, e)))?;

        let connection = remote
            .connect_auth(Direction::Fetch, Some(remote_callbacks()), None)
            .map_err(|e| BumpError::remote(format!("Cannot connect to '{}': {}", remote_name, e)))?;

        let heads = connection
            .list()
            .map_err(|e| BumpError::remote(format!("Cannot list '{}': {}", remote_name, e)))?;

        Ok(super::tag_refs(heads.iter().map(|head| head.name())))
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| BumpError::command(format!("Cannot resolve HEAD: {}", e)))?;
        let tagger = self
            .repo
            .signature()
            .map_err(|e| BumpError::command(format!("No tagger identity configured: {}", e)))?;

        self.repo
            .tag(name, head.as_object(), &tagger, message, false)
            .map_err(|e| BumpError::command(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.repo
            .tag_delete(name)
            .map_err(|e| BumpError::command(format!("Cannot delete tag '{}': {}", name, e)))
    }

    fn push_tag(&self, remote: &str, name: &str, force: bool) -> Result<()> {
        let refspec = format!("refs/tags/{0}:refs/tags/{0}", name);
        let refspec = if force { format!("+{}", refspec) } else { refspec };
        self.push_refspecs(remote, &[refspec])
    }

    fn push_follow_tags(&self, remote: &str) -> Result<Vec<String>> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(BumpError::command(
                "HEAD is detached; check out a branch before pushing",
            ));
        }
        let branch = head
            .name()
            .ok_or_else(|| BumpError::command("Current branch name is not valid UTF-8"))?;

        let on_remote = super::Repository::list_remote_tags(self, remote)?;
        let tags: Vec<String> = self
            .reachable_annotated_tags()?
            .into_iter()
            .filter(|name| !on_remote.contains(&format!("refs/tags/{}", name)))
            .collect();

        let mut refspecs = vec![format!("{0}:{0}", branch)];
        refspecs.extend(tags.iter().map(|tag| format!("refs/tags/{0}:refs/tags/{0}", tag)));
        self.push_refspecs(remote, &refspecs)?;
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, Git2Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }

        fs::write(dir.path().join("package.json"), "{\"version\":\"1.0.0\"}").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("package.json")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = repo.signature().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();
        drop(tree);

        (dir, Git2Repository::from_git2(repo))
    }

    #[test]
    fn test_create_list_and_delete_annotated_tag() {
        let (dir, repo) = init_repo();

        repo.create_annotated_tag("v1.0.0", "Release version 1.0.0")
            .unwrap();
        assert_eq!(repo.list_tags().unwrap(), vec!["v1.0.0"]);

        let raw = Git2Repo::open(dir.path()).unwrap();
        let tag = raw
            .find_reference("refs/tags/v1.0.0")
            .unwrap()
            .peel_to_tag()
            .unwrap();
        assert_eq!(tag.message().map(str::trim_end), Some("Release version 1.0.0"));

        repo.delete_tag("v1.0.0").unwrap();
        assert!(repo.list_tags().unwrap().is_empty());
    }

    #[test]
    fn test_create_existing_tag_fails() {
        let (_dir, repo) = init_repo();
        repo.create_annotated_tag("v1.0.0", "first").unwrap();
        assert!(repo.create_annotated_tag("v1.0.0", "second").is_err());
    }

    #[test]
    fn test_missing_remote_is_remote_query_failure() {
        let (_dir, repo) = init_repo();
        let err = repo.list_remote_tags("origin").unwrap_err();
        assert!(matches!(err, BumpError::RemoteQuery(_)));
    }

    #[test]
    fn test_push_without_remote_fails() {
        let (_dir, repo) = init_repo();
        repo.create_annotated_tag("v1.0.0", "Release version 1.0.0")
            .unwrap();
        assert!(repo.push_tag("origin", "v1.0.0", false).is_err());
    }

    #[test]
    fn test_push_to_local_bare_remote() {
        let (dir, repo) = init_repo();
        let bare_dir = TempDir::new().unwrap();
        Git2Repo::init_bare(bare_dir.path()).unwrap();
        Git2Repo::open(dir.path())
            .unwrap()
            .remote("origin", bare_dir.path().to_str().unwrap())
            .unwrap();

        repo.create_annotated_tag("v1.0.0", "Release version 1.0.0")
            .unwrap();
        let raw = Git2Repo::open(dir.path()).unwrap();
        let head = raw.revparse_single("HEAD").unwrap();
        raw.tag_lightweight("scratch", &head, false).unwrap();

        assert_eq!(repo.push_follow_tags("origin").unwrap(), vec!["v1.0.0"]);
        assert_eq!(
            repo.list_remote_tags("origin").unwrap(),
            vec!["refs/tags/v1.0.0"]
        );

        // Already on the remote, so only the branch goes out
        assert!(repo.push_follow_tags("origin").unwrap().is_empty());
    }

    #[test]
    fn test_force_push_replaces_remote_tag() {
        let (dir, repo) = init_repo();
        let bare_dir = TempDir::new().unwrap();
        let bare = Git2Repo::init_bare(bare_dir.path()).unwrap();
        Git2Repo::open(dir.path())
            .unwrap()
            .remote("origin", bare_dir.path().to_str().unwrap())
            .unwrap();

        repo.create_annotated_tag("v1.0.0", "first cut").unwrap();
        repo.push_tag("origin", "v1.0.0", false).unwrap();

        repo.delete_tag("v1.0.0").unwrap();
        repo.create_annotated_tag("v1.0.0", "second cut").unwrap();
        repo.push_tag("origin", "v1.0.0", true).unwrap();

        let tag = bare
            .find_reference("refs/tags/v1.0.0")
            .unwrap()
            .peel_to_tag()
            .unwrap();
        assert_eq!(tag.message().map(str::trim_end), Some("second cut"));
    }
}
