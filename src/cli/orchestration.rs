//! Main workflow orchestration logic
//!
//! One interactive run: read the manifest version, offer tag-only or a
//! version bump, then hand off to the tag reconciler or to the package
//! manager and the push step. Everything the run touches is passed in, so
//! the whole flow can be driven by mocks.

use log::{debug, info};

use crate::catalog::{identifier_choices, Catalog, CatalogEntry};
use crate::config::Config;
use crate::domain::{BumpKind, Version};
use crate::error::{BumpError, Result};
use crate::git::Repository;
use crate::manifest::ManifestSource;
use crate::package_manager::PackageManager;
use crate::tagging::{TagOutcome, TagReconciler};
use crate::ui::{self, MenuItem, Prompter};

pub const ACTION_BUMP: &str = "Bump version";
pub const ACTION_TAG_ONLY: &str = "Create tag with current version";

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Tag created from the current version
    TagOnly(TagOutcome),
    /// Manifest rewritten by the package manager
    Bumped {
        from: Version,
        /// Version as read back from the package manager
        to: String,
        pushed: bool,
    },
    /// The operator aborted a prompt
    Cancelled,
    /// A sub-flow failed and was reported; the manifest read succeeded
    Failed(String),
}

/// Wires the collaborators of a run together
pub struct Orchestrator<'a, R: Repository, M: PackageManager, P: Prompter> {
    config: &'a Config,
    manifest: ManifestSource,
    repo: &'a R,
    package_manager: &'a M,
    prompter: &'a P,
}

impl<'a, R: Repository, M: PackageManager, P: Prompter> Orchestrator<'a, R, M, P> {
    pub fn new(
        config: &'a Config,
        manifest: ManifestSource,
        repo: &'a R,
        package_manager: &'a M,
        prompter: &'a P,
    ) -> Self {
        Orchestrator {
            config,
            manifest,
            repo,
            package_manager,
            prompter,
        }
    }

    /// Run the workflow once
    ///
    /// # Returns
    /// * `Ok(RunOutcome)` - Any outcome after a successful manifest read,
    ///   including cancellations and reported sub-flow failures
    /// * `Err` - Fatal: manifest unreadable, version invalid, or bad config
    pub fn run(&self) -> Result<RunOutcome> {
        let (raw, current) = self.manifest.read_current()?;
        info!("current version {} from {}", current, self.manifest.path().display());

        let tracks = self.config.prerelease.parsed_tracks()?;
        let catalog = Catalog::build_with_tracks(&current, &tracks)?;
        debug!("{} candidates", catalog.candidates().count());

        settle(self.dispatch(&raw, &catalog))
    }

    fn dispatch(&self, raw: &str, catalog: &Catalog) -> Result<RunOutcome> {
        let actions = [MenuItem::option(ACTION_BUMP), MenuItem::option(ACTION_TAG_ONLY)];
        match self.prompter.select("What would you like to do?", &actions)? {
            0 => self.bump(catalog),
            _ => self.tag_only(raw),
        }
    }

    /// Tag the current version text as-is
    fn tag_only(&self, raw: &str) -> Result<RunOutcome> {
        let git = &self.config.git;
        let tag = git.tag_pattern()?.tag_for(raw)?;
        let mut reconciler =
            TagReconciler::new(self.repo, self.prompter, &git.remote, tag, git.message_for(raw));
        Ok(RunOutcome::TagOnly(reconciler.run()?))
    }

    fn bump(&self, catalog: &Catalog) -> Result<RunOutcome> {
        let current = catalog.current();
        let target = self.choose_target(catalog)?;
        info!("bumping {} -> {}", current, target);

        ui::display_status(&format!("Setting version {}…", target));
        self.package_manager.set_version(&target)?;

        let confirmed = match self.package_manager.read_version() {
            Ok(version) => version,
            Err(e) => {
                ui::display_warning(&format!("Could not read the version back: {}", e));
                target.to_string()
            }
        };
        ui::display_version_change(&current.to_string(), &confirmed);

        let pushed = if self
            .prompter
            .confirm("Push changes and tags to remote?", false)?
        {
            self.push()?;
            true
        } else {
            false
        };

        Ok(RunOutcome::Bumped {
            from: current.clone(),
            to: confirmed,
            pushed,
        })
    }

    /// Catalog choice, plus the identifier follow-up for vanilla pre kinds
    fn choose_target(&self, catalog: &Catalog) -> Result<Version> {
        let items: Vec<MenuItem> = catalog
            .entries()
            .iter()
            .map(|entry| match entry {
                CatalogEntry::Candidate(c) => MenuItem::option(c.label.clone()),
                CatalogEntry::Separator(s) => MenuItem::heading(s.clone()),
            })
            .collect();

        let index = self.prompter.select("Select version bump", &items)?;
        let candidate = match catalog.entries().get(index) {
            Some(CatalogEntry::Candidate(c)) => c,
            _ => return Err(BumpError::prompt("selected row is not a version")),
        };

        if !candidate.kind.is_vanilla_prerelease() {
            return Ok(candidate.version.clone());
        }
        self.choose_identifier(catalog.current(), &candidate.kind)
    }

    fn choose_identifier(&self, current: &Version, kind: &BumpKind) -> Result<Version> {
        let tracks = self.config.prerelease.parsed_tracks()?;
        let choices = identifier_choices(current, kind, &tracks)?;
        let items: Vec<MenuItem> = choices
            .iter()
            .map(|choice| MenuItem::option(choice.label.clone()))
            .collect();

        let index = self
            .prompter
            .select("Select pre-release identifier", &items)?;
        choices
            .into_iter()
            .nth(index)
            .map(|choice| choice.version)
            .ok_or_else(|| BumpError::prompt("selected identifier out of range"))
    }

    /// Branch plus whatever tags the package manager created, like
    /// `git push --follow-tags`
    fn push(&self) -> Result<()> {
        let remote = &self.config.git.remote;
        ui::display_status(&format!("Pushing to {}…", remote));
        let tags = self.repo.push_follow_tags(remote)?;
        debug!("pushed tags: {:?}", tags);
        if tags.is_empty() {
            ui::display_success("Changes pushed.");
        } else {
            ui::display_success(&format!("Changes and tags pushed: {}", tags.join(", ")));
        }
        Ok(())
    }
}

/// Turn a sub-flow result into an outcome; only fatal errors escape
fn settle(result: Result<RunOutcome>) -> Result<RunOutcome> {
    match result {
        Ok(outcome) => Ok(outcome),
        Err(BumpError::Cancelled) => {
            ui::display_status("Operation cancelled.");
            Ok(RunOutcome::Cancelled)
        }
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            ui::display_error(&e.to_string());
            Ok(RunOutcome::Failed(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use crate::package_manager::MockPackageManager;
    use crate::ui::{Answer, ScriptedPrompter};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn manifest(version: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "demo", "version": "{}"}}"#, version).unwrap();
        file.flush().unwrap();
        file
    }

    fn run_with(
        version: &str,
        repo: &MockRepository,
        pm: &MockPackageManager,
        answers: Vec<Answer>,
    ) -> Result<RunOutcome> {
        let config = Config::default();
        let file = manifest(version);
        let prompter = ScriptedPrompter::new(answers);
        Orchestrator::new(&config, ManifestSource::new(file.path()), repo, pm, &prompter).run()
    }

    #[test]
    fn test_prerelease_asks_for_identifier() {
        let repo = MockRepository::new();
        let pm = MockPackageManager::new("1.2.3");
        let outcome = run_with(
            "1.2.3",
            &repo,
            &pm,
            vec![
                Answer::pick(ACTION_BUMP),
                Answer::pick("preminor"),
                Answer::pick("beta"),
                Answer::No,
            ],
        )
        .unwrap();

        assert_eq!(pm.writes(), vec!["1.3.0-beta.1"]);
        assert!(matches!(outcome, RunOutcome::Bumped { pushed: false, .. }));
    }

    #[test]
    fn test_standard_identifier() {
        let repo = MockRepository::new();
        let pm = MockPackageManager::new("1.2.3");
        run_with(
            "1.2.3",
            &repo,
            &pm,
            vec![
                Answer::pick(ACTION_BUMP),
                Answer::pick("prepatch"),
                Answer::pick("standard"),
                Answer::No,
            ],
        )
        .unwrap();

        assert_eq!(pm.writes(), vec!["1.2.4-0.1"]);
    }

    #[test]
    fn test_push_sends_branch_and_tag() {
        let repo = MockRepository::new().with_local_tag("v2.0.1");
        let pm = MockPackageManager::new("2.0.0");
        let outcome = run_with(
            "2.0.0",
            &repo,
            &pm,
            vec![Answer::pick(ACTION_BUMP), Answer::pick("patch"), Answer::Yes],
        )
        .unwrap();

        assert_eq!(
            outcome,
            RunOutcome::Bumped {
                from: Version::new(2, 0, 0),
                to: "2.0.1".to_string(),
                pushed: true,
            }
        );
        assert_eq!(
            repo.pushes()[0].refspecs,
            vec![
                "refs/heads/main:refs/heads/main",
                "refs/tags/v2.0.1:refs/tags/v2.0.1"
            ]
        );
    }

    #[test]
    fn test_push_follows_tags_whatever_their_prefix() {
        let mut config = Config::default();
        config.git.tag_prefix = "release-".to_string();
        let file = manifest("2.0.0");
        // npm tags with its own prefix regardless of configuration
        let repo = MockRepository::new()
            .with_local_tag("v1.0.0")
            .with_local_tag("v2.0.1")
            .with_remote_tag("v1.0.0");
        let pm = MockPackageManager::new("2.0.0");
        let prompter = ScriptedPrompter::new([
            Answer::pick(ACTION_BUMP),
            Answer::pick("patch"),
            Answer::Yes,
        ]);

        let outcome = Orchestrator::new(
            &config,
            ManifestSource::new(file.path()),
            &repo,
            &pm,
            &prompter,
        )
        .run()
        .unwrap();

        assert!(matches!(outcome, RunOutcome::Bumped { pushed: true, .. }));
        assert_eq!(repo.remote_tags(), vec!["v1.0.0", "v2.0.1"]);
        assert_eq!(
            repo.pushes()[0].refspecs,
            vec![
                "refs/heads/main:refs/heads/main",
                "refs/tags/v2.0.1:refs/tags/v2.0.1"
            ]
        );
    }

    #[test]
    fn test_package_manager_failure_is_reported() {
        let repo = MockRepository::new();
        let pm = MockPackageManager::new("2.0.0").failing();
        let outcome = run_with(
            "2.0.0",
            &repo,
            &pm,
            vec![Answer::pick(ACTION_BUMP), Answer::pick("major")],
        )
        .unwrap();

        assert!(matches!(outcome, RunOutcome::Failed(_)));
        assert!(repo.pushes().is_empty());
    }

    #[test]
    fn test_push_failure_is_reported() {
        let repo = MockRepository::new().failing_on("push_branch");
        let pm = MockPackageManager::new("2.0.0");
        let outcome = run_with(
            "2.0.0",
            &repo,
            &pm,
            vec![Answer::pick(ACTION_BUMP), Answer::pick("minor"), Answer::Yes],
        )
        .unwrap();

        assert!(matches!(outcome, RunOutcome::Failed(_)));
        assert_eq!(pm.writes(), vec!["2.1.0"]);
    }

    #[test]
    fn test_cancel_is_not_an_error() {
        let repo = MockRepository::new();
        let pm = MockPackageManager::new("2.0.0");
        let outcome = run_with("2.0.0", &repo, &pm, vec![Answer::Cancel]).unwrap();
        assert_eq!(outcome, RunOutcome::Cancelled);
    }

    #[test]
    fn test_tag_only_uses_manifest_text() {
        let repo = MockRepository::new();
        let pm = MockPackageManager::new("1.2.3");
        let outcome = run_with(
            "1.2.3",
            &repo,
            &pm,
            vec![Answer::pick(ACTION_TAG_ONLY), Answer::No],
        )
        .unwrap();

        assert_eq!(outcome, RunOutcome::TagOnly(TagOutcome::CreatedLocally));
        assert_eq!(
            repo.local_tag_message("v1.2.3").as_deref(),
            Some("Release version 1.2.3")
        );
        assert!(pm.writes().is_empty());
    }

    #[test]
    fn test_invalid_version_is_fatal() {
        let repo = MockRepository::new();
        let pm = MockPackageManager::new("banana");
        let err = run_with("banana", &repo, &pm, vec![]).unwrap_err();
        assert!(matches!(err, BumpError::InvalidVersion(_)));
    }

    #[test]
    fn test_missing_manifest_is_fatal() {
        let config = Config::default();
        let repo = MockRepository::new();
        let pm = MockPackageManager::new("1.0.0");
        let prompter = ScriptedPrompter::new([]);
        let err = Orchestrator::new(
            &config,
            ManifestSource::new("/nonexistent/package.json"),
            &repo,
            &pm,
            &prompter,
        )
        .run()
        .unwrap_err();
        assert!(err.is_fatal());
        assert!(prompter.asked().is_empty());
    }
}
