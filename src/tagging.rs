//! Release tag reconciliation
//!
//! Creates a release tag and optionally pushes it, consulting the local and
//! remote tag sets before every write. The flow is an explicit state machine:
//!
//! ```text
//! CheckLocal ─┬─> CreateTag ─> AskPush ─┬─> (done: CreatedLocally)
//!             └─> ConfirmOverwriteLocal  └─> CheckRemote ─┬─> Push
//!                  ├─> (done: OverwriteDeclined)          ├─> ConfirmForceRemote ─┬─> Push(force)
//!                  └─> DeleteLocal ─> CreateTag           │                       └─> (done: ForcePushDeclined)
//!                                                         └─> Push (remote query failed)
//! ```
//!
//! A failing git operation ends the run with an error. A tag that was
//! already created is never removed again.

use log::debug;

use crate::boundary::BoundaryWarning;
use crate::domain::Tag;
use crate::error::Result;
use crate::git::Repository;
use crate::ui::{self, Prompter};

/// What is known about the remote copy of the tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteTagStatus {
    NotChecked,
    Present,
    Absent,
    /// The remote could not be queried
    Unknown,
}

/// Snapshot of the tag as seen during one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagState {
    pub tag: Tag,
    pub exists_locally: bool,
    pub exists_remotely: RemoteTagStatus,
}

/// Named steps of the reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CheckLocal,
    ConfirmOverwriteLocal,
    DeleteLocal,
    CreateTag,
    AskPush,
    CheckRemote,
    ConfirmForceRemote,
    Push { force: bool },
}

/// Terminal states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    /// Tag existed locally and the operator kept it; nothing written
    OverwriteDeclined,
    /// Tag created, operator chose not to push
    CreatedLocally,
    /// Tag exists on the remote and the operator declined to overwrite it
    ForcePushDeclined,
    Pushed,
    ForcePushed,
}

enum Transition {
    Next(Step),
    Done(TagOutcome),
}

/// Drives one tag through [Step]s until a [TagOutcome]
pub struct TagReconciler<'a, R: Repository, P: Prompter> {
    repo: &'a R,
    prompter: &'a P,
    remote: &'a str,
    message: String,
    state: TagState,
}

impl<'a, R: Repository, P: Prompter> TagReconciler<'a, R, P> {
    /// # Arguments
    /// * `repo` - Local repository
    /// * `prompter` - Source of operator decisions
    /// * `remote` - Remote to push to (e.g., "origin")
    /// * `tag` - Tag to create
    /// * `message` - Annotation message
    pub fn new(
        repo: &'a R,
        prompter: &'a P,
        remote: &'a str,
        tag: Tag,
        message: impl Into<String>,
    ) -> Self {
        TagReconciler {
            repo,
            prompter,
            remote,
            message: message.into(),
            state: TagState {
                tag,
                exists_locally: false,
                exists_remotely: RemoteTagStatus::NotChecked,
            },
        }
    }

    pub fn state(&self) -> &TagState {
        &self.state
    }

    /// Run the state machine to completion
    pub fn run(&mut self) -> Result<TagOutcome> {
        let mut step = Step::CheckLocal;
        loop {
            debug!("tag {}: {:?}", self.state.tag.name, step);
            match self.advance(step)? {
                Transition::Next(next) => step = next,
                Transition::Done(outcome) => {
                    debug!("tag {}: finished with {:?}", self.state.tag.name, outcome);
                    return Ok(outcome);
                }
            }
        }
    }

    fn advance(&mut self, step: Step) -> Result<Transition> {
        let name = self.state.tag.name.clone();

        let transition = match step {
            Step::CheckLocal => {
                self.state.exists_locally = self.repo.list_tags()?.iter().any(|t| *t == name);
                if self.state.exists_locally {
                    ui::display_boundary_warning(&BoundaryWarning::TagExistsLocally {
                        tag: name,
                    });
                    Transition::Next(Step::ConfirmOverwriteLocal)
                } else {
                    Transition::Next(Step::CreateTag)
                }
            }
            Step::ConfirmOverwriteLocal => {
                if self
                    .prompter
                    .confirm(&format!("Overwrite tag {}?", name), false)?
                {
                    Transition::Next(Step::DeleteLocal)
                } else {
                    ui::display_status("Operation cancelled.");
                    Transition::Done(TagOutcome::OverwriteDeclined)
                }
            }
            Step::DeleteLocal => {
                ui::display_status(&format!("Deleting existing tag {}…", name));
                self.repo.delete_tag(&name)?;
                self.state.exists_locally = false;
                Transition::Next(Step::CreateTag)
            }
            Step::CreateTag => {
                ui::display_status(&format!("Creating git tag: {}…", name));
                self.repo.create_annotated_tag(&name, &self.message)?;
                self.state.exists_locally = true;
                ui::display_success(&format!("Tag {} created successfully.", name));
                Transition::Next(Step::AskPush)
            }
            Step::AskPush => {
                if self
                    .prompter
                    .confirm("Push tag to remote repository?", false)?
                {
                    Transition::Next(Step::CheckRemote)
                } else {
                    ui::display_manual_push_instruction(&name, self.remote);
                    Transition::Done(TagOutcome::CreatedLocally)
                }
            }
            Step::CheckRemote => match self.repo.list_remote_tags(self.remote) {
                Ok(refs) => {
                    let reference = self.state.tag.reference();
                    if refs.iter().any(|r| *r == reference) {
                        self.state.exists_remotely = RemoteTagStatus::Present;
                        ui::display_boundary_warning(&BoundaryWarning::TagExistsRemotely {
                            tag: name,
                            remote: self.remote.to_string(),
                        });
                        Transition::Next(Step::ConfirmForceRemote)
                    } else {
                        self.state.exists_remotely = RemoteTagStatus::Absent;
                        Transition::Next(Step::Push { force: false })
                    }
                }
                Err(e) => {
                    debug!("remote tag query failed: {:?}", e);
                    self.state.exists_remotely = RemoteTagStatus::Unknown;
                    ui::display_boundary_warning(&BoundaryWarning::RemoteQueryFailed {
                        remote: self.remote.to_string(),
                        reason: e.to_string(),
                    });
                    Transition::Next(Step::Push { force: false })
                }
            },
            Step::ConfirmForceRemote => {
                if self
                    .prompter
                    .confirm("Force update tag on remote?", false)?
                {
                    Transition::Next(Step::Push { force: true })
                } else {
                    ui::display_status("Tag push cancelled.");
                    Transition::Done(TagOutcome::ForcePushDeclined)
                }
            }
            Step::Push { force } => {
                if force {
                    ui::display_status("Force-pushing tag…");
                } else {
                    ui::display_status("Pushing tag…");
                }
                self.repo.push_tag(self.remote, &name, force)?;
                if force {
                    ui::display_success("Tag updated on remote.");
                    Transition::Done(TagOutcome::ForcePushed)
                } else {
                    ui::display_success("Tag pushed successfully.");
                    Transition::Done(TagOutcome::Pushed)
                }
            }
        };

        Ok(transition)
    }
}
