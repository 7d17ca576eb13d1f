use crate::areas::repository::Repository;
use crate::artifacts::branch::branch::Branch;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::guard::{GuardScope, check_untracked};
use crate::artifacts::merge::conflict::conflict_content;
use crate::artifacts::merge::resolution::{MergeAction, classify_snapshots};
use crate::artifacts::merge::split_finder::SplitFinder;
use crate::artifacts::objects::commit::{Commit, load_timestamp_from_env};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::io::Write;
use std::path::PathBuf;

pub const ANCESTOR_NOTICE: &str = "Given branch is an ancestor of the current branch.";
pub const FAST_FORWARD_NOTICE: &str = "Current branch fast-forwarded.";
pub const CONFLICT_NOTICE: &str = "Encountered a merge conflict.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The given head is already part of the current history
    AlreadyAncestor,
    /// The current branch now points at the given head
    FastForward(ObjectId),
    /// A merge commit was created; `conflicts` lists the paths with markers
    Merged {
        commit: ObjectId,
        conflicts: Vec<PathBuf>,
    },
}

/// Working-tree change of one merged path, contents already loaded
enum MergeStep {
    Write { path: PathBuf, content: Bytes },
    Conflict { path: PathBuf, content: Bytes },
    Remove { path: PathBuf },
}

impl Repository {
    /// Merge with the commit timestamp taken from the environment
    ///
    /// The timestamp is only read once a merge commit is actually needed.
    pub fn merge(&mut self, branch_name: &str) -> Result<MergeOutcome> {
        self.merge_with(branch_name, || Ok(load_timestamp_from_env()?))
    }

    pub fn merge_at(
        &mut self,
        branch_name: &str,
        timestamp: DateTime<FixedOffset>,
    ) -> Result<MergeOutcome> {
        self.merge_with(branch_name, || Ok(timestamp))
    }

    fn merge_with(
        &mut self,
        branch_name: &str,
        timestamp: impl FnOnce() -> Result<DateTime<FixedOffset>>,
    ) -> Result<MergeOutcome> {
        let unknown = || RepositoryError::UnknownBranch(branch_name.to_string());
        let given_name = BranchName::try_parse(branch_name.to_string()).map_err(|_| unknown())?;

        let given_head = self
            .state()
            .branch(&given_name)
            .ok_or_else(unknown)?
            .head()
            .clone();
        let current_name = self.state().current_branch_name().clone();
        if given_name == current_name {
            return Err(RepositoryError::MergeWithSelf(given_name.to_string()));
        }
        let current = self.state().current_branch()?;
        if !current.stage().is_empty() {
            return Err(RepositoryError::UncommittedChanges);
        }
        let current_head = current.head().clone();

        if self.is_ancestor(&given_head, &current_head)? {
            writeln!(self.writer(), "{ANCESTOR_NOTICE}")?;
            return Ok(MergeOutcome::AlreadyAncestor);
        }
        if self.is_ancestor(&current_head, &given_head)? {
            self.state_mut()
                .current_branch_mut()?
                .move_head(given_head.clone());
            tracing::info!(branch = %current_name, head = %given_head, "fast-forward");
            writeln!(self.writer(), "{FAST_FORWARD_NOTICE}")?;
            return Ok(MergeOutcome::FastForward(given_head));
        }

        let split = self.split_point(&current_head, &given_head)?;
        let steps = self.plan_merge(&split, &current_head, &given_head)?;

        let written = steps
            .iter()
            .map(|step| match step {
                MergeStep::Write { path, .. }
                | MergeStep::Conflict { path, .. }
                | MergeStep::Remove { path } => path.clone(),
            })
            .collect::<Vec<_>>();
        let current = self.state().current_branch()?;
        check_untracked(
            self.workspace(),
            self.state().commit(&current_head)?,
            current.stage(),
            GuardScope::Paths(&written),
        )?
        .into_result()?;

        let timestamp = timestamp()?;
        let conflicts = self.apply_merge(steps)?;

        let message = format!("Merged {given_name} into {current_name}.");
        let commit = self.commit_on_current_branch(&message, Some(given_head.clone()), timestamp)?;

        tracing::info!(
            commit = %commit.id(),
            conflicts = conflicts.len(),
            "merge"
        );
        if !conflicts.is_empty() {
            writeln!(self.writer(), "{CONFLICT_NOTICE}")?;
        }

        Ok(MergeOutcome::Merged {
            commit: commit.id().clone(),
            conflicts,
        })
    }

    fn is_ancestor(&self, candidate: &ObjectId, descendant: &ObjectId) -> Result<bool> {
        let state = self.state();
        if candidate == state.root() {
            return Ok(true);
        }

        Ok(Branch::ancestors(descendant, state.commits())?.contains(candidate))
    }

    fn split_point(&self, current: &ObjectId, given: &ObjectId) -> Result<ObjectId> {
        let state = self.state();
        let finder = SplitFinder::new(|commit_id| state.commits().get(commit_id).map(Commit::slim));

        Ok(finder
            .find_split_point(current, given)?
            .unwrap_or_else(|| state.root().clone()))
    }

    /// Classify every path and load the contents the merge will write
    fn plan_merge(
        &self,
        split: &ObjectId,
        current: &ObjectId,
        given: &ObjectId,
    ) -> Result<Vec<MergeStep>> {
        let state = self.state();
        let (split, current, given) = (
            state.commit(split)?,
            state.commit(current)?,
            state.commit(given)?,
        );
        let load = |commit: &Commit, path: &PathBuf| -> Result<Option<Bytes>> {
            if commit.contains(path) {
                Ok(Some(commit.blob_for(path, self.database())?))
            } else {
                Ok(None)
            }
        };

        let mut steps = Vec::new();
        for (path, action) in
            classify_snapshots(split.snapshot(), current.snapshot(), given.snapshot())
        {
            tracing::debug!(path = %path.display(), ?action, "classified");

            match action {
                MergeAction::KeepCurrent | MergeAction::LeaveAbsent => {}
                MergeAction::TakeGiven => {
                    let content = given.blob_for(&path, self.database())?;
                    steps.push(MergeStep::Write { path, content });
                }
                MergeAction::Remove => steps.push(MergeStep::Remove { path }),
                MergeAction::Conflict => {
                    let current_content = load(current, &path)?;
                    let given_content = load(given, &path)?;
                    let content =
                        conflict_content(current_content.as_deref(), given_content.as_deref());
                    steps.push(MergeStep::Conflict { path, content });
                }
            }
        }

        Ok(steps)
    }

    /// Write the planned changes and stage them; returns the conflicted paths
    fn apply_merge(&mut self, steps: Vec<MergeStep>) -> Result<Vec<PathBuf>> {
        let (state, workspace, _) = self.split_mut();
        let (stage, head) = state.current_stage_and_head()?;

        let mut conflicts = Vec::new();
        for step in steps {
            match step {
                MergeStep::Write { path, content } => {
                    workspace.write_file(&path, &content)?;
                    stage.add(&path, head, workspace)?;
                }
                MergeStep::Conflict { path, content } => {
                    workspace.write_file(&path, &content)?;
                    stage.add(&path, head, workspace)?;
                    conflicts.push(path);
                }
                MergeStep::Remove { path } => stage.remove(&path, head, workspace)?,
            }
        }

        Ok(conflicts)
    }
}
