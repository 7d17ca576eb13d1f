//! Branch: a named head pointer owning one stage

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::staging::stage::Stage;
use crate::errors::{RepositoryError, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    name: BranchName,
    head: ObjectId,
    stage: Stage,
}

impl Branch {
    pub fn new(name: BranchName, head: ObjectId) -> Self {
        let stage = Stage::new(head.clone());
        Branch { name, head, stage }
    }

    /// Commit the stage on top of the branch head
    ///
    /// On success the head moves to the new commit and the stage is replaced
    /// by an empty one keyed to it. On failure the branch is unchanged.
    pub fn commit(
        &mut self,
        head: &Commit,
        message: &str,
        second_parent: Option<ObjectId>,
        timestamp: DateTime<FixedOffset>,
        workspace: &Workspace,
        database: &Database,
    ) -> Result<Commit> {
        if head.id() != &self.head {
            return Err(anyhow::anyhow!(
                "branch {} points at {} but was committed on top of {}",
                self.name,
                self.head,
                head.id()
            )
            .into());
        }

        let commit = Commit::create(
            &self.stage,
            head,
            message,
            second_parent,
            timestamp,
            workspace,
            database,
        )?;
        self.move_head(commit.id().clone());

        Ok(commit)
    }

    /// Point the branch at another commit, discarding pending work
    pub fn move_head(&mut self, head: ObjectId) {
        self.stage = Stage::new(head.clone());
        self.head = head;
    }

    pub fn name(&self) -> &BranchName {
        &self.name
    }

    pub fn head(&self) -> &ObjectId {
        &self.head
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// Every commit reachable from `start` through either parent link
    ///
    /// `start` itself is included; the root commit is not.
    pub fn ancestors(
        start: &ObjectId,
        commits: &BTreeMap<ObjectId, Commit>,
    ) -> Result<BTreeSet<ObjectId>> {
        let mut visited = BTreeSet::new();
        let mut pending = vec![start.clone()];

        while let Some(commit_id) = pending.pop() {
            if visited.contains(&commit_id) {
                continue;
            }

            let commit = commits.get(&commit_id).ok_or_else(|| {
                RepositoryError::CorruptState(format!("commit {commit_id} is missing"))
            })?;
            if commit.is_root() {
                continue;
            }

            pending.extend(commit.parents().cloned());
            visited.insert(commit_id);
        }

        Ok(visited)
    }
}
