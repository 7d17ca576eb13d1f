use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, load_timestamp_from_env};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use chrono::{DateTime, FixedOffset};
use std::io::Write;

impl Repository {
    /// Commit the current branch's stage, timestamped from the environment
    pub fn commit(&mut self, message: &str) -> Result<Commit> {
        if message.trim().is_empty() {
            return Err(RepositoryError::MessageRequired);
        }
        if self.state().current_branch()?.stage().is_empty() {
            return Err(RepositoryError::NothingToCommit);
        }

        let timestamp = load_timestamp_from_env()?;
        self.commit_at(message, timestamp)
    }

    pub fn commit_at(&mut self, message: &str, timestamp: DateTime<FixedOffset>) -> Result<Commit> {
        let commit = self.commit_on_current_branch(message, None, timestamp)?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            self.state().current_branch_name(),
            commit.id().to_short_oid(),
            commit.short_message()
        )?;

        Ok(commit)
    }

    /// Commit on the current branch and record the result in the indices
    pub(crate) fn commit_on_current_branch(
        &mut self,
        message: &str,
        second_parent: Option<ObjectId>,
        timestamp: DateTime<FixedOffset>,
    ) -> Result<Commit> {
        let (state, workspace, database) = self.split_mut();
        let (branch, head) = state.current_branch_and_head()?;
        let commit = branch.commit(head, message, second_parent, timestamp, workspace, database)?;
        state.index_commit(commit.clone());

        tracing::info!(
            branch = %state.current_branch_name(),
            commit = %commit.id(),
            "commit"
        );

        Ok(commit)
    }
}
