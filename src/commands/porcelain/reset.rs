use crate::areas::repository::Repository;
use crate::artifacts::checkout::guard::{GuardScope, check_untracked};
use crate::errors::Result;

impl Repository {
    /// Move the current branch to any commit and restore its snapshot
    pub fn reset(&mut self, commit_id: &str) -> Result<()> {
        let commit_id = self.state().resolve_commit_id(commit_id)?;

        let current = self.state().current_branch()?;
        let current_head = self.state().commit(current.head())?;
        check_untracked(
            self.workspace(),
            current_head,
            current.stage(),
            GuardScope::WholeTree,
        )?
        .into_result()?;

        let target = self.state().commit(&commit_id)?;
        target.checkout_all(self.database(), self.workspace())?;
        self.state_mut().current_branch_mut()?.move_head(commit_id.clone());

        tracing::info!(commit = %commit_id, "reset");

        Ok(())
    }
}
