use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::guard::{GuardScope, check_untracked};
use crate::errors::{RepositoryError, Result};
use std::io::Write;

impl Repository {
    /// Switch to another branch, replacing the working tree with its head
    pub fn checkout_branch(&mut self, branch_name: &str) -> Result<()> {
        let no_such_branch = || RepositoryError::NoSuchBranch(branch_name.to_string());
        let name = BranchName::try_parse(branch_name.to_string()).map_err(|_| no_such_branch())?;

        let target_head = self
            .state()
            .branch(&name)
            .ok_or_else(no_such_branch)?
            .head()
            .clone();
        if &name == self.state().current_branch_name() {
            return Err(RepositoryError::AlreadyOnBranch(name.to_string()));
        }

        let current = self.state().current_branch()?;
        let current_head = self.state().commit(current.head())?;
        check_untracked(
            self.workspace(),
            current_head,
            current.stage(),
            GuardScope::WholeTree,
        )?
        .into_result()?;

        let target = self.state().commit(&target_head)?;
        target.checkout_all(self.database(), self.workspace())?;

        let state = self.state_mut();
        state.set_current_branch(name.clone());
        state.current_branch_mut()?.stage_mut().clear();

        tracing::info!(branch = %name, head = %target_head, "checkout");
        writeln!(self.writer(), "Switched to branch '{name}'")?;

        Ok(())
    }

    /// Restore one file from the current head
    pub fn checkout_file(&mut self, file: &str) -> Result<()> {
        let path = self.workspace().normalize(file)?;

        let (state, workspace, database) = self.split_mut();
        let (stage, head) = state.current_stage_and_head()?;
        head.checkout(&path, database, workspace)?;
        stage.checkout(&path);

        Ok(())
    }

    /// Restore one file from any commit
    pub fn checkout_file_from(&mut self, commit_id: &str, file: &str) -> Result<()> {
        let path = self.workspace().normalize(file)?;
        let commit_id = self.state().resolve_commit_id(commit_id)?;

        let commit = self.state().commit(&commit_id)?;
        commit.checkout(&path, self.database(), self.workspace())?;
        self.state_mut()
            .current_branch_mut()?
            .stage_mut()
            .checkout(&path);

        Ok(())
    }
}
