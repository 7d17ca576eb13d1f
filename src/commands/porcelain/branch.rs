use crate::areas::repository::Repository;
use crate::artifacts::branch::branch::Branch;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::{RepositoryError, Result};

impl Repository {
    /// Create a branch at the current head with an empty stage
    pub fn branch(&mut self, branch_name: &str) -> Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        if self.state().branch(&branch_name).is_some() {
            return Err(RepositoryError::BranchExists(branch_name.to_string()));
        }

        let head = self.state().current_branch()?.head().clone();
        tracing::info!(branch = %branch_name, head = %head, "branch");
        self.state_mut().insert_branch(Branch::new(branch_name, head));

        Ok(())
    }

    /// Delete a branch pointer; its commits stay
    pub fn rm_branch(&mut self, branch_name: &str) -> Result<()> {
        let unknown = || RepositoryError::UnknownBranch(branch_name.to_string());
        let name = BranchName::try_parse(branch_name.to_string()).map_err(|_| unknown())?;

        if self.state().branch(&name).is_none() {
            return Err(unknown());
        }
        if &name == self.state().current_branch_name() {
            return Err(RepositoryError::RemoveCurrentBranch(name.to_string()));
        }

        self.state_mut().remove_branch(&name);
        tracing::info!(branch = %name, "rm-branch");

        Ok(())
    }
}
