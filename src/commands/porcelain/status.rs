use crate::areas::repository::Repository;
use crate::artifacts::status::inspector::Inspector;
use crate::artifacts::status::status_info::StatusInfo;
use crate::errors::Result;

impl Repository {
    pub fn status(&self) -> Result<()> {
        let info = self.status_info()?;
        let state = self.state();

        info.write_sections(
            &mut **self.writer(),
            state.branches().map(|branch| branch.name()),
            state.current_branch_name(),
        )?;

        Ok(())
    }

    pub fn status_info(&self) -> Result<StatusInfo> {
        let branch = self.state().current_branch()?;
        let head = self.state().commit(branch.head())?;

        Ok(Inspector::new(self.workspace(), head, branch.stage()).inspect()?)
    }
}
