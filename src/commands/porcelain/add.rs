use crate::areas::repository::Repository;
use crate::errors::Result;

impl Repository {
    pub fn add(&mut self, file: &str) -> Result<()> {
        let path = self.workspace().normalize(file)?;

        let (state, workspace, _) = self.split_mut();
        let (stage, head) = state.current_stage_and_head()?;
        stage.add(&path, head, workspace)?;

        tracing::info!(path = %path.display(), staged = stage.is_staged(&path), "add");

        Ok(())
    }
}
