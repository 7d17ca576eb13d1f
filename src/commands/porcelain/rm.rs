use crate::areas::repository::Repository;
use crate::errors::Result;

impl Repository {
    pub fn rm(&mut self, file: &str) -> Result<()> {
        let path = self.workspace().normalize(file)?;

        let (state, workspace, _) = self.split_mut();
        let (stage, head) = state.current_stage_and_head()?;
        stage.remove(&path, head, workspace)?;

        tracing::info!(path = %path.display(), removed = stage.is_removed(&path), "rm");

        Ok(())
    }
}
