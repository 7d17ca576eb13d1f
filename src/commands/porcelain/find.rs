use crate::areas::repository::Repository;
use crate::errors::{RepositoryError, Result};
use std::io::Write;

impl Repository {
    /// Print the id of every commit with exactly this message
    pub fn find(&self, message: &str) -> Result<()> {
        let ids = self.state().find_by_message(message);
        if ids.is_empty() {
            return Err(RepositoryError::NoCommitWithMessage(message.to_string()));
        }

        for id in ids {
            writeln!(self.writer(), "{id}")?;
        }

        Ok(())
    }
}
