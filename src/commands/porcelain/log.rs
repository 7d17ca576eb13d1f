use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::errors::Result;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// History of the current head, following primary parents
    pub fn log(&self) -> Result<()> {
        let mut current = Some(self.state().current_head()?);

        while let Some(commit) = current {
            self.show_commit(commit)?;
            current = commit
                .parent()
                .map(|parent| self.state().commit(parent))
                .transpose()?;
        }

        Ok(())
    }

    /// Every commit ever made, oldest first
    pub fn global_log(&self) -> Result<()> {
        for commit in self.state().commits_by_timestamp() {
            self.show_commit(commit)?;
        }

        Ok(())
    }

    fn show_commit(&self, commit: &Commit) -> Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(writer, "{}", format!("commit {}", commit.id()).yellow())?;
        if commit.is_merge() {
            let parents = commit
                .parents()
                .map(|parent| parent.to_short_oid())
                .collect::<Vec<_>>();
            writeln!(writer, "Merge: {}", parents.join(" "))?;
        }
        writeln!(writer, "Date: {}", commit.readable_timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}
