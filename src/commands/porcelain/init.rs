use crate::areas::repository::Repository;
use crate::errors::Result;
use std::io::Write;
use std::path::Path;

impl Repository {
    pub fn init(path: &Path, writer: Box<dyn Write>) -> Result<Self> {
        let repository = Repository::create(path, writer)?;

        writeln!(
            repository.writer(),
            "Initialized empty bitlet repository in {}",
            repository.path().display()
        )?;

        Ok(repository)
    }
}
