use crate::areas::database::Database;
use crate::areas::state::RepositoryState;
use crate::areas::state_file::StateFile;
use crate::areas::workspace::Workspace;
use crate::areas::{OBJECTS_DIR, REPOSITORY_DIR};
use crate::artifacts::objects::commit::Commit;
use crate::errors::{RepositoryError, Result};
use anyhow::Context;
use file_guard::FileGuard;
use std::cell::{RefCell, RefMut};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// An opened repository
///
/// Owns the loaded state for the duration of one command together with the
/// exclusive repository lock. Commands only change the in-memory state;
/// [`Repository::save`] persists it once the command has succeeded.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn Write>>,
    workspace: Workspace,
    database: Database,
    state_file: StateFile,
    state: RepositoryState,
    _lock: FileGuard<Box<File>>,
}

impl Repository {
    /// Create the repository directory, the root commit and the master branch
    pub fn create(path: &Path, writer: Box<dyn Write>) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        let path = path
            .canonicalize()
            .with_context(|| format!("Unable to resolve {}", path.display()))?;

        let repository_dir = path.join(REPOSITORY_DIR);
        if repository_dir.exists() {
            return Err(RepositoryError::AlreadyInitialized);
        }
        std::fs::create_dir_all(repository_dir.join(OBJECTS_DIR)).with_context(|| {
            format!("Unable to create {}", repository_dir.join(OBJECTS_DIR).display())
        })?;

        let state_file = StateFile::new(repository_dir.clone().into_boxed_path());
        let lock = state_file.lock()?;
        let database = Database::new(repository_dir.join(OBJECTS_DIR).into_boxed_path());

        let root = Commit::root();
        root.store_root(&database)?;
        let state = RepositoryState::new(root);
        state_file.save(&state)?;

        tracing::info!(path = %path.display(), "initialized repository");

        Ok(Repository {
            workspace: Workspace::new(path.clone().into_boxed_path()),
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            state_file,
            state,
            _lock: lock,
        })
    }

    /// Lock and load an existing repository
    pub fn open(path: &Path, writer: Box<dyn Write>) -> Result<Self> {
        let repository_dir = path.join(REPOSITORY_DIR);
        if !repository_dir.is_dir() {
            return Err(RepositoryError::NotInitialized);
        }
        let path = path
            .canonicalize()
            .with_context(|| format!("Unable to resolve {}", path.display()))?;
        let repository_dir = path.join(REPOSITORY_DIR);

        let state_file = StateFile::new(repository_dir.clone().into_boxed_path());
        let lock = state_file.lock()?;
        let state = state_file.load()?;

        Ok(Repository {
            workspace: Workspace::new(path.clone().into_boxed_path()),
            database: Database::new(repository_dir.join(OBJECTS_DIR).into_boxed_path()),
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            state_file,
            state,
            _lock: lock,
        })
    }

    /// Persist the in-memory state
    pub fn save(&self) -> Result<()> {
        self.state_file.save(&self.state)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn state(&self) -> &RepositoryState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut RepositoryState {
        &mut self.state
    }

    /// Mutable state next to the working tree and the content store
    pub(crate) fn split_mut(&mut self) -> (&mut RepositoryState, &Workspace, &Database) {
        (&mut self.state, &self.workspace, &self.database)
    }
}
