use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Pending changes of one branch
///
/// A path is never staged for addition and removal at the same time. The
/// stage remembers the head it was created for and refuses to work against
/// any other commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Stage {
    /// Head commit this stage is relative to
    head: ObjectId,
    /// Paths whose working-tree content goes into the next commit
    #[new(default)]
    staged_add: BTreeSet<PathBuf>,
    /// Tracked paths dropped from the next commit
    #[new(default)]
    staged_remove: BTreeSet<PathBuf>,
}

impl Stage {
    /// Stage a file for the next commit
    ///
    /// A file whose content matches the head again is unstaged instead, so
    /// reverting a change and adding it is a no-op. Either way a pending
    /// removal of the path is cancelled.
    pub fn add(&mut self, file_path: &Path, head: &Commit, workspace: &Workspace) -> Result<()> {
        self.check_head(head)?;

        if !workspace.exists(file_path) {
            return Err(RepositoryError::FileNotFound(file_path.to_path_buf()));
        }

        let blob = workspace.parse_blob(file_path)?;
        if head.blob_id(file_path) == Some(blob.oid()) {
            self.staged_add.remove(file_path);
        } else {
            self.staged_add.insert(file_path.to_path_buf());
        }
        self.staged_remove.remove(file_path);

        Ok(())
    }

    /// Unstage a file and, if the head tracks it, schedule its removal
    ///
    /// Tracked files are also deleted from the working tree.
    pub fn remove(
        &mut self,
        file_path: &Path,
        head: &Commit,
        workspace: &Workspace,
    ) -> Result<()> {
        self.check_head(head)?;

        let staged = self.staged_add.contains(file_path);
        let tracked = head.contains(file_path);
        if !staged && !tracked {
            return Err(RepositoryError::NoReasonToRemove(file_path.to_path_buf()));
        }

        if tracked {
            self.staged_remove.insert(file_path.to_path_buf());
            workspace.restricted_delete(file_path)?;
        }
        self.staged_add.remove(file_path);

        Ok(())
    }

    /// Forget any pending change for a single path
    pub fn checkout(&mut self, file_path: &Path) {
        self.staged_add.remove(file_path);
        self.staged_remove.remove(file_path);
    }

    pub fn clear(&mut self) {
        self.staged_add.clear();
        self.staged_remove.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.staged_add.is_empty() && self.staged_remove.is_empty()
    }

    pub fn head(&self) -> &ObjectId {
        &self.head
    }

    pub fn staged_add(&self) -> &BTreeSet<PathBuf> {
        &self.staged_add
    }

    pub fn staged_remove(&self) -> &BTreeSet<PathBuf> {
        &self.staged_remove
    }

    pub fn is_staged(&self, file_path: &Path) -> bool {
        self.staged_add.contains(file_path)
    }

    pub fn is_removed(&self, file_path: &Path) -> bool {
        self.staged_remove.contains(file_path)
    }

    fn check_head(&self, head: &Commit) -> Result<()> {
        if head.id() != &self.head {
            return Err(anyhow::anyhow!(
                "stage belongs to {} but was used with {}",
                self.head,
                head.id()
            )
            .into());
        }

        Ok(())
    }
}
