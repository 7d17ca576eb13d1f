use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::staging::stage::Stage;
use crate::errors::RepositoryError;
use std::path::PathBuf;

/// Which working-tree files an operation is about to rewrite
#[derive(Debug, Clone, Copy)]
pub enum GuardScope<'p> {
    /// The whole tree is replaced (checkout of a branch, reset)
    WholeTree,
    /// Only these paths are written or deleted (merge)
    Paths(&'p [PathBuf]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Clear,
    Blocked(Vec<PathBuf>),
}

impl GuardOutcome {
    pub fn into_result(self) -> crate::errors::Result<()> {
        match self {
            GuardOutcome::Clear => Ok(()),
            GuardOutcome::Blocked(paths) => Err(RepositoryError::UntrackedFileInTheWay(paths)),
        }
    }
}

/// Find files inside `scope` whose content only lives in the working tree
///
/// A file blocks when it exists in the working tree, is not staged for
/// addition, and either is not recorded by the head commit or differs from
/// the head's version. Nothing is written.
pub fn check_untracked(
    workspace: &Workspace,
    head: &Commit,
    stage: &Stage,
    scope: GuardScope<'_>,
) -> anyhow::Result<GuardOutcome> {
    let candidates = match scope {
        GuardScope::WholeTree => workspace.list_files()?,
        GuardScope::Paths(paths) => paths
            .iter()
            .filter(|path| workspace.exists(path))
            .cloned()
            .collect(),
    };

    let mut untracked = Vec::new();
    for path in candidates {
        if stage.is_staged(&path) {
            continue;
        }
        let unsaved = match head.blob_id(&path) {
            None => true,
            Some(blob_id) => workspace.parse_blob(&path)?.oid() != blob_id,
        };
        if unsaved {
            untracked.push(path);
        }
    }

    if untracked.is_empty() {
        Ok(GuardOutcome::Clear)
    } else {
        tracing::debug!(count = untracked.len(), "unsaved files block the operation");
        Ok(GuardOutcome::Blocked(untracked))
    }
}
