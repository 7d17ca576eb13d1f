//! Repository error conditions
//!
//! Every condition the core can report to a user has its own variant here, so
//! callers can match on it and the binary can print the fixed message. I/O and
//! other plumbing failures are carried as `anyhow::Error` through `Internal`.
//!
//! ## Categories
//!
//! - user input: unknown branch, commit or file, invalid names
//! - no-op: nothing to commit, already on branch, ancestor merge
//! - guard: an untracked file would be overwritten or removed
//! - structural: repository missing or its state unreadable

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Not in an initialized bitlet directory.")]
    NotInitialized,

    #[error("A bitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("Repository state is corrupt: {0}")]
    CorruptState(String),

    #[error("Please enter a commit message.")]
    MessageRequired,

    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("File does not exist.")]
    FileNotFound(PathBuf),

    #[error("No reason to remove the file.")]
    NoReasonToRemove(PathBuf),

    #[error("File does not exist in that commit.")]
    FileNotInCommit(PathBuf),

    #[error("No commit with that id exists.")]
    UnknownCommit(String),

    #[error("Commit id prefix '{prefix}' is ambiguous: {}", candidates.join(", "))]
    AmbiguousCommit {
        prefix: String,
        candidates: Vec<String>,
    },

    #[error("Found no commit with that message.")]
    NoCommitWithMessage(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("A branch with that name already exists.")]
    BranchExists(String),

    #[error("A branch with that name does not exist.")]
    UnknownBranch(String),

    #[error("No such branch exists.")]
    NoSuchBranch(String),

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch(String),

    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch(String),

    #[error("Cannot merge a branch with itself.")]
    MergeWithSelf(String),

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInTheWay(Vec<PathBuf>),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl RepositoryError {
    /// Conditions that leave the repository untouched and are not failures of
    /// the requested operation itself.
    pub fn is_no_op(&self) -> bool {
        matches!(
            self,
            RepositoryError::NothingToCommit
                | RepositoryError::AlreadyOnBranch(_)
                | RepositoryError::BranchExists(_)
        )
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(error: std::io::Error) -> Self {
        RepositoryError::Internal(error.into())
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
