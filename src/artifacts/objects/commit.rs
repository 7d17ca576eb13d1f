//! Commit snapshot
//!
//! Commits are immutable snapshot nodes of the history DAG. They contain:
//! - The commit message and timestamp
//! - The primary parent id (absent only for the root commit)
//! - The second parent id (merge commits only)
//! - The snapshot: every tracked path mapped to its content hash
//!
//! ## Identity
//!
//! The id hashes the sorted staged-add paths, the parent id, the message and
//! the timestamp. Two commits built from the same inputs share an id even when
//! the staged file contents differ.
//!
//! ## Storage
//!
//! The blobs of a commit live under its own directory in the content store
//! (see [`crate::areas::database`]).

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::staging::stage::Stage;
use crate::errors::{RepositoryError, Result};
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Message of the root commit created by `init`
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// Environment variable that pins the timestamp of new commits
pub const COMMIT_DATE_ENV: &str = "BITLET_COMMIT_DATE";

const READABLE_TIMESTAMP_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// Snapshot mapping tracked paths to content hashes
pub type Snapshot = BTreeMap<PathBuf, ObjectId>;

/// Timestamp of the root commit: the Unix epoch seen from UTC-8
pub fn sentinel_timestamp() -> DateTime<FixedOffset> {
    FixedOffset::west_opt(8 * 3600)
        .and_then(|offset| offset.timestamp_opt(0, 0).single())
        .unwrap_or_default()
}

/// Timestamp for a new commit
///
/// Reads `BITLET_COMMIT_DATE` (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`) and falls
/// back to the local clock when it is not set.
pub fn load_timestamp_from_env() -> anyhow::Result<DateTime<FixedOffset>> {
    match std::env::var(COMMIT_DATE_ENV) {
        Ok(date_str) => chrono::DateTime::parse_from_rfc2822(&date_str)
            .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
            .with_context(|| format!("{COMMIT_DATE_ENV} is not a valid date: {date_str}")),
        Err(_) => Ok(chrono::Local::now().fixed_offset()),
    }
}

/// Graph view of a commit used by history traversals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    id: ObjectId,
    message: String,
    timestamp: DateTime<FixedOffset>,
    parent: Option<ObjectId>,
    second_parent: Option<ObjectId>,
    snapshot: Snapshot,
}

impl Commit {
    /// Build the parentless root commit
    pub fn root() -> Self {
        let timestamp = sentinel_timestamp();
        let readable = Self::format_timestamp(&timestamp);
        let id = ObjectId::of_parts(&[readable.as_bytes(), INITIAL_COMMIT_MESSAGE.as_bytes()]);

        Commit {
            id,
            message: INITIAL_COMMIT_MESSAGE.to_string(),
            timestamp,
            parent: None,
            second_parent: None,
            snapshot: Snapshot::new(),
        }
    }

    /// Identity of a non-root commit
    pub fn compute_id(
        staged_adds: &BTreeSet<PathBuf>,
        parent: &ObjectId,
        message: &str,
        timestamp: &DateTime<FixedOffset>,
    ) -> ObjectId {
        let staged = format!(
            "[{}]",
            staged_adds
                .iter()
                .map(|path| path.to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let readable = Self::format_timestamp(timestamp);

        ObjectId::of_parts(&[
            staged.as_bytes(),
            parent.as_ref().as_bytes(),
            message.as_bytes(),
            readable.as_bytes(),
        ])
    }

    /// Create a commit from a stage on top of its head
    ///
    /// The snapshot is the head's snapshot with staged removals dropped and
    /// staged additions re-read from the working tree. Blobs are written to
    /// the content store before the commit is returned.
    ///
    /// # Errors
    ///
    /// - `MessageRequired` for an empty message, before anything is hashed
    /// - `NothingToCommit` when a non-merge commit would not change the
    ///   snapshot and nothing is staged for removal
    pub fn create(
        stage: &Stage,
        head: &Commit,
        message: &str,
        second_parent: Option<ObjectId>,
        timestamp: DateTime<FixedOffset>,
        workspace: &Workspace,
        database: &Database,
    ) -> Result<Commit> {
        if message.trim().is_empty() {
            return Err(RepositoryError::MessageRequired);
        }

        let mut snapshot = head.snapshot.clone();
        for removed in stage.staged_remove() {
            snapshot.remove(removed);
        }

        let mut fresh_blobs = HashMap::<PathBuf, Blob>::new();
        for added in stage.staged_add() {
            if !workspace.exists(added) {
                tracing::warn!(path = %added.display(), "staged file vanished before commit");
                continue;
            }
            let blob = workspace.parse_blob(added)?;
            snapshot.insert(added.clone(), blob.oid().clone());
            fresh_blobs.insert(added.clone(), blob);
        }

        if second_parent.is_none() && snapshot == head.snapshot && stage.staged_remove().is_empty()
        {
            return Err(RepositoryError::NothingToCommit);
        }

        let id = Self::compute_id(stage.staged_add(), &head.id, message, &timestamp);

        let writer = database.begin_commit(&id)?;
        for (path, blob_id) in &snapshot {
            match fresh_blobs.get(path) {
                Some(blob) => writer.write_blob(path, blob)?,
                None => writer.copy_blob(&head.id, blob_id, path)?,
            }
        }
        writer.finish()?;

        tracing::debug!(
            commit = %id,
            parent = %head.id,
            tracked = snapshot.len(),
            "created commit"
        );

        Ok(Commit {
            id,
            message: message.to_string(),
            timestamp,
            parent: Some(head.id.clone()),
            second_parent,
            snapshot,
        })
    }

    /// Write the (empty) content directory of the root commit
    pub fn store_root(&self, database: &Database) -> anyhow::Result<()> {
        database.begin_commit(&self.id)?.finish()?;
        Ok(())
    }

    pub fn contains(&self, file_path: &Path) -> bool {
        self.snapshot.contains_key(file_path)
    }

    pub fn blob_id(&self, file_path: &Path) -> Option<&ObjectId> {
        self.snapshot.get(file_path)
    }

    pub fn blob_for(&self, file_path: &Path, database: &Database) -> Result<Bytes> {
        let blob_id = self
            .blob_id(file_path)
            .ok_or_else(|| RepositoryError::FileNotInCommit(file_path.to_path_buf()))?;

        Ok(database.load(&self.id, blob_id, file_path)?)
    }

    /// Restore one tracked file into the working tree
    pub fn checkout(
        &self,
        file_path: &Path,
        database: &Database,
        workspace: &Workspace,
    ) -> Result<()> {
        let content = self.blob_for(file_path, database)?;
        workspace.write_file(file_path, &content)?;

        Ok(())
    }

    /// Restore the whole snapshot
    ///
    /// Every tracked file is written and every other file of the working tree
    /// is deleted.
    pub fn checkout_all(&self, database: &Database, workspace: &Workspace) -> Result<()> {
        // read everything first so a missing blob leaves the tree untouched
        let contents = self
            .snapshot
            .keys()
            .map(|path| Ok((path, self.blob_for(path, database)?)))
            .collect::<Result<Vec<_>>>()?;

        for file_path in workspace.list_files()? {
            if !self.contains(&file_path) {
                workspace.restricted_delete(&file_path)?;
            }
        }
        for (file_path, content) in contents {
            workspace.write_file(file_path, &content)?;
        }

        Ok(())
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the first line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        Self::format_timestamp(&self.timestamp)
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn second_parent(&self) -> Option<&ObjectId> {
        self.second_parent.as_ref()
    }

    /// Both parent links, primary first
    pub fn parents(&self) -> impl Iterator<Item = &ObjectId> {
        self.parent.iter().chain(self.second_parent.iter())
    }

    pub fn slim(&self) -> SlimCommit {
        SlimCommit {
            oid: self.id.clone(),
            parents: self.parents().cloned().collect(),
            timestamp: self.timestamp,
        }
    }

    pub fn is_merge(&self) -> bool {
        self.second_parent.is_some()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
        timestamp.format(READABLE_TIMESTAMP_FORMAT).to_string()
    }
}
