//! Content store
//!
//! Blobs are stored per commit: every commit owns a directory holding one
//! subdirectory per content hash, and inside it the file under its tracked
//! path.
//!
//! ```text
//! .bitlet/objects/<commit id>/<content hash>/<path>
//! ```
//!
//! Lookups always address content by (commit id, content hash, path). A
//! commit directory is self-contained: blobs inherited from the parent are
//! copied in when the commit is written.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn commit_path(&self, commit_id: &ObjectId) -> PathBuf {
        self.path.join(commit_id.as_ref())
    }

    pub fn blob_path(&self, commit_id: &ObjectId, blob_id: &ObjectId, file_path: &Path) -> PathBuf {
        self.commit_path(commit_id)
            .join(blob_id.as_ref())
            .join(file_path)
    }

    pub fn load(
        &self,
        commit_id: &ObjectId,
        blob_id: &ObjectId,
        file_path: &Path,
    ) -> anyhow::Result<Bytes> {
        let blob_path = self.blob_path(commit_id, blob_id, file_path);

        let content = std::fs::read(&blob_path)
            .with_context(|| format!("Unable to read blob {}", blob_path.display()))?;

        Ok(content.into())
    }

    /// Start writing the directory of a new commit
    ///
    /// Blobs are written into a temporary directory that only becomes visible
    /// under the commit id once [`CommitWriter::finish`] renames it.
    pub fn begin_commit(&self, commit_id: &ObjectId) -> anyhow::Result<CommitWriter<'_>> {
        std::fs::create_dir_all(&self.path).with_context(|| {
            format!("Unable to create objects directory {}", self.path.display())
        })?;

        let staging_path = self.path.join(Self::generate_temp_name());
        std::fs::create_dir(&staging_path).with_context(|| {
            format!(
                "Unable to create commit staging directory {}",
                staging_path.display()
            )
        })?;

        Ok(CommitWriter {
            database: self,
            commit_id: commit_id.clone(),
            staging_path,
        })
    }

    fn generate_temp_name() -> String {
        format!("tmp-commit-{}", rand::random::<u32>())
    }
}

/// Writes one commit directory
pub struct CommitWriter<'d> {
    database: &'d Database,
    commit_id: ObjectId,
    staging_path: PathBuf,
}

impl CommitWriter<'_> {
    /// Store a blob read from the working tree
    pub fn write_blob(&self, file_path: &Path, blob: &Blob) -> anyhow::Result<()> {
        let target = self.staged_blob_path(blob.oid(), file_path)?;

        std::fs::write(&target, blob.content())
            .with_context(|| format!("Unable to write blob {}", target.display()))
    }

    /// Carry a blob over from an earlier commit directory
    pub fn copy_blob(
        &self,
        source_commit: &ObjectId,
        blob_id: &ObjectId,
        file_path: &Path,
    ) -> anyhow::Result<()> {
        let source = self.database.blob_path(source_commit, blob_id, file_path);
        let target = self.staged_blob_path(blob_id, file_path)?;

        std::fs::copy(&source, &target).with_context(|| {
            format!(
                "Unable to copy blob {} to {}",
                source.display(),
                target.display()
            )
        })?;

        Ok(())
    }

    /// Publish the commit directory under its id
    ///
    /// If a directory for the same id already exists the staged blobs are
    /// merged into it; blobs are addressed by content hash so nothing that is
    /// already there gets replaced.
    pub fn finish(self) -> anyhow::Result<PathBuf> {
        let commit_path = self.database.commit_path(&self.commit_id);

        if !commit_path.exists() {
            std::fs::rename(&self.staging_path, &commit_path).with_context(|| {
                format!("Unable to publish commit directory {}", commit_path.display())
            })?;
            return Ok(commit_path);
        }

        for entry in walkdir::WalkDir::new(&self.staging_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
        {
            let relative = entry.path().strip_prefix(&self.staging_path)?;
            let target = commit_path.join(relative);
            if target.exists() {
                continue;
            }
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::rename(entry.path(), &target).with_context(|| {
                format!("Unable to move blob into {}", target.display())
            })?;
        }
        std::fs::remove_dir_all(&self.staging_path).with_context(|| {
            format!(
                "Unable to remove commit staging directory {}",
                self.staging_path.display()
            )
        })?;

        Ok(commit_path)
    }

    fn staged_blob_path(&self, blob_id: &ObjectId, file_path: &Path) -> anyhow::Result<PathBuf> {
        let target = self.staging_path.join(blob_id.as_ref()).join(file_path);

        let parent = target
            .parent()
            .with_context(|| format!("Invalid blob path {}", target.display()))?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Unable to create blob directory {}", parent.display()))?;

        Ok(target)
    }
}

impl Drop for CommitWriter<'_> {
    fn drop(&mut self) {
        // abandoned writers must not leave half-written commits behind
        if self.staging_path.exists() {
            let _ = std::fs::remove_dir_all(&self.staging_path);
        }
    }
}
