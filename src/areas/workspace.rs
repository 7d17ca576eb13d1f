use crate::areas::REPOSITORY_DIR;
use crate::artifacts::objects::blob::Blob;
use crate::errors::{RepositoryError, Result};
use anyhow::Context;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Working tree rooted at the repository path
///
/// All paths handed in and out are relative to the root; the repository
/// directory itself is never listed, read or written through here.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    /// Turn a user supplied path into a root-relative one
    ///
    /// Absolute paths must live under the root. `.` components are dropped.
    /// Anything escaping the root (`..`), naming no file or pointing into the
    /// repository directory is not a file of the working tree.
    pub fn normalize(&self, file_path: &str) -> Result<PathBuf> {
        let not_a_file = || RepositoryError::FileNotFound(PathBuf::from(file_path));
        let file_path = Path::new(file_path);
        let relative = if file_path.is_absolute() {
            file_path
                .strip_prefix(self.path.as_ref())
                .map_err(|_| not_a_file())?
        } else {
            file_path
        };

        let mut normalized = PathBuf::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => normalized.push(name),
                Component::CurDir => {}
                _ => return Err(not_a_file()),
            }
        }

        if normalized.as_os_str().is_empty() || Self::is_ignored(&normalized) {
            tracing::debug!(path = ?file_path, "rejected path outside the working tree");
            return Err(not_a_file());
        }

        Ok(normalized)
    }

    pub fn exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Blob> {
        let data = self.read_file(file_path)?;
        Ok(Blob::new(data))
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);

        let content = std::fs::read(&full_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(content.into())
    }

    pub fn write_file(&self, file_path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create parent directory for {:?}", file_path))?;
        }

        if full_path.is_dir() {
            anyhow::bail!("Refusing to overwrite directory with file: {:?}", file_path);
        }

        std::fs::write(&full_path, data)
            .with_context(|| format!("Failed to write file: {:?}", file_path))
    }

    /// Delete a file, refusing to touch directories
    ///
    /// Missing files are not an error. Parent directories left empty by the
    /// deletion are removed up to (not including) the root.
    ///
    /// # Returns
    ///
    /// Whether a file was actually removed
    pub fn restricted_delete(&self, file_path: &Path) -> anyhow::Result<bool> {
        let full_path = self.path.join(file_path);

        if full_path.is_dir() {
            anyhow::bail!("Refusing to delete directory: {:?}", file_path);
        }
        if !full_path.exists() {
            return Ok(false);
        }

        std::fs::remove_file(&full_path)
            .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        self.prune_empty_parents(file_path)?;

        Ok(true)
    }

    /// List every file of the working tree, sorted, relative to the root
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = WalkDir::new(&self.path)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !Self::is_repository_dir(entry.path(), &self.path))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect::<Vec<_>>();

        files.sort();
        Ok(files)
    }

    fn prune_empty_parents(&self, file_path: &Path) -> anyhow::Result<()> {
        let mut current = file_path.parent();

        while let Some(dir) = current {
            if dir.as_os_str().is_empty() {
                break;
            }

            let full_dir = self.path.join(dir);
            let is_empty = std::fs::read_dir(&full_dir)
                .with_context(|| format!("Failed to read directory: {:?}", dir))?
                .next()
                .is_none();
            if !is_empty {
                break;
            }

            std::fs::remove_dir(&full_dir)
                .with_context(|| format!("Failed to remove empty directory: {:?}", dir))?;
            current = dir.parent();
        }

        Ok(())
    }

    fn is_repository_dir(path: &Path, root: &Path) -> bool {
        path.strip_prefix(root)
            .map(Self::is_ignored)
            .unwrap_or(false)
    }

    fn is_ignored(path: &Path) -> bool {
        matches!(
            path.components().next(),
            Some(Component::Normal(name)) if name == REPOSITORY_DIR
        )
    }
}
