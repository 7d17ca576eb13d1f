use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::staging::stage::Stage;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::status_info::StatusInfo;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

// Terminology:
// - untracked files: present in the tree, unknown to the head and not staged
//   for addition (a file re-created after `rm` is untracked too)
// - modified files: tracked by the head with different content, not staged
// - deleted files: staged for addition, or tracked and not staged for
//   removal, but gone from the tree
#[derive(new)]
pub struct Inspector<'r> {
    workspace: &'r Workspace,
    head: &'r Commit,
    stage: &'r Stage,
}

impl Inspector<'_> {
    pub fn inspect(&self) -> anyhow::Result<StatusInfo> {
        let files = self.workspace.list_files()?.into_iter().collect::<BTreeSet<_>>();

        let mut workspace_changeset = BTreeMap::new();
        for path in self.stage.staged_add() {
            if !files.contains(path) {
                workspace_changeset.insert(path.clone(), WorkspaceChangeType::Deleted);
            }
        }
        for path in self.head.snapshot().keys() {
            if self.stage.is_staged(path) || self.stage.is_removed(path) {
                continue;
            }
            if !files.contains(path) {
                workspace_changeset.insert(path.clone(), WorkspaceChangeType::Deleted);
            } else if self.is_content_changed(path)? {
                workspace_changeset.insert(path.clone(), WorkspaceChangeType::Modified);
            }
        }

        let untracked_files = files
            .iter()
            .filter(|path| !self.stage.is_staged(path))
            .filter(|path| !self.head.contains(path) || self.stage.is_removed(path))
            .cloned()
            .collect();

        Ok(StatusInfo {
            staged_files: self.stage.staged_add().clone(),
            removed_files: self.stage.staged_remove().clone(),
            workspace_changeset,
            untracked_files,
        })
    }

    fn is_content_changed(&self, path: &Path) -> anyhow::Result<bool> {
        let blob = self.workspace.parse_blob(path)?;

        Ok(self.head.blob_id(path) != Some(blob.oid()))
    }
}
