//! In-memory repository state
//!
//! Everything a command needs besides file contents: branches with their
//! stages, every commit ever created and the lookup indices kept next to
//! them. The whole value is loaded before and saved after each command (see
//! [`crate::areas::state_file`]).

use crate::artifacts::branch::branch::Branch;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::{ABBREVIATED_ID_LENGTH, OBJECT_ID_LENGTH};
use crate::artifacts::staging::stage::Stage;
use crate::errors::{RepositoryError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryState {
    branches: BTreeMap<BranchName, Branch>,
    current_branch: BranchName,
    commits: BTreeMap<ObjectId, Commit>,
    /// Commit ids per exact message, in creation order
    message_index: BTreeMap<String, Vec<ObjectId>>,
    /// Full id per 8-character prefix
    abbrev_index: BTreeMap<String, ObjectId>,
    root: ObjectId,
}

impl RepositoryState {
    /// State of a freshly initialized repository
    pub fn new(root: Commit) -> Self {
        let current_branch = BranchName::default_branch();
        let branch = Branch::new(current_branch.clone(), root.id().clone());

        let mut state = RepositoryState {
            branches: BTreeMap::from([(current_branch.clone(), branch)]),
            current_branch,
            commits: BTreeMap::new(),
            message_index: BTreeMap::new(),
            abbrev_index: BTreeMap::new(),
            root: root.id().clone(),
        };
        state.index_commit(root);

        state
    }

    /// Check the references between branches, commits and indices
    pub fn validate(&self) -> Result<()> {
        let corrupt = |reason: String| Err(RepositoryError::CorruptState(reason));

        if !self.commits.contains_key(&self.root) {
            return corrupt(format!("root commit {} is missing", self.root));
        }
        if !self.branches.contains_key(&self.current_branch) {
            return corrupt(format!("current branch {} is missing", self.current_branch));
        }
        for (name, branch) in &self.branches {
            if name != branch.name() {
                return corrupt(format!("branch {} is stored as {}", branch.name(), name));
            }
            if !self.commits.contains_key(branch.head()) {
                return corrupt(format!("head of branch {name} is missing"));
            }
            if branch.stage().head() != branch.head() {
                return corrupt(format!("stage of branch {name} is out of date"));
            }
        }
        for (id, commit) in &self.commits {
            if id != commit.id() {
                return corrupt(format!("commit {} is stored as {}", commit.id(), id));
            }
            if let Some(parent) = commit.parents().find(|parent| !self.commits.contains_key(parent))
            {
                return corrupt(format!("parent {parent} of commit {id} is missing"));
            }
        }

        Ok(())
    }

    /// Record a commit in the commit map and the lookup indices
    pub fn index_commit(&mut self, commit: Commit) {
        let id = commit.id().clone();

        let ids = self
            .message_index
            .entry(commit.message().to_string())
            .or_default();
        if !ids.contains(&id) {
            ids.push(id.clone());
        }
        self.abbrev_index
            .insert(id.abbreviation().to_string(), id.clone());
        self.commits.insert(id, commit);
    }

    /// Resolve a full id, an 8-character abbreviation or a unique prefix
    pub fn resolve_commit_id(&self, id: &str) -> Result<ObjectId> {
        let prefix = id.trim().to_ascii_lowercase();
        let unknown = || RepositoryError::UnknownCommit(id.to_string());

        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(unknown());
        }
        if prefix.len() == ABBREVIATED_ID_LENGTH
            && let Some(full) = self.abbrev_index.get(&prefix)
        {
            return Ok(full.clone());
        }
        if prefix.len() == OBJECT_ID_LENGTH {
            let full = ObjectId::try_parse(prefix).map_err(|_| unknown())?;
            return if self.commits.contains_key(&full) {
                Ok(full)
            } else {
                Err(unknown())
            };
        }

        let candidates = self
            .commits
            .keys()
            .filter(|candidate| candidate.as_ref().starts_with(&prefix))
            .collect::<Vec<_>>();

        match candidates.as_slice() {
            [] => Err(unknown()),
            [single] => Ok((*single).clone()),
            _ => Err(RepositoryError::AmbiguousCommit {
                prefix,
                candidates: candidates
                    .iter()
                    .map(|candidate| candidate.to_string())
                    .collect(),
            }),
        }
    }

    pub fn commit(&self, id: &ObjectId) -> Result<&Commit> {
        self.commits
            .get(id)
            .ok_or_else(|| RepositoryError::CorruptState(format!("commit {id} is missing")))
    }

    pub fn commits(&self) -> &BTreeMap<ObjectId, Commit> {
        &self.commits
    }

    /// Every commit, oldest first
    pub fn commits_by_timestamp(&self) -> Vec<&Commit> {
        let mut commits = self.commits.values().collect::<Vec<_>>();
        commits.sort_by(|left, right| {
            left.timestamp()
                .cmp(&right.timestamp())
                .then_with(|| left.id().cmp(right.id()))
        });

        commits
    }

    pub fn find_by_message(&self, message: &str) -> &[ObjectId] {
        self.message_index
            .get(message)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn root(&self) -> &ObjectId {
        &self.root
    }

    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    pub fn branch(&self, name: &BranchName) -> Option<&Branch> {
        self.branches.get(name)
    }

    pub fn branch_mut(&mut self, name: &BranchName) -> Option<&mut Branch> {
        self.branches.get_mut(name)
    }

    pub fn insert_branch(&mut self, branch: Branch) {
        self.branches.insert(branch.name().clone(), branch);
    }

    pub fn remove_branch(&mut self, name: &BranchName) -> Option<Branch> {
        self.branches.remove(name)
    }

    pub fn current_branch_name(&self) -> &BranchName {
        &self.current_branch
    }

    pub fn set_current_branch(&mut self, name: BranchName) {
        self.current_branch = name;
    }

    pub fn current_branch(&self) -> Result<&Branch> {
        self.branches.get(&self.current_branch).ok_or_else(|| {
            RepositoryError::CorruptState(format!(
                "current branch {} is missing",
                self.current_branch
            ))
        })
    }

    pub fn current_branch_mut(&mut self) -> Result<&mut Branch> {
        let name = &self.current_branch;
        self.branches.get_mut(name).ok_or_else(|| {
            RepositoryError::CorruptState(format!("current branch {name} is missing"))
        })
    }

    pub fn current_head(&self) -> Result<&Commit> {
        self.commit(self.current_branch()?.head())
    }

    /// Current branch and its head commit, borrowed together
    pub fn current_branch_and_head(&mut self) -> Result<(&mut Branch, &Commit)> {
        let name = &self.current_branch;
        let branch = self.branches.get_mut(name).ok_or_else(|| {
            RepositoryError::CorruptState(format!("current branch {name} is missing"))
        })?;
        let head = self.commits.get(branch.head()).ok_or_else(|| {
            RepositoryError::CorruptState(format!("head of branch {name} is missing"))
        })?;

        Ok((branch, head))
    }

    /// Stage of the current branch and its head commit, borrowed together
    pub fn current_stage_and_head(&mut self) -> Result<(&mut Stage, &Commit)> {
        let (branch, head) = self.current_branch_and_head()?;
        Ok((branch.stage_mut(), head))
    }
}
