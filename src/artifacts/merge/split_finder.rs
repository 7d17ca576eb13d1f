//! Split point finder for merges
//!
//! The split point of two branch heads is their latest common ancestor: the
//! base of the three-way comparison done by [`super::resolution`].
//!
//! ## Algorithm
//!
//! Two breadth-first walks over the full parent DAG (primary and second
//! parents), one from each head, record the distance at which every commit
//! is first reached. Commits reached from both sides are common ancestors;
//! the one with the smallest combined distance wins.
//!
//! Ties are broken deterministically:
//! - the later timestamp wins
//! - then the lexicographically smaller id
//!
//! Every history shares the root commit, so callers fall back to it when the
//! walk comes back empty.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let finder = SplitFinder::new(|commit_id| state.commit(commit_id).map(Commit::slim));
//! let split = finder.find_split_point(&current_head, &given_head)?;
//! ```
//!
//! Visited commits and the chosen split point are logged at `debug` level.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use bitflags::bitflags;
use chrono::{DateTime, FixedOffset};
use std::collections::{HashMap, VecDeque};
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_CURRENT = 0b01;
        const VISITED_FROM_GIVEN = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_CURRENT.bits() | Self::VISITED_FROM_GIVEN.bits();
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_CURRENT) {
            flags.push("CURRENT");
        }
        if self.contains(VisitState::VISITED_FROM_GIVEN) {
            flags.push("GIVEN");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

/// What the walks learned about one commit
#[derive(Debug, Clone, Copy)]
struct Reach {
    state: VisitState,
    current_distance: usize,
    given_distance: usize,
    timestamp: DateTime<FixedOffset>,
}

impl Reach {
    fn combined_distance(&self) -> usize {
        self.current_distance + self.given_distance
    }
}

/// Finds the split point of two commits
///
/// Generic over the commit loader so the search runs the same against the
/// repository state and against in-memory test graphs. The loader returns
/// `None` for unknown ids, which the finder reports as corrupt state.
pub struct SplitFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Option<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> SplitFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Option<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Latest common ancestor of `current` and `given`
    ///
    /// Returns `None` only when the two histories share no commit at all.
    pub fn find_split_point(
        &self,
        current: &ObjectId,
        given: &ObjectId,
    ) -> Result<Option<ObjectId>> {
        if current == given {
            return Ok(Some(current.clone()));
        }

        let mut reach = HashMap::<ObjectId, Reach>::new();
        self.walk(current, VisitState::VISITED_FROM_CURRENT, &mut reach)?;
        self.walk(given, VisitState::VISITED_FROM_GIVEN, &mut reach)?;

        let split = reach
            .iter()
            .filter(|(_, reach)| reach.state.contains(VisitState::VISITED_FROM_BOTH))
            .min_by(|(left_id, left), (right_id, right)| {
                left.combined_distance()
                    .cmp(&right.combined_distance())
                    .then_with(|| right.timestamp.cmp(&left.timestamp))
                    .then_with(|| left_id.cmp(right_id))
            })
            .map(|(commit_id, _)| commit_id.clone());

        match &split {
            Some(commit_id) => tracing::debug!(
                current = %current,
                given = %given,
                split = %commit_id,
                "found split point"
            ),
            None => tracing::debug!(
                current = %current,
                given = %given,
                "histories share no commit"
            ),
        }

        Ok(split)
    }

    fn walk(
        &self,
        start: &ObjectId,
        side: VisitState,
        reach: &mut HashMap<ObjectId, Reach>,
    ) -> Result<()> {
        let mut queue = VecDeque::from([(start.clone(), 0usize)]);

        while let Some((commit_id, distance)) = queue.pop_front() {
            if reach
                .get(&commit_id)
                .is_some_and(|known| known.state.contains(side))
            {
                continue;
            }

            let commit = (self.commit_loader)(&commit_id).ok_or_else(|| {
                RepositoryError::CorruptState(format!("commit {commit_id} is missing"))
            })?;

            let entry = reach.entry(commit_id.clone()).or_insert(Reach {
                state: VisitState::NONE,
                current_distance: 0,
                given_distance: 0,
                timestamp: commit.timestamp,
            });
            entry.state |= side;
            if side == VisitState::VISITED_FROM_CURRENT {
                entry.current_distance = distance;
            } else {
                entry.given_distance = distance;
            }

            tracing::debug!(commit = %commit_id, distance, state = ?entry.state, "visited");

            queue.extend(
                commit
                    .parents
                    .into_iter()
                    .map(|parent_id| (parent_id, distance + 1)),
            );
        }

        Ok(())
    }
}
