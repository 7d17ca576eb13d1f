//! Three-way classification of merged paths
//!
//! Every path present in the split point, the current head or the given head
//! is classified by comparing the content hash recorded on each side. A side
//! is *modified* when its hash differs from the split point's, and absence
//! counts as a hash of its own.
//!
//! | split   | current    | given      | action         |
//! |---------|------------|------------|----------------|
//! | absent  | present    | absent     | `KeepCurrent`  |
//! | absent  | absent     | present    | `TakeGiven`    |
//! | present | unmodified | absent     | `Remove`       |
//! | present | absent     | unmodified | `LeaveAbsent`  |
//! | any     | unmodified | modified   | `TakeGiven`    |
//! | any     | modified   | unmodified | `KeepCurrent`  |
//! | any     | modified   | same as current | `KeepCurrent` |
//! | otherwise |          |            | `Conflict`     |

use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// The current version stays as it is
    KeepCurrent,
    /// Check out the given version and stage it
    TakeGiven,
    /// Delete from the working tree and stage the removal
    Remove,
    /// Deleted on the current side and untouched on the other
    LeaveAbsent,
    /// Write conflict markers and stage the result
    Conflict,
}

pub fn classify(
    split: Option<&ObjectId>,
    current: Option<&ObjectId>,
    given: Option<&ObjectId>,
) -> MergeAction {
    match (split, current, given) {
        (None, Some(_), None) => MergeAction::KeepCurrent,
        (None, None, Some(_)) => MergeAction::TakeGiven,
        (Some(_), current, None) if current == split => MergeAction::Remove,
        (Some(_), None, given) if given == split => MergeAction::LeaveAbsent,
        _ if current == given => MergeAction::KeepCurrent,
        _ if current == split => MergeAction::TakeGiven,
        _ if given == split => MergeAction::KeepCurrent,
        _ => MergeAction::Conflict,
    }
}

/// Classify every path of the three snapshots, in path order
pub fn classify_snapshots(
    split: &Snapshot,
    current: &Snapshot,
    given: &Snapshot,
) -> Vec<(PathBuf, MergeAction)> {
    let paths = split
        .keys()
        .chain(current.keys())
        .chain(given.keys())
        .collect::<BTreeSet<_>>();

    paths
        .into_iter()
        .map(|path| {
            let action = classify(
                lookup(split, path),
                lookup(current, path),
                lookup(given, path),
            );
            (path.clone(), action)
        })
        .collect()
}

fn lookup<'s>(snapshot: &'s Snapshot, path: &Path) -> Option<&'s ObjectId> {
    snapshot.get(path)
}
