mod common;

use bitlet::artifacts::objects::object_id::ObjectId;
use bitlet::commands::porcelain::merge::MergeOutcome;
use bitlet::errors::RepositoryError;
use common::repository::{TestRepository, repository};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::PathBuf;

fn head_of(sut: &TestRepository) -> String {
    sut.repository
        .state()
        .current_head()
        .expect("current head")
        .id()
        .to_string()
}

fn merge(sut: &mut TestRepository, branch: &str) -> Result<MergeOutcome, RepositoryError> {
    let timestamp = sut.tick();
    sut.repository.merge_at(branch, timestamp)
}

/// History:
///     A - B
///     |   |
///  master feature
///
/// Expected: master moves to B; the working tree is left as it was
#[rstest]
fn merging_a_descendant_fast_forwards(mut repository: TestRepository) -> anyhow::Result<()> {
    repository.commit_files(&[("a.txt", "a")], "A");
    repository.repository.branch("feature")?;
    repository.repository.checkout_branch("feature")?;
    let b = repository.commit_files(&[("a.txt", "b")], "B");
    repository.repository.checkout_branch("master")?;
    repository.output.take();

    let outcome = merge(&mut repository, "feature")?;

    assert_eq!(outcome, MergeOutcome::FastForward(ObjectId::try_parse(b.clone())?));
    assert_eq!(head_of(&repository), b);
    assert_eq!(repository.read("a.txt"), "a");
    assert_eq!(repository.output.take(), "Current branch fast-forwarded.\n");

    Ok(())
}

/// History:
///     A - B
///     |   |
/// feature master
///
/// Expected: nothing changes
#[rstest]
fn merging_an_ancestor_changes_nothing(mut repository: TestRepository) -> anyhow::Result<()> {
    repository.commit_files(&[("a.txt", "a")], "A");
    repository.repository.branch("feature")?;
    let b = repository.commit_files(&[("a.txt", "b")], "B");
    let commits_before = repository.repository.state().commits().len();
    repository.output.take();

    let outcome = merge(&mut repository, "feature")?;

    assert_eq!(outcome, MergeOutcome::AlreadyAncestor);
    assert_eq!(head_of(&repository), b);
    assert_eq!(repository.repository.state().commits().len(), commits_before);
    assert_eq!(
        repository.output.take(),
        "Given branch is an ancestor of the current branch.\n"
    );

    Ok(())
}

#[rstest]
fn preconditions_are_checked_in_order(mut repository: TestRepository) -> anyhow::Result<()> {
    repository.commit_files(&[("a.txt", "a")], "A");
    repository.repository.branch("feature")?;

    assert!(matches!(
        merge(&mut repository, "nope"),
        Err(RepositoryError::UnknownBranch(_))
    ));
    assert!(matches!(
        merge(&mut repository, "master"),
        Err(RepositoryError::MergeWithSelf(_))
    ));

    repository.write("b.txt", "b");
    repository.repository.add("b.txt")?;
    assert!(matches!(
        merge(&mut repository, "feature"),
        Err(RepositoryError::UncommittedChanges)
    ));

    Ok(())
}

/// History:
///        A
///       / \
///      C   B
///      |   |
///  master feature
///
/// A tracks a, b and d. B changes b, adds c and removes d; C changes a.
/// Expected: B's changes land on master without conflicts
#[rstest]
fn clean_merge_takes_changes_from_both_sides(mut repository: TestRepository) -> anyhow::Result<()> {
    repository.commit_files(&[("a.txt", "a"), ("b.txt", "b"), ("d.txt", "d")], "A");
    repository.repository.branch("feature")?;

    repository.repository.checkout_branch("feature")?;
    repository.write("b.txt", "b2");
    repository.repository.add("b.txt")?;
    repository.repository.rm("d.txt")?;
    let b = repository.commit_files(&[("c.txt", "c")], "B");

    repository.repository.checkout_branch("master")?;
    let c = repository.commit_files(&[("a.txt", "a2")], "C");
    repository.output.take();

    let outcome = merge(&mut repository, "feature")?;

    let MergeOutcome::Merged { conflicts, .. } = outcome else {
        panic!("expected a merge commit, got {outcome:?}");
    };
    assert!(conflicts.is_empty());
    assert_eq!(repository.read("a.txt"), "a2");
    assert_eq!(repository.read("b.txt"), "b2");
    assert_eq!(repository.read("c.txt"), "c");
    assert!(!repository.exists("d.txt"));

    let merge = repository.repository.state().current_head()?;
    assert_eq!(
        merge.snapshot().keys().cloned().collect::<Vec<_>>(),
        vec![
            PathBuf::from("a.txt"),
            PathBuf::from("b.txt"),
            PathBuf::from("c.txt")
        ]
    );
    assert_eq!(merge.parent().map(ToString::to_string), Some(c));
    assert_eq!(merge.second_parent().map(ToString::to_string), Some(b));
    assert_eq!(repository.output.take(), "");

    Ok(())
}

#[rstest]
fn modified_against_deleted_is_a_conflict(mut repository: TestRepository) -> anyhow::Result<()> {
    repository.commit_files(&[("a.txt", "a\n"), ("keep.txt", "k")], "A");
    repository.repository.branch("feature")?;

    repository.repository.checkout_branch("feature")?;
    repository.repository.rm("a.txt")?;
    let timestamp = repository.tick();
    repository.repository.commit_at("drop a", timestamp)?;

    repository.repository.checkout_branch("master")?;
    repository.commit_files(&[("a.txt", "changed\n")], "change a");

    let outcome = merge(&mut repository, "feature")?;

    assert!(matches!(outcome, MergeOutcome::Merged { ref conflicts, .. } if conflicts.len() == 1));
    assert_eq!(
        repository.read("a.txt"),
        "<<<<<<< HEAD\nchanged\n=======\n>>>>>>>\n"
    );

    Ok(())
}

/// An untracked file where the merge wants to write aborts before anything
/// is touched
#[rstest]
fn untracked_file_in_the_way_blocks_the_merge(
    mut repository: TestRepository,
) -> anyhow::Result<()> {
    repository.commit_files(&[("a.txt", "a")], "A");
    repository.repository.branch("feature")?;
    repository.repository.checkout_branch("feature")?;
    repository.commit_files(&[("c.txt", "from feature")], "B");
    repository.repository.checkout_branch("master")?;
    let c = repository.commit_files(&[("a.txt", "a2")], "C");
    repository.write("c.txt", "precious");

    let error = merge(&mut repository, "feature").expect_err("merge must be blocked");

    assert!(matches!(
        error,
        RepositoryError::UntrackedFileInTheWay(ref paths) if paths == &vec![PathBuf::from("c.txt")]
    ));
    assert_eq!(repository.read("c.txt"), "precious");
    assert_eq!(head_of(&repository), c);
    assert!(repository.repository.state().current_branch()?.stage().is_empty());

    Ok(())
}

/// History:
///     A - C - M - N
///      \     /
///       B ---+
///        \
///         B2
///
/// B2 comes from B on feature, after the first merge. The second merge must
/// use B, which is reached through M's second parent, as its split point.
/// Only feature's new change is then applied.
#[rstest]
fn repeated_merges_use_the_latest_common_ancestor(
    mut repository: TestRepository,
) -> anyhow::Result<()> {
    repository.commit_files(&[("a.txt", "a"), ("b.txt", "b")], "A");
    repository.repository.branch("feature")?;
    repository.repository.checkout_branch("feature")?;
    repository.commit_files(&[("b.txt", "b1")], "B");
    repository.repository.checkout_branch("master")?;
    repository.commit_files(&[("a.txt", "a1")], "C");
    merge(&mut repository, "feature")?;

    repository.repository.checkout_branch("feature")?;
    repository.commit_files(&[("b.txt", "b2")], "B2");
    repository.repository.checkout_branch("master")?;
    repository.commit_files(&[("a.txt", "a2")], "N");

    let outcome = merge(&mut repository, "feature")?;

    assert!(matches!(outcome, MergeOutcome::Merged { ref conflicts, .. } if conflicts.is_empty()));
    assert_eq!(repository.read("a.txt"), "a2");
    assert_eq!(repository.read("b.txt"), "b2");

    Ok(())
}

/// Merging must not overwrite a tracked file with unstaged edits
#[rstest]
fn unstaged_edit_blocks_the_merge(mut repository: TestRepository) -> anyhow::Result<()> {
    repository.commit_files(&[("a.txt", "1"), ("b.txt", "b")], "A");
    repository.repository.branch("other")?;
    repository.repository.checkout_branch("other")?;
    repository.commit_files(&[("a.txt", "2")], "other changes a");
    repository.repository.checkout_branch("master")?;
    let c = repository.commit_files(&[("b.txt", "b2")], "master changes b");
    repository.write("a.txt", "local edit");

    let error = merge(&mut repository, "other").expect_err("merge must be blocked");

    assert!(matches!(
        error,
        RepositoryError::UntrackedFileInTheWay(ref paths) if paths == &vec![PathBuf::from("a.txt")]
    ));
    assert_eq!(repository.read("a.txt"), "local edit");
    assert_eq!(head_of(&repository), c);

    Ok(())
}
