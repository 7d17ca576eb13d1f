mod common;

use bitlet::errors::RepositoryError;
use common::repository::{TestRepository, repository};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::PathBuf;

#[rstest]
fn switching_branches_replaces_the_working_tree(
    mut repository: TestRepository,
) -> anyhow::Result<()> {
    repository.commit_files(&[("a.txt", "a")], "A");
    repository.repository.branch("feature")?;
    repository.repository.checkout_branch("feature")?;
    repository.commit_files(&[("a.txt", "feature a"), ("f.txt", "f")], "F");
    repository.output.take();

    repository.repository.checkout_branch("master")?;

    assert_eq!(repository.read("a.txt"), "a");
    assert!(!repository.exists("f.txt"));
    assert_eq!(
        repository.repository.state().current_branch_name().to_string(),
        "master"
    );
    assert_eq!(repository.output.take(), "Switched to branch 'master'\n");

    Ok(())
}

#[rstest]
fn checkout_branch_rejects_bad_targets(mut repository: TestRepository) -> anyhow::Result<()> {
    assert!(matches!(
        repository.repository.checkout_branch("nope"),
        Err(RepositoryError::NoSuchBranch(_))
    ));
    assert!(matches!(
        repository.repository.checkout_branch("master"),
        Err(RepositoryError::AlreadyOnBranch(_))
    ));

    Ok(())
}

#[rstest]
fn untracked_file_blocks_branch_switch(mut repository: TestRepository) -> anyhow::Result<()> {
    repository.commit_files(&[("a.txt", "a")], "A");
    repository.repository.branch("feature")?;
    repository.write("stray.txt", "mine");

    let error = repository
        .repository
        .checkout_branch("feature")
        .expect_err("checkout must be blocked");

    assert!(matches!(error, RepositoryError::UntrackedFileInTheWay(_)));
    assert_eq!(repository.read("stray.txt"), "mine");
    assert_eq!(
        repository.repository.state().current_branch_name().to_string(),
        "master"
    );

    Ok(())
}

#[rstest]
fn restoring_a_file_from_head_clears_its_stage_marks(
    mut repository: TestRepository,
) -> anyhow::Result<()> {
    repository.commit_files(&[("a.txt", "a")], "A");
    repository.write("a.txt", "edited");
    repository.repository.add("a.txt")?;

    repository.repository.checkout_file("a.txt")?;

    assert_eq!(repository.read("a.txt"), "a");
    assert!(
        !repository
            .repository
            .state()
            .current_branch()?
            .stage()
            .is_staged(&PathBuf::from("a.txt"))
    );

    Ok(())
}

#[rstest]
#[case::full(40)]
#[case::abbreviated(8)]
#[case::prefix(5)]
fn restoring_a_file_from_an_older_commit(
    mut repository: TestRepository,
    #[case] id_length: usize,
) -> anyhow::Result<()> {
    let first = repository.commit_files(&[("a.txt", "v1")], "first");
    repository.commit_files(&[("a.txt", "v2")], "second");

    repository
        .repository
        .checkout_file_from(&first[..id_length], "a.txt")?;

    assert_eq!(repository.read("a.txt"), "v1");

    Ok(())
}

#[rstest]
fn restoring_from_unknown_places_fails(mut repository: TestRepository) -> anyhow::Result<()> {
    let first = repository.commit_files(&[("a.txt", "a")], "first");

    assert!(matches!(
        repository.repository.checkout_file("missing.txt"),
        Err(RepositoryError::FileNotInCommit(_))
    ));
    assert!(matches!(
        repository.repository.checkout_file_from(&first, "missing.txt"),
        Err(RepositoryError::FileNotInCommit(_))
    ));
    assert!(matches!(
        repository.repository.checkout_file_from("ffffffff", "a.txt"),
        Err(RepositoryError::UnknownCommit(_))
    ));

    Ok(())
}

#[rstest]
fn reset_moves_the_branch_and_restores_the_snapshot(
    mut repository: TestRepository,
) -> anyhow::Result<()> {
    let first = repository.commit_files(&[("a.txt", "v1")], "first");
    repository.commit_files(&[("a.txt", "v2"), ("b.txt", "b")], "second");

    repository.repository.reset(&first[..8])?;

    assert_eq!(repository.read("a.txt"), "v1");
    assert!(!repository.exists("b.txt"));
    assert_eq!(
        repository.repository.state().current_head()?.id().to_string(),
        first
    );
    assert!(matches!(
        repository.repository.reset("0123456789"),
        Err(RepositoryError::UnknownCommit(_))
    ));

    Ok(())
}

#[rstest]
fn branches_can_be_created_and_removed(mut repository: TestRepository) -> anyhow::Result<()> {
    let first = repository.commit_files(&[("a.txt", "a")], "first");

    repository.repository.branch("feature")?;
    assert!(matches!(
        repository.repository.branch("feature"),
        Err(RepositoryError::BranchExists(_))
    ));
    assert!(matches!(
        repository.repository.branch("bad name"),
        Err(RepositoryError::InvalidBranchName(_))
    ));

    assert!(matches!(
        repository.repository.rm_branch("master"),
        Err(RepositoryError::RemoveCurrentBranch(_))
    ));
    assert!(matches!(
        repository.repository.rm_branch("nope"),
        Err(RepositoryError::UnknownBranch(_))
    ));
    repository.repository.rm_branch("feature")?;

    let state = repository.repository.state();
    assert_eq!(state.branches().count(), 1);
    assert_eq!(state.find_by_message("first").len(), 1);
    assert_eq!(state.find_by_message("first")[0].to_string(), first);

    Ok(())
}

#[rstest]
fn unstaged_edit_blocks_branch_switch_and_reset(
    mut repository: TestRepository,
) -> anyhow::Result<()> {
    let first = repository.commit_files(&[("a.txt", "1")], "first");
    repository.repository.branch("other")?;
    repository.repository.checkout_branch("other")?;
    repository.commit_files(&[("a.txt", "2")], "on other");
    repository.repository.checkout_branch("master")?;
    repository.write("a.txt", "local edit");

    assert!(matches!(
        repository.repository.checkout_branch("other"),
        Err(RepositoryError::UntrackedFileInTheWay(ref paths)) if paths == &vec![PathBuf::from("a.txt")]
    ));
    assert!(matches!(
        repository.repository.reset(&first),
        Err(RepositoryError::UntrackedFileInTheWay(_))
    ));
    assert_eq!(repository.read("a.txt"), "local edit");
    assert_eq!(
        repository.repository.state().current_branch_name().to_string(),
        "master"
    );

    repository.repository.add("a.txt")?;
    repository.repository.checkout_branch("other")?;
    assert_eq!(repository.read("a.txt"), "2");

    Ok(())
}
