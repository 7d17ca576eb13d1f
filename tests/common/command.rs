use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const FIXED_COMMIT_DATE: &str = "2024-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_bitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

pub fn run_bitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("bitlet").expect("Failed to find bitlet binary");
    cmd.current_dir(dir)
        .env("NO_PAGER", "1")
        .env("NO_COLOR", "1")
        .env("BITLET_COMMIT_DATE", FIXED_COMMIT_DATE)
        .env_remove("BITLET_LOG")
        .args(args);

    cmd
}

pub fn bitlet_commit_at(dir: &Path, message: &str, date: &str) -> Command {
    let mut cmd = run_bitlet_command(dir, &["commit", message]);
    cmd.env("BITLET_COMMIT_DATE", date);

    cmd
}
