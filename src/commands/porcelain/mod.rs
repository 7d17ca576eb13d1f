//! Porcelain commands
//!
//! ## Commands
//!
//! - `init`: create a repository with its root commit
//! - `add` / `rm`: stage files for addition or removal
//! - `commit`: commit the current branch's stage
//! - `log` / `global-log`: show history
//! - `find`: look up commits by message
//! - `status`: show branches, stage and working tree changes
//! - `branch` / `rm-branch`: create or delete branch pointers
//! - `checkout`: switch branches or restore single files
//! - `reset`: move the current branch to any commit
//! - `merge`: merge another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
