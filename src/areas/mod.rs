//! Core repository components
//!
//! - `database`: content store holding the blobs of every commit
//! - `repository`: high-level coordination of state, store and working tree
//! - `state`: branches, commits and lookup indices
//! - `state_file`: locking and whole-state persistence
//! - `workspace`: working directory file system operations

pub mod database;
pub mod repository;
pub mod state;
pub mod state_file;
pub mod workspace;

/// Name of the repository directory inside the working tree
pub const REPOSITORY_DIR: &str = ".bitlet";

/// Name of the content store inside the repository directory
pub const OBJECTS_DIR: &str = "objects";
