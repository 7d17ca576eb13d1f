//! Version-control data structures and algorithms
//!
//! - `branch`: branch names and branch pointers
//! - `checkout`: untracked-file guard for tree rewrites
//! - `core`: shared utilities (pager wrapper)
//! - `merge`: split point search, merge classification and conflict markers
//! - `objects`: object ids, blobs and commits
//! - `staging`: per-branch staging area
//! - `status`: working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod merge;
pub mod objects;
pub mod staging;
pub mod status;
